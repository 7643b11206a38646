//! Criterion benchmarks for modal-synth components
//!
//! Run with: cargo bench -p modal-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use modal_synth::{
    ExciterKind, FormantFilter, ModalVoice, ModeParams, NoteEvent, Param, StandardSynth,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];
const MODE_COUNTS: &[usize] = &[8, 20, 40];

// ============================================================================
// Voice benchmarks
// ============================================================================

fn bench_voice_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("ModalVoice");

    let exciters = [("Pick", ExciterKind::Impulse), ("Blow", ExciterKind::Noise)];

    for (name, kind) in &exciters {
        for &modes in MODE_COUNTS {
            let mut voice: ModalVoice<40> = ModalVoice::new(SAMPLE_RATE);
            voice.set_params(ModeParams {
                modes,
                ..ModeParams::default()
            });
            voice.set_exciter(*kind);
            voice.on(110.0, 1.0);

            group.bench_with_input(BenchmarkId::new(*name, modes), &modes, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..256 {
                        sum += voice.tick();
                    }
                    black_box(sum)
                })
            });
        }
    }

    group.finish();
}

fn bench_update_mode_coefficients(c: &mut Criterion) {
    let mut group = c.benchmark_group("ModalVoice_Update");

    for &modes in MODE_COUNTS {
        let mut voice: ModalVoice<40> = ModalVoice::new(SAMPLE_RATE);
        voice.set_params(ModeParams {
            modes,
            inharmonicity: 0.01,
            exponent: 1.1,
            ..ModeParams::default()
        });

        group.bench_with_input(BenchmarkId::from_parameter(modes), &modes, |b, _| {
            b.iter(|| {
                voice.update_mode_coefficients();
                black_box(voice.mode_count())
            })
        });
    }

    group.finish();
}

// ============================================================================
// Formant benchmarks
// ============================================================================

fn bench_formant(c: &mut Criterion) {
    let mut group = c.benchmark_group("FormantFilter");

    for &block_size in BLOCK_SIZES {
        let mut formant = FormantFilter::new(SAMPLE_RATE);
        formant.set_vowel(0.3, 0.7, 0.5, 0.4);

        group.bench_with_input(
            BenchmarkId::new("Parallel", block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for i in 0..size {
                        sum += formant.tick(if i == 0 { 1.0 } else { 0.0 });
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Engine benchmarks
// ============================================================================

fn bench_synth_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("StandardSynth");

    for &block_size in BLOCK_SIZES {
        let mut synth = StandardSynth::new(SAMPLE_RATE);
        synth.set(Param::Decay, 5.0);
        let chord = [
            NoteEvent::on(48, 1.0),
            NoteEvent::on(55, 1.0),
            NoteEvent::on(60, 1.0),
            NoteEvent::on(64, 1.0),
        ];
        let mut out = vec![0.0f32; block_size];
        synth.process_block(&chord, &mut out);

        group.bench_with_input(
            BenchmarkId::new("FourVoices", block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    synth.process_block(&[], &mut out);
                    black_box(out[0])
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_voice_tick,
    bench_update_mode_coefficients,
    bench_formant,
    bench_synth_block,
);
criterion_main!(benches);

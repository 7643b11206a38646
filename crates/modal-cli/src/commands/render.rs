//! Offline rendering command.
//!
//! Drives the synth block by block the way a host would: note-ons go out
//! with the first block, note-offs with the first block starting at or
//! after the hold time, and the tail runs until the requested length.

use crate::commands::common::{load_patch, parse_key_val, parse_macro_assignment};
use crate::wav::{WavSpec, write_wav};
use anyhow::Context;
use clap::Args;
use modal_config::{ParamValue, Patch, parse_param, resolve_param};
use modal_core::gain_to_db;
use modal_synth::{NoteEvent, StandardSynth};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory preset name or patch file
    #[arg(short, long, conflicts_with = "patch")]
    preset: Option<String>,

    /// Patch file (TOML)
    #[arg(long)]
    patch: Option<PathBuf>,

    /// MIDI notes to play, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "60")]
    notes: Vec<u8>,

    /// Note velocity (0..1)
    #[arg(long, default_value = "0.8")]
    velocity: f32,

    /// Seconds before the notes are released
    #[arg(long, default_value = "1.0")]
    hold: f32,

    /// Seconds rendered after release
    #[arg(long, default_value = "2.0")]
    tail: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Processing block size
    #[arg(long, default_value = "256")]
    block_size: usize,

    /// Output channels (1 or 2)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u16).range(1..=2))]
    channels: u16,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Parameter overrides (e.g., "decay=2.5", "exciter=Blow")
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, String)>,

    /// Macro values (e.g., "0=0.75")
    #[arg(long = "macro", value_parser = parse_macro_assignment, number_of_values = 1)]
    macros: Vec<(usize, f32)>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }
    if !matches!(args.bit_depth, 16 | 24 | 32) {
        anyhow::bail!("--bit-depth must be 16, 24 or 32, got {}", args.bit_depth);
    }
    if !(0.0..=1.0).contains(&args.velocity) {
        anyhow::bail!("--velocity must be within 0..1, got {}", args.velocity);
    }
    if args.sample_rate == 0 {
        anyhow::bail!("--sample-rate must be greater than 0");
    }
    for (flag, seconds) in [("--hold", args.hold), ("--tail", args.tail)] {
        if !seconds.is_finite() || seconds < 0.0 {
            anyhow::bail!("{} must be a finite, non-negative time, got {}", flag, seconds);
        }
    }
    if let Some(note) = args.notes.iter().find(|&&n| n > 127) {
        anyhow::bail!("MIDI note {} out of range 0..=127", note);
    }

    let sample_rate = args.sample_rate as f32;
    let mut synth = StandardSynth::new(sample_rate);

    let patch = match (&args.preset, &args.patch) {
        (Some(name), _) => Some(load_patch(name)?),
        (None, Some(path)) => Some(
            Patch::load(path).with_context(|| format!("loading patch {}", path.display()))?,
        ),
        (None, None) => None,
    };
    if let Some(patch) = &patch {
        println!("Using patch: {}", patch.name);
        patch
            .apply_to(&mut synth)
            .with_context(|| format!("applying patch '{}'", patch.name))?;
    }

    for (id, value) in &args.set {
        let param = resolve_param(id)?;
        let value = parse_param(param, &ParamValue::Text(value.clone()))
            .with_context(|| format!("--set {}", id))?;
        synth.set(param, value);
    }
    for &(slot, value) in &args.macros {
        if !synth.set_macro_value(slot, value) {
            anyhow::bail!("macro slot {} does not exist", slot);
        }
    }

    let hold_frames = (args.hold * sample_rate).round() as usize;
    let total_frames = hold_frames + (args.tail * sample_rate).round() as usize;
    let channel_count = usize::from(args.channels);

    tracing::info!(
        output = %args.output.display(),
        sample_rate = args.sample_rate,
        block_size = args.block_size,
        channels = args.channels,
        notes = ?args.notes,
        velocity = args.velocity,
        hold = args.hold,
        tail = args.tail,
        "rendering"
    );

    let ons: Vec<NoteEvent> = args
        .notes
        .iter()
        .map(|&n| NoteEvent::on(n, args.velocity))
        .collect();
    let offs: Vec<NoteEvent> = args.notes.iter().map(|&n| NoteEvent::off(n)).collect();

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(total_frames); channel_count];
    let mut blocks: Vec<Vec<f32>> = vec![vec![0.0; args.block_size]; channel_count];
    let mut released = false;
    let mut pos = 0;

    while pos < total_frames {
        let len = args.block_size.min(total_frames - pos);

        let mut events = Vec::new();
        if pos == 0 {
            events.extend_from_slice(&ons);
        }
        if !released && pos >= hold_frames {
            events.extend_from_slice(&offs);
            released = true;
        }

        let mut slices: Vec<&mut [f32]> = blocks.iter_mut().map(|b| &mut b[..len]).collect();
        synth.process_block_channels(&events, &mut slices);

        for (out, block) in output.iter_mut().zip(&blocks) {
            out.extend_from_slice(&block[..len]);
        }
        pos += len;
    }

    let mono = output.first().map(Vec::as_slice).unwrap_or(&[]);
    println!(
        "Rendered {} frames ({:.2}s), {} channel(s)",
        total_frames,
        total_frames as f32 / sample_rate,
        channel_count
    );
    println!(
        "  RMS {:.1} dB, Peak {:.1} dB",
        gain_to_db(rms(mono)),
        gain_to_db(peak(mono))
    );

    let spec = WavSpec {
        channels: args.channels,
        sample_rate: args.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    write_wav(&args.output, &output, spec)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());

    Ok(())
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

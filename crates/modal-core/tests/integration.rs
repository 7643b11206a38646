//! Integration tests for modal-core DSP primitives.
//!
//! Signal-level checks: filter magnitude responses measured with sine
//! input, resonator ring-down timing, and parameter descriptor round trips
//! through the public API.

use modal_core::{
    Biquad, BiquadType, ParamDescriptor, ParamUnit, Resonator, T60_RATIO, bandpass_coefficients,
    db_to_gain, lerp, midi_to_freq,
};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;

fn generate_sine(freq_hz: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| libm::sinf(TAU * freq_hz * n as f32 / sample_rate))
        .collect()
}

fn rms(signal: &[f32]) -> f32 {
    let sum_sq: f32 = signal.iter().map(|&s| s * s).sum();
    libm::sqrtf(sum_sq / signal.len() as f32)
}

fn to_db(linear: f32) -> f32 {
    20.0 * libm::log10f(linear.max(1e-10))
}

// ============================================================================
// 1. Filter frequency responses
// ============================================================================

/// Gain in dB of a sine at `freq_hz` after the filter settles.
fn measure_biquad_response(biquad: &mut Biquad, freq_hz: f32) -> f32 {
    let num_samples = 9600;
    let settle_samples = 4800;
    let input = generate_sine(freq_hz, SAMPLE_RATE, num_samples);
    biquad.clear();
    let output: Vec<f32> = input.iter().map(|&s| biquad.tick(s)).collect();
    to_db(rms(&output[settle_samples..]) / rms(&input[settle_samples..]))
}

#[test]
fn biquad_lowpass_frequency_response() {
    let mut biquad = Biquad::new(SAMPLE_RATE);
    biquad.set_lpf(1000.0, 0.707);

    let passband = measure_biquad_response(&mut biquad, 100.0);
    let cutoff = measure_biquad_response(&mut biquad, 1000.0);
    let stopband = measure_biquad_response(&mut biquad, 10000.0);

    assert!(passband.abs() < 0.5, "passband should be ~0 dB, got {:.2}", passband);
    assert!(
        (cutoff + 3.0).abs() < 1.0,
        "cutoff should be ~-3 dB, got {:.2}",
        cutoff
    );
    assert!(stopband < -30.0, "stopband should be < -30 dB, got {:.2}", stopband);
}

#[test]
fn biquad_highpass_frequency_response() {
    let mut biquad = Biquad::new(SAMPLE_RATE);
    biquad.set_hpf(1000.0, 0.707);

    let stopband = measure_biquad_response(&mut biquad, 100.0);
    let passband = measure_biquad_response(&mut biquad, 10000.0);

    assert!(stopband < -30.0, "stopband should be < -30 dB, got {:.2}", stopband);
    assert!(passband.abs() < 0.5, "passband should be ~0 dB, got {:.2}", passband);
}

#[test]
fn biquad_formant_band_selectivity() {
    // Narrow 0 dB band-pass as used by the formant filter
    let mut biquad = Biquad::new(SAMPLE_RATE);
    biquad.set_bpf(700.0, 0.1);

    let centre = measure_biquad_response(&mut biquad, 700.0);
    let octave_up = measure_biquad_response(&mut biquad, 1400.0);

    assert!(centre.abs() < 0.5, "centre should be ~0 dB, got {:.2}", centre);
    assert!(
        octave_up < -15.0,
        "an octave away should be strongly attenuated, got {:.2}",
        octave_up
    );
}

#[test]
fn biquad_coefficient_function_matches_setter() {
    let (b0, b1, b2, a0, a1, a2) = bandpass_coefficients(1200.0, 0.3, SAMPLE_RATE);
    let mut biquad = Biquad::new(SAMPLE_RATE);
    biquad.set_params(BiquadType::Bandpass, 1200.0, 0.3);

    let expected = [b0 / a0, b1 / a0, b2 / a0, a1 / a0, a2 / a0];
    for (got, want) in biquad.coefficients().iter().zip(expected) {
        assert!((got - want).abs() < 1e-7, "coefficient {} != {}", got, want);
    }
}

#[test]
fn biquad_sample_rate_change_keeps_cutoff() {
    let mut biquad = Biquad::new(SAMPLE_RATE);
    biquad.set_lpf(1000.0, 0.707);
    biquad.set_sample_rate(96000.0);

    // Measure at the new rate
    let input = generate_sine(1000.0, 96000.0, 19200);
    let output: Vec<f32> = input.iter().map(|&s| biquad.tick(s)).collect();
    let gain = to_db(rms(&output[9600..]) / rms(&input[9600..]));
    assert!(
        (gain + 3.0).abs() < 1.0,
        "cutoff should stay ~-3 dB at 1 kHz after rate change, got {:.2}",
        gain
    );
}

// ============================================================================
// 2. Resonator ring-down
// ============================================================================

#[test]
fn resonator_ring_down_follows_t60() {
    let decay = 0.5;
    let mut mode = Resonator::new(SAMPLE_RATE);
    mode.set_params(midi_to_freq(69.0), 1.0, decay);
    mode.ping();

    let half = (decay * SAMPLE_RATE / 2.0) as usize;
    for _ in 0..half {
        mode.tick(0.0);
    }
    let mid = mode.magnitude();
    for _ in 0..half {
        mode.tick(0.0);
    }
    let end = mode.magnitude();

    let expected_mid = libm::sqrtf(T60_RATIO);
    assert!(
        (mid - expected_mid).abs() < expected_mid * 0.03,
        "halfway through T60 should be ~{:.5}, got {:.5}",
        expected_mid,
        mid
    );
    assert!(
        (end - T60_RATIO).abs() < T60_RATIO * 0.03,
        "full T60 should be ~0.001, got {:.6}",
        end
    );
}

#[test]
fn resonator_output_bounded_by_amplitude() {
    let mut mode = Resonator::new(SAMPLE_RATE);
    mode.set_params(220.0, 0.8, 2.0);
    mode.ping();
    for _ in 0..48000 {
        let y = mode.tick(0.0);
        assert!(y.abs() <= 0.8 + 1e-5, "free ring exceeded strike amplitude: {}", y);
    }
}

#[test]
fn resonator_muted_modes_stay_silent_when_driven() {
    let mut mode = Resonator::new(SAMPLE_RATE);
    mode.set_params(24000.0, 1.0, 1.0);
    let input = generate_sine(440.0, SAMPLE_RATE, 1024);
    assert!(input.iter().all(|&x| mode.tick(x) == 0.0));
}

// ============================================================================
// 3. Parameter descriptors and math
// ============================================================================

#[test]
fn descriptor_denormalize_lerp_agree_for_linear_params() {
    let desc = ParamDescriptor::continuous("Decay", "Decay", ParamUnit::Seconds, 0.1, 5.0, 1.0);
    for t in [0.0, 0.25, 0.5, 1.0] {
        let a = desc.denormalize(t);
        let b = lerp(0.1, 5.0, t);
        assert!((a - b).abs() < 1e-6, "{} vs {} at t={}", a, b, t);
    }
}

#[test]
fn db_gain_defaults_are_unity() {
    assert_eq!(db_to_gain(0.0), 1.0);
    assert_eq!(midi_to_freq(69.0), 440.0);
}

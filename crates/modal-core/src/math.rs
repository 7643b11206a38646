//! Mathematical utility functions for modal synthesis.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Pitch Conversions
//!
//! - [`midi_to_freq`] / [`freq_to_midi`] - MIDI note number to Hz and back (A4 = 440 Hz)
//! - [`add_cents`] / [`cents_to_ratio`] - Detune a frequency by cents
//!
//! # Level Conversions
//!
//! - [`db_to_gain`] / [`gain_to_db`] - Convert between dB and linear gain
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`flush_denormal`] - Flush subnormal floats in feedback paths

use libm::{expf, log2f, logf, powf};

/// Reference pitch of MIDI note 69 (A4) in Hz.
pub const A4_FREQ: f32 = 440.0;

/// Convert a MIDI note number to frequency in Hz.
///
/// Standard tuning: note 69 (A4) is exactly 440 Hz. Fractional notes are
/// allowed for microtonal input.
///
/// # Example
/// ```rust
/// use modal_core::midi_to_freq;
///
/// assert_eq!(midi_to_freq(69.0), 440.0);
/// assert!((midi_to_freq(81.0) - 880.0).abs() < 1e-3);
/// ```
#[inline]
pub fn midi_to_freq(note: f32) -> f32 {
    A4_FREQ * powf(2.0, (note - 69.0) / 12.0)
}

/// Convert a frequency in Hz to a (fractional) MIDI note number.
#[inline]
pub fn freq_to_midi(freq: f32) -> f32 {
    69.0 + 12.0 * log2f(freq / A4_FREQ)
}

/// Convert cents to a frequency ratio.
///
/// 100 cents = 1 semitone, 1200 cents = 1 octave.
#[inline]
pub fn cents_to_ratio(cents: f32) -> f32 {
    powf(2.0, cents / 1200.0)
}

/// Shift a frequency by the given number of cents.
///
/// # Example
/// ```rust
/// use modal_core::add_cents;
///
/// assert!((add_cents(440.0, 1200.0) - 880.0).abs() < 1e-3);
/// ```
#[inline]
pub fn add_cents(freq: f32, cents: f32) -> f32 {
    freq * cents_to_ratio(cents)
}

/// Convert decibels to linear gain.
///
/// `10^(dB/20)`. 0 dB maps to exactly 1.0 and `-inf` dB maps to 0.0.
///
/// # Example
/// ```rust
/// use modal_core::db_to_gain;
///
/// assert_eq!(db_to_gain(0.0), 1.0);
/// assert_eq!(db_to_gain(f32::NEG_INFINITY), 0.0);
/// assert!((db_to_gain(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Gains at or below zero are floored at -200 dB.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(gain.max(1e-10)) * FACTOR
}

/// Linear interpolation between two values.
///
/// `a + t * (b - a)`: `t = 0` gives `a`, `t = 1` gives `b`. `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Values below 1e-20 are replaced with zero, leaving margin before the
/// IEEE 754 subnormal range. Used on decaying feedback state.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

//! Modal Core - DSP primitives for modal synthesis
//!
//! This crate provides the low-level building blocks used by the modal
//! synthesizer, designed for real-time use with no allocation in the audio
//! path.
//!
//! # Resonators
//!
//! - [`Resonator`] - Complex one-pole mode with T60 decay, muted at or above Nyquist
//!
//! # Filters
//!
//! - [`Biquad`] - Second-order IIR filter that remembers its design
//!   ([`BiquadType`]) and re-derives it on sample-rate changes
//!
//! # Parameters
//!
//! - [`ParameterInfo`] - Index-based parameter introspection
//! - [`ParamDescriptor`] - Range, unit, scale, and choice labels for one parameter
//!
//! # Utilities
//!
//! - Pitch: [`midi_to_freq`], [`freq_to_midi`], [`add_cents`]
//! - Level: [`db_to_gain`], [`gain_to_db`]
//! - [`lerp`], [`flush_denormal`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! modal-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod math;
pub mod param_info;
pub mod resonator;

pub use biquad::{
    Biquad, BiquadType, Coefficients, allpass_coefficients, bandpass_coefficients,
    bandpass_q_coefficients, highpass_coefficients, lowpass_coefficients, notch_coefficients,
    stk_notch_coefficients,
};
pub use math::{
    A4_FREQ, add_cents, cents_to_ratio, db_to_gain, flush_denormal, freq_to_midi, gain_to_db,
    lerp, midi_to_freq,
};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use resonator::{Resonator, T60_RATIO};

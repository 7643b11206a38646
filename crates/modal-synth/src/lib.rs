//! Modal Synth - polyphonic modal synthesis engine
//!
//! Sound is made by exciting a bank of damped complex resonators ("modes")
//! whose frequencies, gains and decay times are derived from a handful of
//! musical parameters. This crate provides the building blocks and a
//! block-based engine a host can drive.
//!
//! # Core Components
//!
//! ## Signal sources
//!
//! - [`Phasor`] - phase accumulator, with the [`saw`], [`sine`], [`tri`],
//!   [`rect`] waveforms and the band-limited [`impulse_train`], [`aa_saw`],
//!   [`aa_rect`]
//! - [`Chirp`] - repeating 20 Hz to 20 kHz sine sweep
//! - [`Exciter`] / [`ExciterKind`] - what drives the modes (pick, blow,
//!   impulses, square, chirp)
//!
//! ## Envelopes
//!
//! - [`ArEnvelope`] - one-shot attack/release
//! - [`AhrEnvelope`] - gated attack/hold/release, used to gate continuous
//!   exciters
//!
//! ## Voices
//!
//! - [`ModalVoice`] - exciter, envelope, resonator bank and formant filter
//! - [`FormantFilter`] - four-band vowel filter
//! - [`VoiceController`] - round-robin note allocation over a fixed pool
//!
//! ## Engine
//!
//! - [`ModalSynth`] / [`StandardSynth`] - block processing with per-block
//!   parameter application
//! - [`SynthParams`] / [`Param`] - the parameter surface, exposed through
//!   [`modal_core::ParameterInfo`]
//! - [`MacroBank`] - macro controls mapped onto parameters
//!
//! ```rust
//! use modal_synth::{NoteEvent, Param, StandardSynth};
//!
//! let mut synth = StandardSynth::new(48000.0);
//! synth.set(Param::Modes, 12.0);
//! synth.set(Param::Detune, 0.02);
//!
//! let mut block = [0.0f32; 512];
//! synth.process_block(&[NoteEvent::on(57, 1.0), NoteEvent::on(64, 0.7)], &mut block);
//! assert_eq!(synth.active_voice_count(), 2);
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! modal-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Logging
//!
//! With the `tracing` feature, control-path events (sample-rate changes,
//! parameter pushes, dropped notes, macro retargeting) are emitted through
//! [`tracing`](https://docs.rs/tracing). Nothing is logged per sample.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod controller;
pub mod envelope;
pub mod exciter;
pub mod formant;
pub mod macros;
pub mod params;
pub mod phasor;
pub mod synth;
pub mod voice;

pub use controller::{Voice, VoiceController};
pub use envelope::{AhrEnvelope, ArEnvelope, EnvelopeState};
pub use exciter::{Exciter, ExciterKind};
pub use formant::{FORMANT_BANDS, FORMANT_BANDWIDTH, FormantArch, FormantFilter};
pub use macros::{MACRO_SLOTS, MacroBank, MacroSlot};
pub use params::{DESCRIPTORS, PARAM_COUNT, PARAM_ID_BASE, Param, SynthParams};
pub use phasor::{
    CHIRP_HIGH_HZ, CHIRP_LOW_HZ, Chirp, Phasor, aa_rect, aa_saw, impulse_train, rect, saw, sine, tri,
};
pub use synth::{MAX_VOICES, ModalSynth, NoteEvent, NoteEventKind, OUTPUT_GAIN, StandardSynth};
pub use voice::{
    DEFAULT_FOLDBACK_POINT, FoldbackMode, FoldbackSettings, MAX_MODES, ModalVoice, ModeParams,
    ModeShaping,
};

//! Patch storage for the modal synthesizer.
//!
//! A [`Patch`] is the persisted form of a synth's state: named parameter
//! values and macro mappings, stored as TOML. Patches are validated against
//! the synth's parameter descriptors when they are resolved.
//!
//! # Features
//!
//! - **Patches**: Load and save TOML patches, capture a running synth
//! - **Values**: Choice labels and unit strings (`"250ms"`, `"1.2kHz"`, `"30%"`)
//! - **Validation**: Unknown ids, out-of-range values and bad macro slots
//! - **Factory Presets**: Built-in patches compiled into the library
//!
//! # Example
//!
//! ```rust
//! use modal_config::{MacroConfig, Patch};
//! use modal_synth::{Param, StandardSynth};
//!
//! let patch = Patch::new("Glass")
//!     .with_description("Thin, bright and long")
//!     .with_param("exciter", "Pick")
//!     .with_param("falloff", 0.4)
//!     .with_param("decay", "3s")
//!     .with_macro(MacroConfig::new(Some("detune"), 0.0, 0.1, 0.5));
//!
//! let mut synth = StandardSynth::new(48000.0);
//! patch.apply_to(&mut synth).unwrap();
//! assert_eq!(synth.get(Param::Decay), 3.0);
//!
//! let toml = patch.to_toml().unwrap();
//! assert_eq!(Patch::from_toml(&toml).unwrap(), patch);
//! ```

mod error;
mod preset;
mod value;

/// Patch validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_preset_names, factory_presets, get_factory_preset,
    is_factory_preset,
};
pub use preset::{MacroConfig, Patch};
pub use validation::{
    ValidationError, ValidationResult, parse_param, resolve_param, validate_macro, validate_patch,
};
pub use value::{ParamValue, parse_param_value};

//! Patch validation.
//!
//! Resolves parameter string ids against the synth's descriptor table,
//! converts patch values into plain parameter values and checks ranges,
//! choice labels and macro slots.
//!
//! # Example
//!
//! ```rust
//! use modal_config::{Patch, validate_patch, resolve_param};
//! use modal_synth::Param;
//!
//! assert_eq!(resolve_param("decay").unwrap(), Param::Decay);
//! assert!(resolve_param("drive").is_err());
//!
//! let patch = Patch::new("ok").with_param("exciter", "Blow").with_param("decay", 2.0);
//! validate_patch(&patch).expect("patch should be valid");
//! ```

use modal_synth::{MACRO_SLOTS, Param};
use thiserror::Error;

use crate::preset::{MacroConfig, Patch};
use crate::value::{ParamValue, parse_param_value};

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter string id.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// String id of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Label not among a choice parameter's options.
    #[error("unknown choice '{label}' for parameter '{param}' (expected one of: {})", .expected.join(", "))]
    UnknownChoice {
        /// String id of the parameter.
        param: String,
        /// The label that did not match.
        label: String,
        /// Accepted labels.
        expected: Vec<String>,
    },

    /// Invalid parameter format.
    #[error("invalid format for parameter '{param}': {reason}")]
    InvalidFormat {
        /// String id of the parameter.
        param: String,
        /// Description of the format error.
        reason: String,
    },

    /// Macro entry that cannot be loaded into a slot.
    #[error("invalid macro slot {slot}: {reason}")]
    InvalidMacroSlot {
        /// Zero-based slot index.
        slot: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Looks up a parameter by its stable string id (case-insensitive).
pub fn resolve_param(id: &str) -> ValidationResult<Param> {
    Param::ALL
        .iter()
        .copied()
        .find(|p| p.descriptor().string_id.eq_ignore_ascii_case(id))
        .ok_or_else(|| ValidationError::UnknownParameter(id.to_string()))
}

/// Converts a patch value into a plain value for `param`.
///
/// Choice parameters accept a label or an index. Continuous parameters
/// accept numbers and unit strings. Values outside the descriptor range
/// are rejected rather than clamped.
pub fn parse_param(param: Param, value: &ParamValue) -> ValidationResult<f32> {
    let desc = param.descriptor();
    let plain = match value {
        ParamValue::Number(n) => *n as f32,
        ParamValue::Text(text) => {
            if desc.is_choice()
                && let Some(index) = desc.choice_index(text.trim())
            {
                index as f32
            } else if let Some(v) = parse_param_value(text) {
                v
            } else if desc.is_choice() {
                return Err(ValidationError::UnknownChoice {
                    param: desc.string_id.to_string(),
                    label: text.clone(),
                    expected: desc.choices.iter().map(|c| (*c).to_string()).collect(),
                });
            } else {
                return Err(ValidationError::InvalidFormat {
                    param: desc.string_id.to_string(),
                    reason: format!("cannot parse '{text}' as a number"),
                });
            }
        }
    };

    if !plain.is_finite() {
        return Err(ValidationError::InvalidFormat {
            param: desc.string_id.to_string(),
            reason: format!("{plain} is not a finite number"),
        });
    }
    if plain < desc.min || plain > desc.max {
        return Err(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value: plain,
            min: desc.min,
            max: desc.max,
        });
    }
    if desc.is_stepped() && plain.fract() != 0.0 {
        return Err(ValidationError::InvalidFormat {
            param: desc.string_id.to_string(),
            reason: format!("{plain} is not a whole number"),
        });
    }
    Ok(plain)
}

/// Validates one `[[macros]]` entry for slot `slot`.
///
/// Returns the resolved target, if any.
pub fn validate_macro(slot: usize, config: &MacroConfig) -> ValidationResult<Option<Param>> {
    if slot >= MACRO_SLOTS {
        return Err(ValidationError::InvalidMacroSlot {
            slot,
            reason: format!("only {MACRO_SLOTS} macro slots are available"),
        });
    }
    for (field, v) in [("low", config.low), ("high", config.high), ("value", config.value)] {
        if !(0.0..=1.0).contains(&v) {
            return Err(ValidationError::InvalidMacroSlot {
                slot,
                reason: format!("{field} {v} outside [0, 1]"),
            });
        }
    }
    config.target.as_deref().map(resolve_param).transpose()
}

/// Validates every parameter and macro of a patch, collecting all errors.
pub fn validate_patch(patch: &Patch) -> ValidationResult<()> {
    let mut errors = Vec::new();

    for (id, value) in &patch.params {
        if let Err(e) = resolve_param(id).and_then(|param| parse_param(param, value)) {
            errors.push(e);
        }
    }
    for (slot, config) in patch.macros.iter().enumerate() {
        if let Err(e) = validate_macro(slot, config) {
            errors.push(e);
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_param() {
        assert_eq!(resolve_param("foldback_point").unwrap(), Param::FoldbackPoint);
        assert_eq!(resolve_param("FORMANT_MIX").unwrap(), Param::FormantMix);
        assert_eq!(
            resolve_param("drive"),
            Err(ValidationError::UnknownParameter("drive".to_string()))
        );
    }

    #[test]
    fn test_parse_choice_by_label_and_index() {
        assert_eq!(parse_param(Param::Exciter, &"Blow".into()).unwrap(), 1.0);
        assert_eq!(parse_param(Param::Exciter, &"chirp".into()).unwrap(), 4.0);
        assert_eq!(parse_param(Param::FoldbackMode, &ParamValue::Number(2.0)).unwrap(), 2.0);
        assert_eq!(parse_param(Param::FoldbackMode, &"1".into()).unwrap(), 1.0);
    }

    #[test]
    fn test_parse_unknown_choice() {
        let err = parse_param(Param::Exciter, &"Bow".into()).unwrap_err();
        match err {
            ValidationError::UnknownChoice { param, label, expected } => {
                assert_eq!(param, "exciter");
                assert_eq!(label, "Bow");
                assert_eq!(expected.len(), 5);
            }
            other => panic!("expected UnknownChoice, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_units_and_ranges() {
        assert_eq!(parse_param(Param::Attack, &"250ms".into()).unwrap(), 0.25);
        assert_eq!(parse_param(Param::FoldbackPoint, &"1.2kHz".into()).unwrap(), 1200.0);
        assert_eq!(parse_param(Param::EvenGain, &"30%".into()).unwrap(), 0.3);

        let err = parse_param(Param::Decay, &ParamValue::Number(9.0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                param: "decay".to_string(),
                value: 9.0,
                min: 0.1,
                max: 5.0,
            }
        );
        assert!(matches!(
            parse_param(Param::Falloff, &"steep".into()),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_stepped_params_reject_fractions() {
        assert!(matches!(
            parse_param(Param::Modes, &ParamValue::Number(12.5)),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(parse_param(Param::Modes, &ParamValue::Number(12.0)).unwrap(), 12.0);
    }

    #[test]
    fn test_validate_macro() {
        let ok = MacroConfig::new(Some("falloff"), 0.2, 0.8, 0.5);
        assert_eq!(validate_macro(0, &ok).unwrap(), Some(Param::Falloff));
        assert_eq!(validate_macro(1, &MacroConfig::default()).unwrap(), None);

        assert!(matches!(
            validate_macro(3, &ok),
            Err(ValidationError::InvalidMacroSlot { slot: 3, .. })
        ));
        let wide = MacroConfig::new(Some("falloff"), 0.0, 1.5, 0.0);
        assert!(matches!(
            validate_macro(0, &wide),
            Err(ValidationError::InvalidMacroSlot { slot: 0, .. })
        ));
        let unknown = MacroConfig::new(Some("wobble"), 0.0, 1.0, 0.0);
        assert_eq!(
            validate_macro(0, &unknown),
            Err(ValidationError::UnknownParameter("wobble".to_string()))
        );
    }

    #[test]
    fn test_validate_patch_collects_errors() {
        let patch = Patch::new("broken")
            .with_param("decay", 2.0)
            .with_param("wobble", 1.0)
            .with_param("exciter", "Bow");
        match validate_patch(&patch) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected two errors, got {other:?}"),
        }

        let single = Patch::new("one").with_param("modes", 0.0);
        assert!(matches!(
            validate_patch(&single),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}

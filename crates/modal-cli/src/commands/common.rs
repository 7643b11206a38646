//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use modal_config::{Patch, get_factory_preset};
use std::path::Path;

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Parse a `slot=value` macro assignment.
pub fn parse_macro_assignment(s: &str) -> Result<(usize, f32), String> {
    let (slot, value) = parse_key_val(s)?;
    let slot = slot
        .parse::<usize>()
        .map_err(|_| format!("Invalid macro slot '{}' (expected 0, 1 or 2)", slot))?;
    let value = value
        .parse::<f32>()
        .map_err(|_| format!("Invalid macro value '{}' (expected 0..1)", value))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("Macro value {} outside 0..1", value));
    }
    Ok((slot, value))
}

/// Load a patch by factory name or file path.
///
/// Factory patches are tried first, then the name is read as a path to a
/// TOML file.
pub fn load_patch(name: &str) -> anyhow::Result<Patch> {
    if let Some(patch) = get_factory_preset(name) {
        return Ok(patch);
    }

    let path = Path::new(name);
    if path.exists() {
        return Patch::load(path).with_context(|| format!("loading patch {}", path.display()));
    }

    anyhow::bail!(
        "Preset '{}' not found. Use 'modal presets list' to see available presets.",
        name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("decay=2.5"),
            Ok(("decay".to_string(), "2.5".to_string()))
        );
        assert_eq!(
            parse_key_val("exciter = Blow"),
            Ok(("exciter".to_string(), "Blow".to_string()))
        );
        assert!(parse_key_val("decay").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn test_parse_macro_assignment() {
        assert_eq!(parse_macro_assignment("1=0.25"), Ok((1, 0.25)));
        assert!(parse_macro_assignment("x=0.5").is_err());
        assert!(parse_macro_assignment("0=1.5").is_err());
    }

    #[test]
    fn test_load_patch_factory_and_missing() {
        assert_eq!(load_patch("Bell").unwrap().name, "Bell");
        let err = load_patch("no_such_patch").unwrap_err();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }
}

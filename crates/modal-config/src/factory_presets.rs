//! Factory patches bundled with the library.
//!
//! These are always available without external files and serve as
//! starting points for sound design.

use crate::Patch;

/// Array of factory patch names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init", "bell", "bowl", "marimba", "pipe", "vowel", "gong",
];

/// TOML content for factory patches, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("bell", BELL_PRESET),
    ("bowl", BOWL_PRESET),
    ("marimba", MARIMBA_PRESET),
    ("pipe", PIPE_PRESET),
    ("vowel", VOWEL_PRESET),
    ("gong", GONG_PRESET),
];

/// Initialization patch - every parameter at its default.
const INIT_PRESET: &str = r#"
name = "Init"
description = "Plucked harmonic series, all parameters at their defaults"
sample_rate = 48000
"#;

/// Struck bell with stretched partials.
const BELL_PRESET: &str = r#"
name = "Bell"
description = "Struck bell - stretched, slowly decaying partials"
sample_rate = 48000

[params]
exciter = "Pick"
detune = 0.04
exponent = 1.2
falloff = 0.8
decay = 4.0
even_gain = 0.8
third_gain = 1.4
"#;

/// Bowed singing bowl.
const BOWL_PRESET: &str = r#"
name = "Bowl"
description = "Blown singing bowl - slow swell over a few detuned modes"
sample_rate = 48000

[params]
exciter = "Blow"
attack = 1.5
release = 2.0
modes = 12
detune = 0.02
exponent = 1.1
falloff = 1.2
decay = 5.0
odd_freq = 1.3

[[macros]]
target = "detune"
low = 0.03
high = 0.06
value = 0.4
"#;

/// Short wooden bar.
const MARIMBA_PRESET: &str = r#"
name = "Marimba"
description = "Wooden bar - few quadratic modes with a short ring"
sample_rate = 48000

[params]
exciter = "Pick"
modes = 6
exponent = 2.0
falloff = 1.8
decay = "600ms"
even_gain = "30%"
"#;

/// Closed pipe, odd harmonics only.
const PIPE_PRESET: &str = r#"
name = "Pipe"
description = "Closed pipe - breath noise through odd harmonics"
sample_rate = 48000

[params]
exciter = "Blow"
attack = "50ms"
release = "200ms"
modes = 20
even_gain = "10%"
falloff = 1.5
decay = 0.3
"#;

/// Buzzy source through the vowel filter.
const VOWEL_PRESET: &str = r#"
name = "Vowel"
description = "Impulse train through the formant filter"
sample_rate = 48000

[params]
exciter = "Impulses"
exciter_rate = 1
attack = "20ms"
release = "300ms"
falloff = 0.5
decay = 0.2
formant_x = 0.2
formant_y = 0.9
formant_len = 0.4
formant_mix = 0.8

[[macros]]
target = "formant_x"
low = 0.1
high = 0.9
value = 0.125

[[macros]]
target = "formant_y"
low = 0.9
high = 0.2
value = 0.0
"#;

/// Folded, inharmonic metal.
const GONG_PRESET: &str = r#"
name = "Gong"
description = "Folded, slightly detuned partials with a long tail"
sample_rate = 48000

[params]
exciter = "Pick"
foldback_mode = "Foldback"
foldback_point = "900Hz"
detune = 0.15
falloff = 0.6
decay = 5.0

[[macros]]
target = "foldback_point"
low = 0.35
high = 0.75
value = 0.5
"#;

/// Get all factory patches.
///
/// # Example
///
/// ```rust
/// use modal_config::factory_presets::factory_presets;
///
/// let presets = factory_presets();
/// for preset in &presets {
///     println!("{}: {:?}", preset.name, preset.description);
/// }
/// ```
pub fn factory_presets() -> Vec<Patch> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .collect()
}

/// Get a factory patch by id or display name (case-insensitive).
///
/// # Example
///
/// ```rust
/// use modal_config::get_factory_preset;
///
/// let bell = get_factory_preset("bell").expect("bell should exist");
/// assert_eq!(bell.name, "Bell");
/// ```
pub fn get_factory_preset(name: &str) -> Option<Patch> {
    FACTORY_PRESETS_TOML.iter().find_map(|(id, toml)| {
        let patch = Patch::from_toml(toml).ok()?;
        (id.eq_ignore_ascii_case(name) || patch.name.eq_ignore_ascii_case(name)).then_some(patch)
    })
}

/// Get the ids of all factory patches.
pub fn factory_preset_names() -> Vec<&'static str> {
    FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory patch (case-insensitive).
///
/// # Example
///
/// ```rust
/// use modal_config::is_factory_preset;
///
/// assert!(is_factory_preset("gong"));
/// assert!(is_factory_preset("Gong"));
/// assert!(!is_factory_preset("my_custom_patch"));
/// ```
pub fn is_factory_preset(name: &str) -> bool {
    get_factory_preset(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modal_synth::{ExciterKind, FoldbackMode, Param, SynthParams};

    #[test]
    fn test_factory_presets_load() {
        let presets = factory_presets();
        assert_eq!(presets.len(), FACTORY_PRESETS_TOML.len(), "every factory patch should parse");

        let names: Vec<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Init", "Bell", "Bowl", "Marimba", "Pipe", "Vowel", "Gong"]
        );
    }

    #[test]
    fn test_names_match_table() {
        assert_eq!(factory_preset_names(), FACTORY_PRESET_NAMES.to_vec());
    }

    #[test]
    fn test_get_factory_preset() {
        assert_eq!(get_factory_preset("marimba").unwrap().name, "Marimba");
        assert_eq!(get_factory_preset("VOWEL").unwrap().name, "Vowel");
        assert!(get_factory_preset("nonexistent").is_none());
    }

    #[test]
    fn test_all_factory_presets_valid() {
        for (id, toml) in FACTORY_PRESETS_TOML {
            let patch = Patch::from_toml(toml).unwrap();
            assert!(patch.description.is_some(), "patch '{}' should have a description", id);
            assert!(
                patch.to_params().is_ok(),
                "patch '{}' params invalid: {:?}",
                id,
                patch.to_params()
            );
            assert!(
                patch.to_macros().is_ok(),
                "patch '{}' macros invalid: {:?}",
                id,
                patch.to_macros()
            );
        }
    }

    #[test]
    fn test_init_is_all_defaults() {
        let init = get_factory_preset("init").unwrap();
        assert_eq!(init.to_params().unwrap(), SynthParams::default());
        assert!(init.macros.is_empty());
    }

    #[test]
    fn test_pipe_uses_units() {
        let params = get_factory_preset("pipe").unwrap().to_params().unwrap();
        assert_eq!(params.exciter(), ExciterKind::Noise);
        assert_eq!(params.get(Param::Attack), 0.05);
        assert_eq!(params.get(Param::EvenGain), 0.1);
    }

    #[test]
    fn test_gong_folds() {
        let params = get_factory_preset("gong").unwrap().to_params().unwrap();
        assert_eq!(params.foldback().mode, FoldbackMode::Foldback);
        assert_eq!(params.get(Param::FoldbackPoint), 900.0);
    }
}

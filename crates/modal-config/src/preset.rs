//! Patch file format and operations.

use modal_core::ParamId;
use modal_synth::{MACRO_SLOTS, MacroBank, MacroSlot, ModalSynth, Param, SynthParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{
    ValidationError, parse_param, resolve_param, validate_macro, validate_patch,
};
use crate::value::{ParamValue, widen};

/// Saved synth state: parameter values and macro mappings.
///
/// Parameters missing from `[params]` keep their defaults, so a patch only
/// needs to list what it changes.
///
/// # TOML Format
///
/// ```toml
/// name = "Gong"
/// description = "Folded, slightly detuned partials"
/// sample_rate = 48000
///
/// [params]
/// foldback_mode = "Foldback"
/// foldback_point = "900Hz"
/// detune = 0.15
/// decay = 5.0
///
/// [[macros]]
/// target = "foldback_point"
/// low = 0.35
/// high = 0.75
/// value = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate hint (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Parameter values keyed by string id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, ParamValue>,

    /// Macro slots in order; at most three.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub macros: Vec<MacroConfig>,
}

fn default_sample_rate() -> u32 {
    48000
}

/// One `[[macros]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MacroConfig {
    /// String id of the driven parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Normalized target value at macro value 0.
    #[serde(default)]
    pub low: f64,
    /// Normalized target value at macro value 1.
    #[serde(default = "default_high")]
    pub high: f64,
    /// Macro value.
    #[serde(default)]
    pub value: f64,
}

fn default_high() -> f64 {
    1.0
}

impl Default for MacroConfig {
    fn default() -> Self {
        Self {
            target: None,
            low: 0.0,
            high: 1.0,
            value: 0.0,
        }
    }
}

impl MacroConfig {
    /// Creates a macro entry.
    pub fn new(target: Option<&str>, low: f64, high: f64, value: f64) -> Self {
        Self {
            target: target.map(str::to_string),
            low,
            high,
            value,
        }
    }

    /// Captures a runtime slot. Targets the synth does not know are dropped.
    pub fn from_slot(slot: &MacroSlot) -> Self {
        Self {
            target: slot
                .target
                .and_then(param_by_id)
                .map(|p| p.descriptor().string_id.to_string()),
            low: widen(slot.low),
            high: widen(slot.high),
            value: widen(slot.value),
        }
    }
}

fn param_by_id(id: ParamId) -> Option<Param> {
    Param::ALL.iter().copied().find(|p| p.descriptor().id == id)
}

impl Patch {
    /// Create a new patch that leaves every parameter at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            params: BTreeMap::new(),
            macros: Vec::new(),
        }
    }

    /// Create a patch with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set a parameter by string id.
    pub fn with_param(mut self, id: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(id.into(), value.into());
        self
    }

    /// Append a macro entry.
    pub fn with_macro(mut self, config: MacroConfig) -> Self {
        self.macros.push(config);
        self
    }

    /// Captures a full parameter snapshot and macro bank.
    ///
    /// Every parameter is written, choices by label. Trailing unmapped
    /// default macro slots are omitted.
    pub fn from_state(
        name: impl Into<String>,
        params: &SynthParams,
        macros: &MacroBank<MACRO_SLOTS>,
    ) -> Self {
        let params = Param::ALL
            .iter()
            .map(|&param| {
                let desc = param.descriptor();
                let value = params.get(param);
                let value = match desc.choice_label(value) {
                    Some(label) if desc.is_choice() => ParamValue::from(label),
                    _ => ParamValue::from_f32(value),
                };
                (desc.string_id.to_string(), value)
            })
            .collect();

        let mut macros: Vec<MacroConfig> = macros.slots().iter().map(MacroConfig::from_slot).collect();
        while macros.last().is_some_and(|m| *m == MacroConfig::default()) {
            macros.pop();
        }

        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            params,
            macros,
        }
    }

    /// Captures the current state of a running synth.
    pub fn from_synth<const V: usize, const M: usize>(
        name: impl Into<String>,
        synth: &ModalSynth<V, M>,
    ) -> Self {
        let mut patch = Self::from_state(name, synth.params(), synth.macros());
        patch.sample_rate = synth.sample_rate() as u32;
        patch
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %patch.name, "loaded patch");
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating the parent directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved patch");
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolves `[params]` into a parameter snapshot over the defaults.
    pub fn to_params(&self) -> Result<SynthParams, ConfigError> {
        validate_patch(self)?;
        let mut params = SynthParams::default();
        for (id, value) in &self.params {
            let param = resolve_param(id)?;
            params.set(param, parse_param(param, value)?);
        }
        Ok(params)
    }

    /// Resolves `[[macros]]` into a macro bank.
    pub fn to_macros(&self) -> Result<MacroBank<MACRO_SLOTS>, ConfigError> {
        let mut bank = MacroBank::new();
        for (index, config) in self.macros.iter().enumerate() {
            let target = validate_macro(index, config)?.map(|p| p.descriptor().id);
            bank.set_slot(
                index,
                MacroSlot {
                    target,
                    low: config.low as f32,
                    high: config.high as f32,
                    value: config.value as f32,
                },
            );
        }
        Ok(bank)
    }

    /// Loads parameters and macros into `synth`.
    ///
    /// The synth is left untouched if the patch does not validate.
    pub fn apply_to<const V: usize, const M: usize>(
        &self,
        synth: &mut ModalSynth<V, M>,
    ) -> Result<(), ConfigError> {
        let params = self.to_params()?;
        let macros = self.to_macros()?;
        synth.load_params(params);
        for (index, slot) in macros.slots().iter().enumerate() {
            if !synth.set_macro_slot(index, *slot) {
                return Err(ValidationError::InvalidMacroSlot {
                    slot: index,
                    reason: "rejected by the synth".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

//! Parameter introspection for discoverable synth parameters.
//!
//! The [`ParameterInfo`] trait exposes a processor's parameters by index,
//! each described by a [`ParamDescriptor`]. Front ends use it to:
//!
//! - list parameters with ranges and units,
//! - resolve a parameter from its stable string ID (patch files, `--set`),
//! - drive a parameter from a normalized 0..1 control (macros).
//!
//! Choice parameters (exciter kind, foldback mode) carry their labels in
//! [`ParamDescriptor::choices`] and store the selected index as a float.
//!
//! # Example
//!
//! ```rust
//! use modal_core::{ParameterInfo, ParamDescriptor, ParamId, ParamUnit};
//!
//! struct Decay {
//!     seconds: f32,
//! }
//!
//! impl ParameterInfo for Decay {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::continuous("Decay", "Decay", ParamUnit::Seconds, 0.1, 5.0, 1.0)
//!                 .with_id(ParamId(100), "decay")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         if index == 0 { self.seconds } else { 0.0 }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.seconds = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut d = Decay { seconds: 1.0 };
//! let idx = d.find_param_by_string_id("decay").unwrap();
//! d.set_param(idx, 9.0);
//! assert_eq!(d.get_param(idx), 5.0);
//! ```

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values. Requires `min > 0.0`.
    Logarithmic,
}

/// Stable parameter identifier that survives reordering.
///
/// Once assigned, a `ParamId` never changes for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// ```rust
/// use modal_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::NONE.contains(ParamFlags::AUTOMATABLE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Can be automated or driven by a macro.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Takes discrete integer steps (choices, mode counts).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Index-based access to a processor's parameters.
///
/// Indices are zero-based and stable for the lifetime of the instance.
/// Implementations clamp values in [`set_param`](Self::set_param) and ignore
/// out-of-range indices.
pub trait ParameterInfo {
    /// Number of parameters. Valid indices are `0..param_count()`.
    fn param_count(&self) -> usize;

    /// Descriptor for the parameter at `index`, `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current plain value, `0.0` for out-of-range indices.
    fn get_param(&self, index: usize) -> f32;

    /// Sets a plain value, clamped to the descriptor's range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Finds a parameter index by its stable string ID (exact match).
    fn find_param_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }

    /// Stable [`ParamId`] for the parameter at `index`.
    fn param_id(&self, index: usize) -> Option<ParamId> {
        self.param_info(index).map(|d| d.id)
    }

    /// Finds a parameter index by its stable [`ParamId`].
    ///
    /// O(n) scan, meant for setup paths.
    fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.id == id))
    }

    /// Gets a parameter's value normalized to 0..1.
    fn get_param_normalized(&self, index: usize) -> f32 {
        self.param_info(index)
            .map(|d| d.normalize(self.get_param(index)))
            .unwrap_or(0.0)
    }

    /// Sets a parameter from a normalized 0..1 value.
    ///
    /// Stepped parameters are rounded to the nearest step.
    fn set_param_normalized(&mut self, index: usize, normalized: f32) {
        if let Some(desc) = self.param_info(index) {
            let value = desc.denormalize(normalized.clamp(0.0, 1.0));
            self.set_param(index, desc.quantize(value));
        }
    }
}

/// Metadata for a single parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name.
    pub name: &'static str,
    /// Short display name, 8 characters or less.
    pub short_name: &'static str,
    /// Unit for formatting.
    pub unit: ParamUnit,
    /// Minimum plain value.
    pub min: f32,
    /// Maximum plain value.
    pub max: f32,
    /// Default plain value.
    pub default: f32,
    /// Recommended increment for encoders and stepped rounding.
    pub step: f32,
    /// Stable numeric ID.
    pub id: ParamId,
    /// Stable string ID used by patch files and the command line.
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Labels for choice parameters, indexed by value. Empty otherwise.
    pub choices: &'static [&'static str],
}

impl ParamDescriptor {
    /// Continuous parameter with a linear scale.
    pub const fn continuous(
        name: &'static str,
        short_name: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit,
            min,
            max,
            default,
            step: 0.01,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            choices: &[],
        }
    }

    /// Time parameter in seconds.
    pub const fn seconds(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::Seconds, min, max, default)
    }

    /// Frequency parameter in Hz with a logarithmic scale.
    pub const fn frequency(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::Hertz, min, max, default)
            .with_scale(ParamScale::Logarithmic)
            .with_step(1.0)
    }

    /// Integer-valued parameter.
    pub const fn integer(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::continuous(name, short_name, ParamUnit::None, min, max, default)
            .with_step(1.0)
            .with_flags(ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED))
    }

    /// Choice parameter: the value is an index into `choices`.
    ///
    /// ```rust
    /// use modal_core::ParamDescriptor;
    ///
    /// const MODES: &[&str] = &["Normal", "Undertones", "Foldback"];
    /// let desc = ParamDescriptor::choice("Foldback Mode", "Fold", MODES, 0);
    /// assert_eq!(desc.max, 2.0);
    /// assert_eq!(desc.choice_label(1.0), Some("Undertones"));
    /// assert_eq!(desc.choice_index("foldback"), Some(2));
    /// ```
    pub const fn choice(
        name: &'static str,
        short_name: &'static str,
        choices: &'static [&'static str],
        default: usize,
    ) -> Self {
        let max = if choices.is_empty() { 0 } else { choices.len() - 1 };
        let mut desc = Self::integer(name, short_name, 0.0, max as f32, default as f32);
        desc.choices = choices;
        desc
    }

    /// Sets the stable parameter ID and string ID.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the normalization scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the parameter flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the step size.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Whether the parameter takes discrete steps.
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Whether the parameter is a choice list.
    pub const fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Clamps a value to this parameter's range. NaN maps to the default.
    ///
    /// ```rust
    /// use modal_core::{ParamDescriptor, ParamUnit};
    ///
    /// let desc = ParamDescriptor::continuous("Falloff", "Falloff", ParamUnit::None, 0.0, 3.0, 1.0);
    /// assert_eq!(desc.clamp(-1.0), 0.0);
    /// assert_eq!(desc.clamp(4.0), 3.0);
    /// assert_eq!(desc.clamp(f32::NAN), 1.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Clamps and, for stepped parameters, rounds to the nearest integer step.
    #[inline]
    pub fn quantize(&self, value: f32) -> f32 {
        let value = self.clamp(value);
        if self.is_stepped() {
            libm::roundf(value)
        } else {
            value
        }
    }

    /// Plain value to normalized 0..1, respecting [`ParamScale`].
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        }
    }

    /// Normalized 0..1 to plain value. Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        match self.scale {
            ParamScale::Linear => self.min + normalized * (self.max - self.min),
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return self.min;
                }
                self.min * libm::powf(self.max / self.min, normalized)
            }
        }
    }

    /// Label of the choice selected by `value`, if this is a choice parameter.
    pub fn choice_label(&self, value: f32) -> Option<&'static str> {
        if value < 0.0 {
            return None;
        }
        self.choices.get(libm::roundf(value) as usize).copied()
    }

    /// Index of a choice label (case-insensitive).
    pub fn choice_index(&self, label: &str) -> Option<usize> {
        self.choices
            .iter()
            .position(|choice| choice.eq_ignore_ascii_case(label))
    }
}

/// Unit type for parameter display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Hertz.
    Hertz,
    /// Seconds, for envelope and decay times.
    Seconds,
    /// Frequency or gain ratio.
    Ratio,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Unit suffix for display.
    ///
    /// ```rust
    /// use modal_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::Seconds.suffix(), " s");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Ratio => "x",
            ParamUnit::None => "",
        }
    }
}

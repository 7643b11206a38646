//! Parameter surface of the modal synth.
//!
//! [`SynthParams`] is a flat snapshot of every musical parameter, addressed
//! by [`Param`] or by index through [`ParameterInfo`]. Once per block the
//! engine pushes the snapshot into each voice with [`SynthParams::apply_to`],
//! which recomputes the resonator bank only when something it depends on
//! changed.

use modal_core::{ParamDescriptor, ParamId, ParamUnit, ParameterInfo};

use crate::exciter::ExciterKind;
use crate::voice::{
    DEFAULT_FOLDBACK_POINT, FoldbackMode, FoldbackSettings, MAX_MODES, ModalVoice, ModeParams,
};

/// First numeric parameter ID. IDs are assigned in [`Param`] order.
pub const PARAM_ID_BASE: u32 = 100;

/// Number of synth parameters.
pub const PARAM_COUNT: usize = 20;

/// Synth parameter, in index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Param {
    /// Extra gain on odd-indexed modes.
    EvenGain,
    /// [`FoldbackMode`] choice.
    FoldbackMode,
    /// Fold point in Hz.
    FoldbackPoint,
    /// [`ExciterKind`] choice.
    Exciter,
    /// Note-to-exciter frequency divider.
    ExciterRate,
    /// Exciter envelope attack in seconds.
    Attack,
    /// Exciter envelope release in seconds.
    Release,
    /// Number of sounding modes.
    Modes,
    /// Linear inharmonicity.
    Detune,
    /// Overtone exponent.
    Exponent,
    /// Mode gain falloff exponent.
    Falloff,
    /// Base decay in seconds.
    Decay,
    /// Vowel openness.
    FormantX,
    /// Vowel frontness.
    FormantY,
    /// Throat length.
    FormantLength,
    /// Formant wet mix.
    FormantMix,
    /// Detune scale for odd-indexed modes.
    OddFreq,
    /// Detune scale for every third mode.
    ThirdFreq,
    /// Gain scale for odd-indexed modes.
    OddGain,
    /// Gain scale for every third mode.
    ThirdGain,
}

impl Param {
    /// All parameters in index order.
    pub const ALL: [Self; PARAM_COUNT] = [
        Self::EvenGain,
        Self::FoldbackMode,
        Self::FoldbackPoint,
        Self::Exciter,
        Self::ExciterRate,
        Self::Attack,
        Self::Release,
        Self::Modes,
        Self::Detune,
        Self::Exponent,
        Self::Falloff,
        Self::Decay,
        Self::FormantX,
        Self::FormantY,
        Self::FormantLength,
        Self::FormantMix,
        Self::OddFreq,
        Self::ThirdFreq,
        Self::OddGain,
        Self::ThirdGain,
    ];

    /// Parameter at an index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Index of this parameter.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Descriptor for this parameter.
    pub const fn descriptor(self) -> ParamDescriptor {
        DESCRIPTORS[self.index()]
    }
}

const fn id(param: Param) -> ParamId {
    ParamId(PARAM_ID_BASE + param as u32)
}

/// Descriptors for every parameter, in [`Param`] order.
pub const DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::continuous("Even Mode Amplitudes", "Even", ParamUnit::Ratio, 0.0, 1.0, 1.0)
        .with_id(id(Param::EvenGain), "even_gain"),
    ParamDescriptor::choice("Foldback Mode", "Fold", FoldbackMode::LABELS, 0)
        .with_id(id(Param::FoldbackMode), "foldback_mode"),
    ParamDescriptor::frequency("Foldback Point", "FoldPt", 20.0, 20000.0, DEFAULT_FOLDBACK_POINT)
        .with_id(id(Param::FoldbackPoint), "foldback_point"),
    ParamDescriptor::choice("Exciter", "Exciter", ExciterKind::LABELS, 0)
        .with_id(id(Param::Exciter), "exciter"),
    ParamDescriptor::continuous("Exciter Rate Divider", "ExcRate", ParamUnit::Ratio, 1.0, 100.0, 4.0)
        .with_id(id(Param::ExciterRate), "exciter_rate"),
    ParamDescriptor::seconds("Attack", "Attack", 0.0, 5.0, 0.5)
        .with_id(id(Param::Attack), "attack"),
    ParamDescriptor::seconds("Release", "Release", 0.0, 5.0, 0.5)
        .with_id(id(Param::Release), "release"),
    ParamDescriptor::integer("Mode Count", "Modes", 1.0, MAX_MODES as f32, MAX_MODES as f32)
        .with_id(id(Param::Modes), "modes"),
    ParamDescriptor::continuous("Mode Detune Linear", "Detune", ParamUnit::None, -0.06, 2.0, 0.0)
        .with_id(id(Param::Detune), "detune")
        .with_step(0.001),
    ParamDescriptor::continuous("Mode Detune Exponent", "Exp", ParamUnit::None, 0.1, 10.0, 1.0)
        .with_id(id(Param::Exponent), "exponent"),
    ParamDescriptor::continuous("Falloff Exponent", "Falloff", ParamUnit::None, 0.0, 3.0, 1.0)
        .with_id(id(Param::Falloff), "falloff"),
    ParamDescriptor::seconds("Decay", "Decay", 0.1, 5.0, 1.0).with_id(id(Param::Decay), "decay"),
    ParamDescriptor::continuous("Formant X", "FormX", ParamUnit::None, 0.0, 1.0, 0.5)
        .with_id(id(Param::FormantX), "formant_x"),
    ParamDescriptor::continuous("Formant Y", "FormY", ParamUnit::None, 0.0, 1.0, 0.5)
        .with_id(id(Param::FormantY), "formant_y"),
    ParamDescriptor::continuous("Throat Length", "Throat", ParamUnit::None, 0.0, 1.0, 0.5)
        .with_id(id(Param::FormantLength), "formant_len"),
    ParamDescriptor::continuous("Formant Mix", "FormMix", ParamUnit::Ratio, 0.0, 1.0, 0.0)
        .with_id(id(Param::FormantMix), "formant_mix"),
    ParamDescriptor::continuous("Odd Mode Detune Scale", "OddFrq", ParamUnit::Ratio, 0.0, 2.0, 1.0)
        .with_id(id(Param::OddFreq), "odd_freq"),
    ParamDescriptor::continuous("Third Mode Detune Scale", "3rdFrq", ParamUnit::Ratio, 0.0, 2.0, 1.0)
        .with_id(id(Param::ThirdFreq), "third_freq"),
    ParamDescriptor::continuous("Odd Mode Gain", "OddGain", ParamUnit::Ratio, 0.0, 2.0, 1.0)
        .with_id(id(Param::OddGain), "odd_gain"),
    ParamDescriptor::continuous("Third Mode Gain", "3rdGain", ParamUnit::Ratio, 0.0, 2.0, 1.0)
        .with_id(id(Param::ThirdGain), "third_gain"),
];

/// Snapshot of every synth parameter as plain values.
///
/// # Example
///
/// ```rust
/// use modal_core::ParameterInfo;
/// use modal_synth::{Param, SynthParams};
///
/// let mut params = SynthParams::default();
/// assert!(params.set(Param::Decay, 2.5));
/// assert!(!params.set(Param::Decay, 2.5));
/// assert_eq!(params.get(Param::Decay), 2.5);
///
/// let idx = params.find_param_by_string_id("exciter").unwrap();
/// params.set_param(idx, 1.0);
/// assert_eq!(params.exciter().label(), "Blow");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    values: [f32; PARAM_COUNT],
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            values: core::array::from_fn(|i| DESCRIPTORS[i].default),
        }
    }
}

impl SynthParams {
    /// Plain value of a parameter.
    #[inline]
    pub fn get(&self, param: Param) -> f32 {
        self.values[param.index()]
    }

    /// Sets a parameter, clamped and rounded per its descriptor.
    ///
    /// NaN is ignored. Returns `true` if the stored value changed.
    pub fn set(&mut self, param: Param, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = param.descriptor().quantize(value);
        let slot = &mut self.values[param.index()];
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Resets every parameter to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Mode parameters for the resonator bank.
    pub fn mode_params(&self) -> ModeParams {
        ModeParams {
            modes: self.get(Param::Modes) as usize,
            inharmonicity: self.get(Param::Detune),
            exponent: self.get(Param::Exponent),
            exciter_rate: self.get(Param::ExciterRate),
            decay: self.get(Param::Decay),
            falloff: self.get(Param::Falloff),
            even_gain: self.get(Param::EvenGain),
        }
    }

    /// Foldback policy.
    pub fn foldback(&self) -> FoldbackSettings {
        FoldbackSettings {
            mode: FoldbackMode::from_index(self.get(Param::FoldbackMode) as usize),
            point: self.get(Param::FoldbackPoint),
        }
    }

    /// Selected exciter.
    pub fn exciter(&self) -> ExciterKind {
        ExciterKind::from_index(self.get(Param::Exciter) as usize)
    }

    /// Odd and third mode detune scales.
    pub fn mode_freqs(&self) -> [f32; 2] {
        [self.get(Param::OddFreq), self.get(Param::ThirdFreq)]
    }

    /// Odd and third mode gain scales.
    pub fn mode_gains(&self) -> [f32; 2] {
        [self.get(Param::OddGain), self.get(Param::ThirdGain)]
    }

    /// Pushes the snapshot into one voice.
    ///
    /// The resonator bank is recomputed only if a parameter it depends on
    /// changed. Returns whether it was.
    pub fn apply_to<const MODES: usize>(&self, voice: &mut ModalVoice<MODES>) -> bool {
        voice.set_env_params(self.get(Param::Attack), self.get(Param::Release));

        let changed = voice.set_params(self.mode_params())
            | voice.set_foldback_settings(self.foldback())
            | voice.set_mode_freqs(self.mode_freqs())
            | voice.set_mode_gains(self.mode_gains());

        voice.set_exciter(self.exciter());
        voice.set_formant_params(
            self.get(Param::FormantX),
            self.get(Param::FormantY),
            self.get(Param::FormantLength),
            self.get(Param::FormantMix),
        );

        if changed {
            voice.update_mode_coefficients();
        }
        changed
    }
}

impl ParameterInfo for SynthParams {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        DESCRIPTORS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if let Some(param) = Param::from_index(index) {
            self.set(param, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_order_matches_enum() {
        for (i, param) in Param::ALL.iter().enumerate() {
            assert_eq!(param.index(), i);
            assert_eq!(DESCRIPTORS[i].id, ParamId(PARAM_ID_BASE + i as u32));
        }
    }

    #[test]
    fn test_string_ids_unique() {
        for (i, a) in DESCRIPTORS.iter().enumerate() {
            assert!(!a.string_id.is_empty(), "param {} has no string id", i);
            for b in &DESCRIPTORS[i + 1..] {
                assert_ne!(a.string_id, b.string_id);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let params = SynthParams::default();
        assert_eq!(params.get(Param::Modes), 40.0);
        assert_eq!(params.get(Param::FoldbackPoint), 1600.0);
        assert_eq!(params.get(Param::FormantMix), 0.0);
        assert_eq!(params.exciter(), ExciterKind::Impulse);
        assert_eq!(params.foldback(), FoldbackSettings::default());
        assert_eq!(params.mode_params(), ModeParams::default());
        assert_eq!(params.mode_freqs(), [1.0, 1.0]);
    }

    #[test]
    fn test_set_clamps_and_reports_change() {
        let mut params = SynthParams::default();
        assert!(params.set(Param::Falloff, 10.0));
        assert_eq!(params.get(Param::Falloff), 3.0);
        assert!(!params.set(Param::Falloff, 5.0), "clamped to the same value");
        assert!(params.set(Param::Modes, 7.4));
        assert_eq!(params.get(Param::Modes), 7.0);
    }

    #[test]
    fn test_choice_params() {
        let mut params = SynthParams::default();
        params.set(Param::FoldbackMode, 1.0);
        assert_eq!(params.foldback().mode, FoldbackMode::Undertones);
        params.set(Param::Exciter, 3.0);
        assert_eq!(params.exciter(), ExciterKind::Square);
        assert_eq!(Param::Exciter.descriptor().choice_label(4.0), Some("Chirp"));
    }

    #[test]
    fn test_parameter_info_lookup() {
        let mut params = SynthParams::default();
        assert_eq!(params.param_count(), PARAM_COUNT);
        let idx = params.find_param_by_string_id("formant_len").unwrap();
        assert_eq!(Param::from_index(idx), Some(Param::FormantLength));
        assert_eq!(params.param_index_by_id(ParamId(111)), Some(Param::Decay.index()));

        params.set_param(idx, 0.25);
        assert_eq!(params.get(Param::FormantLength), 0.25);
        params.set_param(99, 1.0);
        assert_eq!(params.get_param(99), 0.0);
    }

    #[test]
    fn test_normalized_foldback_point_is_logarithmic() {
        let mut params = SynthParams::default();
        let idx = Param::FoldbackPoint.index();
        params.set_param_normalized(idx, 0.5);
        // geometric mean of 20 and 20000
        let point = params.get(Param::FoldbackPoint);
        assert!((point - 632.456).abs() < 0.05, "midpoint was {}", point);
    }

    #[test]
    fn test_apply_recomputes_only_on_change() {
        let params = SynthParams::default();
        let mut voice: ModalVoice<MAX_MODES> = ModalVoice::new(48000.0);
        assert!(!params.apply_to(&mut voice), "defaults match a fresh voice");

        let mut params = params;
        params.set(Param::Attack, 1.0);
        assert!(!params.apply_to(&mut voice), "envelope times do not touch modes");

        params.set(Param::Modes, 4.0);
        assert!(params.apply_to(&mut voice));
        assert_eq!(voice.mode_count(), 4);
        assert!(!params.apply_to(&mut voice));

        params.set(Param::ThirdGain, 0.5);
        assert!(params.apply_to(&mut voice));
        let expected = 2.0 / 3.0 * 0.5;
        let amp = voice.resonator(2).unwrap().amplitude();
        assert!((amp - expected).abs() < 1e-6, "third mode amp {}", amp);
    }

    #[test]
    fn test_apply_pushes_exciter_and_formant() {
        let mut params = SynthParams::default();
        params.set(Param::Exciter, 1.0);
        params.set(Param::FormantMix, 0.75);
        let mut voice: ModalVoice<8> = ModalVoice::new(48000.0);
        params.apply_to(&mut voice);
        assert_eq!(voice.exciter_kind(), ExciterKind::Noise);
        assert_eq!(voice.formant_mix(), 0.75);
    }

    #[test]
    fn test_nan_is_ignored() {
        let mut params = SynthParams::default();
        assert!(params.set(Param::Decay, 2.0));
        assert!(!params.set(Param::Decay, f32::NAN));
        assert!(!params.set(Param::Decay, f32::NAN));
        assert_eq!(params.get(Param::Decay), 2.0);

        assert!(params.set(Param::Decay, f32::INFINITY));
        assert_eq!(params.get(Param::Decay), 5.0);
    }
}

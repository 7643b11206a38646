//! Modal voice: an exciter driving a bank of complex resonators.
//!
//! A voice derives every mode's frequency, gain and decay from a small set
//! of musical parameters. For mode `i` (0-based) with harmonic number
//! `k = i + 1`:
//!
//! ```text
//! overtone = k * (1 + i * inharmonicity * freq_shape(i))
//! freq     = note * overtone^exponent        (Normal, Foldback)
//!          = note / overtone^exponent        (Undertones)
//! freq     = 2 * point - freq                (Foldback, when freq > point)
//! distance = 2 / k^falloff * gain_shape(i) * (even_gain if i is odd)
//! mode     = Resonator(freq, distance, distance * decay)
//! ```
//!
//! Recomputing the bank is O(modes) and is never done implicitly by the
//! setters: they report whether anything changed and the caller decides
//! when to call [`ModalVoice::update_mode_coefficients`].

use libm::powf;
use modal_core::{Resonator, lerp};

use crate::controller::Voice;
use crate::envelope::{AhrEnvelope, EnvelopeState};
use crate::exciter::{Exciter, ExciterKind};
use crate::formant::{FormantArch, FormantFilter};

/// Largest mode count a standard voice carries.
pub const MAX_MODES: usize = 40;

/// Default fold point in Hz.
pub const DEFAULT_FOLDBACK_POINT: f32 = 1600.0;

/// Policy for mode frequencies that leave the intended range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FoldbackMode {
    /// Modes stack upward; anything at or above Nyquist is muted ("Normal").
    #[default]
    NyquistStop,
    /// Modes divide the note frequency and fall below the root.
    Undertones,
    /// Modes above the fold point are mirrored back down around it.
    Foldback,
}

impl FoldbackMode {
    /// Display labels, indexed by [`index`](Self::index).
    pub const LABELS: &'static [&'static str] = &["Normal", "Undertones", "Foldback"];

    /// All modes in index order.
    pub const ALL: [Self; 3] = [Self::NyquistStop, Self::Undertones, Self::Foldback];

    /// Mode for a choice index. Out-of-range indices clamp to the last mode.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Choice index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }
}

/// Foldback policy and its fold point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoldbackSettings {
    /// Policy.
    pub mode: FoldbackMode,
    /// Fold point in Hz, used by [`FoldbackMode::Foldback`].
    pub point: f32,
}

impl Default for FoldbackSettings {
    fn default() -> Self {
        Self {
            mode: FoldbackMode::NyquistStop,
            point: DEFAULT_FOLDBACK_POINT,
        }
    }
}

impl FoldbackSettings {
    /// Applies the policy to a mode with the given overtone ratio.
    ///
    /// `ratio` is `overtone^exponent`.
    #[inline]
    pub fn mode_frequency(&self, note: f32, ratio: f32) -> f32 {
        match self.mode {
            FoldbackMode::NyquistStop => note * ratio,
            FoldbackMode::Undertones => note / ratio,
            FoldbackMode::Foldback => {
                let freq = note * ratio;
                if freq > self.point {
                    2.0 * self.point - freq
                } else {
                    freq
                }
            }
        }
    }
}

/// Per-mode multipliers for every second and every third mode.
///
/// Slot 0 applies to odd-indexed modes (`i % 2 == 1`), slot 1 to modes with
/// `i % 3 == 2`. A mode matching both gets the product. Mode 0 is always 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeShaping {
    /// Scales the inharmonicity term.
    pub freq: [f32; 2],
    /// Scales the mode distance.
    pub gain: [f32; 2],
}

impl Default for ModeShaping {
    fn default() -> Self {
        Self {
            freq: [1.0; 2],
            gain: [1.0; 2],
        }
    }
}

impl ModeShaping {
    #[inline]
    fn factor(values: [f32; 2], mode: usize) -> f32 {
        let mut factor = 1.0;
        if mode % 2 == 1 {
            factor *= values[0];
        }
        if mode % 3 == 2 {
            factor *= values[1];
        }
        factor
    }

    /// Inharmonicity multiplier for a 0-based mode index.
    #[inline]
    pub fn freq_factor(&self, mode: usize) -> f32 {
        Self::factor(self.freq, mode)
    }

    /// Gain multiplier for a 0-based mode index.
    #[inline]
    pub fn gain_factor(&self, mode: usize) -> f32 {
        Self::factor(self.gain, mode)
    }
}

/// Musical parameters that determine the resonator bank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeParams {
    /// Number of sounding modes (clamped to the voice capacity, at least 1).
    pub modes: usize,
    /// Linear stretch of overtone ratios.
    pub inharmonicity: f32,
    /// Exponent applied to overtone ratios.
    pub exponent: f32,
    /// Divider from note frequency to exciter frequency.
    pub exciter_rate: f32,
    /// Base decay time in seconds, scaled per mode by its distance.
    pub decay: f32,
    /// How fast mode gain falls with harmonic number.
    pub falloff: f32,
    /// Extra gain on odd-indexed (even-numbered) modes.
    pub even_gain: f32,
}

impl Default for ModeParams {
    fn default() -> Self {
        Self {
            modes: MAX_MODES,
            inharmonicity: 0.0,
            exponent: 1.0,
            exciter_rate: 4.0,
            decay: 1.0,
            falloff: 1.0,
            even_gain: 1.0,
        }
    }
}

/// One playable modal voice with capacity for `MODES` resonators.
///
/// # Example
///
/// ```rust
/// use modal_synth::{ModalVoice, ModeParams};
///
/// let mut voice: ModalVoice<8> = ModalVoice::new(48000.0);
/// let changed = voice.set_params(ModeParams { modes: 4, ..ModeParams::default() });
/// if changed {
///     voice.update_mode_coefficients();
/// }
/// voice.on(220.0, 1.0);
/// let sample = voice.tick();
/// assert!(sample.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct ModalVoice<const MODES: usize> {
    resonators: [Resonator; MODES],
    params: ModeParams,
    foldback: FoldbackSettings,
    shaping: ModeShaping,
    freq: f32,
    velocity: f32,
    exciter: Exciter,
    env: AhrEnvelope,
    formant: FormantFilter,
    formant_mix: f32,
}

impl<const MODES: usize> Default for ModalVoice<MODES> {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl<const MODES: usize> ModalVoice<MODES> {
    /// Creates a silent voice with default parameters at 440 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, 0x12345678)
    }

    /// Creates a voice whose noise exciter uses the given seed.
    pub fn with_seed(sample_rate: f32, seed: u32) -> Self {
        let mut voice = Self {
            resonators: core::array::from_fn(|_| Resonator::new(sample_rate)),
            params: ModeParams {
                modes: MODES.max(1),
                ..ModeParams::default()
            },
            foldback: FoldbackSettings::default(),
            shaping: ModeShaping::default(),
            freq: 440.0,
            velocity: 0.0,
            exciter: Exciter::with_seed(sample_rate, seed),
            env: AhrEnvelope::new(sample_rate),
            formant: FormantFilter::new(sample_rate),
            formant_mix: 0.0,
        };
        voice.params.modes = voice.params.modes.min(MODES);
        voice.update_mode_coefficients();
        voice
    }

    /// Mode capacity.
    pub const fn capacity(&self) -> usize {
        MODES
    }

    /// Sets the mode parameters. Returns `true` if anything changed.
    ///
    /// Does not recompute the bank.
    pub fn set_params(&mut self, params: ModeParams) -> bool {
        let params = ModeParams {
            modes: params.modes.min(MODES).max(MODES.min(1)),
            ..params
        };
        let changed = params != self.params;
        self.params = params;
        changed
    }

    /// Current mode parameters.
    pub fn mode_params(&self) -> &ModeParams {
        &self.params
    }

    /// Sets the foldback policy. Returns `true` if it changed.
    pub fn set_foldback_settings(&mut self, settings: FoldbackSettings) -> bool {
        let changed = settings != self.foldback;
        self.foldback = settings;
        changed
    }

    /// Current foldback policy.
    pub fn foldback_settings(&self) -> FoldbackSettings {
        self.foldback
    }

    /// Sets the odd/third mode frequency multipliers. Returns `true` if changed.
    pub fn set_mode_freqs(&mut self, freq: [f32; 2]) -> bool {
        let changed = freq != self.shaping.freq;
        self.shaping.freq = freq;
        changed
    }

    /// Sets the odd/third mode gain multipliers. Returns `true` if changed.
    pub fn set_mode_gains(&mut self, gain: [f32; 2]) -> bool {
        let changed = gain != self.shaping.gain;
        self.shaping.gain = gain;
        changed
    }

    /// Current per-mode shaping.
    pub fn mode_shaping(&self) -> ModeShaping {
        self.shaping
    }

    /// Selects the exciter.
    ///
    /// Leaving the noise exciter resets the envelope so a held gate does not
    /// keep blowing into the next patch.
    pub fn set_exciter(&mut self, kind: ExciterKind) {
        if self.exciter.kind() == ExciterKind::Noise && kind != ExciterKind::Noise {
            self.env.reset();
        }
        self.exciter.set_kind(kind);
    }

    /// Current exciter kind.
    pub fn exciter_kind(&self) -> ExciterKind {
        self.exciter.kind()
    }

    /// Sets the exciter envelope's attack and release in seconds.
    pub fn set_env_params(&mut self, attack: f32, release: f32) {
        self.env.set_params(attack, release);
    }

    /// Current exciter envelope stage.
    pub fn envelope_state(&self) -> EnvelopeState {
        self.env.state()
    }

    /// Places the formant filter and sets its wet mix.
    ///
    /// The third formant is held at its midpoint. A mix of 0 bypasses the
    /// filter entirely.
    pub fn set_formant_params(&mut self, x: f32, y: f32, length: f32, mix: f32) {
        self.formant.set_vowel(x, y, 0.5, length);
        self.formant_mix = mix.clamp(0.0, 1.0);
    }

    /// Selects the formant architecture.
    pub fn set_formant_arch(&mut self, arch: FormantArch) {
        self.formant.set_arch(arch);
    }

    /// Formant filter, for per-band gain control.
    pub fn formant_mut(&mut self) -> &mut FormantFilter {
        &mut self.formant
    }

    /// Current formant mix.
    pub fn formant_mix(&self) -> f32 {
        self.formant_mix
    }

    /// Current note frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Current velocity (0..1).
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Number of sounding modes.
    pub fn mode_count(&self) -> usize {
        self.params.modes
    }

    /// Resonator for a sounding mode.
    pub fn resonator(&self, mode: usize) -> Option<&Resonator> {
        self.resonators[..self.params.modes].get(mode)
    }

    /// Exciter frequency in Hz (`note / exciter_rate`).
    pub fn exciter_frequency(&self) -> f32 {
        self.exciter.freq()
    }

    /// Recomputes every sounding resonator from the current parameters.
    pub fn update_mode_coefficients(&mut self) {
        let ModeParams {
            modes,
            inharmonicity,
            exponent,
            exciter_rate,
            decay,
            falloff,
            even_gain,
        } = self.params;

        for (i, resonator) in self.resonators[..modes].iter_mut().enumerate() {
            let k = (i + 1) as f32;
            let overtone = k * (1.0 + i as f32 * inharmonicity * self.shaping.freq_factor(i));
            let freq = self
                .foldback
                .mode_frequency(self.freq, powf(overtone, exponent));

            let mut gain = self.shaping.gain_factor(i);
            if i % 2 == 1 {
                gain *= even_gain;
            }
            let distance = 2.0 / powf(k, falloff) * gain;

            resonator.set_params(freq, distance, distance * decay);
        }

        self.exciter.set_freq(self.freq / exciter_rate);
    }

    /// Starts a note.
    ///
    /// Recomputes the bank for the new pitch, then strikes every mode
    /// (pick exciter) or opens the exciter envelope (all other kinds).
    pub fn on(&mut self, freq: f32, velocity: f32) {
        self.freq = freq;
        self.velocity = velocity;
        self.update_mode_coefficients();

        if self.exciter.kind().is_continuous() {
            self.env.on();
        } else {
            for resonator in &mut self.resonators[..self.params.modes] {
                resonator.ping();
            }
        }
    }

    /// Releases the note. A struck note rings out on its own.
    pub fn off(&mut self) {
        if self.exciter.kind().is_continuous() {
            self.env.off();
        }
    }

    /// Produces one output sample.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let excitation = self.exciter.tick() * self.env.tick();

        let mut out = 0.0;
        for resonator in &mut self.resonators[..self.params.modes] {
            out += resonator.tick(excitation);
        }

        // filter history follows the dry signal even while bypassed
        let shaped = self.formant.tick(out);
        if self.formant_mix > 0.0 {
            out = lerp(out, shaped, self.formant_mix);
        }

        out * self.velocity * self.velocity
    }

    /// Propagates a sample-rate change to every component.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for resonator in &mut self.resonators {
            resonator.set_sample_rate(sample_rate);
        }
        self.exciter.set_sample_rate(sample_rate);
        self.env.set_sample_rate(sample_rate);
        self.formant.set_sample_rate(sample_rate);
    }
}

impl<const MODES: usize> Voice for ModalVoice<MODES> {
    fn on(&mut self, freq: f32, velocity: f32) {
        ModalVoice::on(self, freq, velocity);
    }

    fn off(&mut self) {
        ModalVoice::off(self);
    }

    fn tick(&mut self) -> f32 {
        ModalVoice::tick(self)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        ModalVoice::set_sample_rate(self, sample_rate);
    }
}

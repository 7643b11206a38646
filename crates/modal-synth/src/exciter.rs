//! Excitation sources that drive a voice's resonator bank.

use crate::phasor::{Chirp, Phasor, aa_rect, impulse_train};

const NOISE_LEVEL: f32 = 0.05;
const IMPULSES_LEVEL: f32 = 0.6;
const SQUARE_LEVEL: f32 = 0.2;
const CHIRP_LEVEL: f32 = 0.2;

/// How a voice is excited.
///
/// `Impulse` strikes the modes once at note-on and feeds no signal after
/// that. The other kinds feed a continuous signal gated by the voice's
/// attack/hold/release envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExciterKind {
    /// Single strike at note-on ("Pick").
    #[default]
    Impulse,
    /// Uniform white noise ("Blow").
    Noise,
    /// Periodic impulses at the exciter frequency.
    Impulses,
    /// Band-limited square at the exciter frequency.
    Square,
    /// Repeating 20 Hz to 20 kHz sine sweep.
    Chirp,
}

impl ExciterKind {
    /// Display labels, indexed by [`index`](Self::index).
    pub const LABELS: &'static [&'static str] = &["Pick", "Blow", "Impulses", "Square", "Chirp"];

    /// All kinds in index order.
    pub const ALL: [Self; 5] = [
        Self::Impulse,
        Self::Noise,
        Self::Impulses,
        Self::Square,
        Self::Chirp,
    ];

    /// Kind for a choice index. Out-of-range indices clamp to the last kind.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    /// Choice index of this kind.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }

    /// Whether the kind feeds a gated signal rather than a single strike.
    pub fn is_continuous(self) -> bool {
        self != Self::Impulse
    }
}

/// Signal generator for the continuous exciter kinds.
///
/// The phasor and chirp always advance so that switching kinds mid-note
/// picks up a running signal.
#[derive(Debug, Clone)]
pub struct Exciter {
    kind: ExciterKind,
    phasor: Phasor,
    chirp: Chirp,
    noise_state: u32,
}

impl Default for Exciter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Exciter {
    /// Creates a pick exciter with the default noise seed.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, 0x12345678)
    }

    /// Creates a pick exciter with an explicit noise seed.
    ///
    /// A zero seed would lock the generator at zero and is replaced.
    pub fn with_seed(sample_rate: f32, seed: u32) -> Self {
        Self {
            kind: ExciterKind::Impulse,
            phasor: Phasor::new(sample_rate),
            chirp: Chirp::new(sample_rate),
            noise_state: if seed == 0 { 0x12345678 } else { seed },
        }
    }

    /// Selects the excitation kind.
    pub fn set_kind(&mut self, kind: ExciterKind) {
        self.kind = kind;
    }

    /// Current excitation kind.
    pub fn kind(&self) -> ExciterKind {
        self.kind
    }

    /// Sets the repetition frequency of the periodic kinds in Hz.
    pub fn set_freq(&mut self, freq: f32) {
        self.phasor.set_freq(freq);
        self.chirp.set_freq(freq);
    }

    /// Repetition frequency in Hz.
    pub fn freq(&self) -> f32 {
        self.phasor.freq()
    }

    /// Sets the sample rate of the internal oscillators.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.phasor.set_sample_rate(sample_rate);
        self.chirp.set_sample_rate(sample_rate);
    }

    /// Restarts the periodic kinds at phase 0.
    pub fn reset(&mut self) {
        self.phasor.reset();
        self.chirp.reset();
    }

    /// Advances one sample and returns the raw (ungated) excitation.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        self.phasor.tick();
        let chirp = self.chirp.tick();
        match self.kind {
            ExciterKind::Impulse => 0.0,
            ExciterKind::Noise => self.noise() * NOISE_LEVEL,
            ExciterKind::Impulses => impulse_train(&self.phasor) * IMPULSES_LEVEL,
            ExciterKind::Square => aa_rect(&self.phasor, 0.5) * SQUARE_LEVEL,
            ExciterKind::Chirp => chirp * CHIRP_LEVEL,
        }
    }

    #[inline]
    fn noise(&mut self) -> f32 {
        // xorshift32
        let mut x = self.noise_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.noise_state = x;

        (x as i32 as f32) / (i32::MAX as f32)
    }
}

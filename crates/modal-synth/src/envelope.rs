//! Linear attack/release envelopes for exciter gating.
//!
//! Two shapes are provided:
//!
//! - [`ArEnvelope`]: one-shot. [`ping`](ArEnvelope::ping) rises to 1 and
//!   immediately falls back to 0.
//! - [`AhrEnvelope`]: gated. [`on`](AhrEnvelope::on) rises to 1 and holds
//!   until [`off`](AhrEnvelope::off), then falls to 0.
//!
//! Segments are linear with per-sample increments of `1 / (time * sr)`.
//! A time of zero makes the segment complete in a single sample.

/// Envelope stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Inactive, output is zero.
    #[default]
    Rest,
    /// Rising toward 1.
    Attack,
    /// Holding at 1 while the gate is open (AHR only).
    Hold,
    /// Falling toward 0.
    Release,
}

#[inline]
fn increment(time: f32, sample_rate: f32) -> f32 {
    1.0 / (time.max(0.0) * sample_rate)
}

/// One-shot attack/release envelope.
///
/// # Example
///
/// ```rust
/// use modal_synth::{ArEnvelope, EnvelopeState};
///
/// let mut env = ArEnvelope::new(48000.0);
/// env.set_params(0.0, 0.01);
/// env.ping();
/// assert_eq!(env.tick(), 1.0);
/// assert_eq!(env.state(), EnvelopeState::Release);
/// ```
#[derive(Debug, Clone)]
pub struct ArEnvelope {
    state: EnvelopeState,
    value: f32,
    attack: f32,
    release: f32,
    attack_inc: f32,
    release_inc: f32,
    sample_rate: f32,
}

impl Default for ArEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl ArEnvelope {
    /// Creates an envelope with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Rest,
            value: 0.0,
            attack: 0.01,
            release: 0.1,
            attack_inc: 0.0,
            release_inc: 0.0,
            sample_rate,
        };
        env.recalculate();
        env
    }

    /// Sets attack and release times in seconds.
    pub fn set_params(&mut self, attack: f32, release: f32) {
        self.attack = attack;
        self.release = release;
        self.recalculate();
    }

    /// Sets the sample rate and recomputes the increments.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Starts the attack from the current value.
    pub fn ping(&mut self) {
        self.state = EnvelopeState::Attack;
    }

    /// Forces the envelope to rest at 0.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Rest;
        self.value = 0.0;
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current output without advancing.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the envelope is producing output.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Rest
    }

    /// Advances one sample and returns the output.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Rest => self.value = 0.0,
            EnvelopeState::Attack => {
                self.value += self.attack_inc;
                if self.value >= 1.0 {
                    self.value = 1.0;
                    self.state = EnvelopeState::Release;
                }
            }
            // AR has no hold stage
            EnvelopeState::Hold | EnvelopeState::Release => {
                self.value -= self.release_inc;
                if self.value <= 0.0 {
                    self.value = 0.0;
                    self.state = EnvelopeState::Rest;
                }
            }
        }
        self.value
    }

    fn recalculate(&mut self) {
        self.attack_inc = increment(self.attack, self.sample_rate);
        self.release_inc = increment(self.release, self.sample_rate);
    }
}

/// Gated attack/hold/release envelope.
///
/// # Example
///
/// ```rust
/// use modal_synth::{AhrEnvelope, EnvelopeState};
///
/// let mut env = AhrEnvelope::new(48000.0);
/// env.set_params(0.001, 0.001);
/// env.on();
/// for _ in 0..100 {
///     env.tick();
/// }
/// assert_eq!(env.state(), EnvelopeState::Hold);
/// env.off();
/// for _ in 0..100 {
///     env.tick();
/// }
/// assert_eq!(env.state(), EnvelopeState::Rest);
/// ```
#[derive(Debug, Clone)]
pub struct AhrEnvelope {
    state: EnvelopeState,
    value: f32,
    attack: f32,
    release: f32,
    attack_inc: f32,
    release_inc: f32,
    sample_rate: f32,
}

impl Default for AhrEnvelope {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AhrEnvelope {
    /// Creates an envelope with 0.5 s attack and 0.5 s release.
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            state: EnvelopeState::Rest,
            value: 0.0,
            attack: 0.5,
            release: 0.5,
            attack_inc: 0.0,
            release_inc: 0.0,
            sample_rate,
        };
        env.recalculate();
        env
    }

    /// Sets attack and release times in seconds.
    pub fn set_params(&mut self, attack: f32, release: f32) {
        self.attack = attack;
        self.release = release;
        self.recalculate();
    }

    /// Attack time in seconds.
    pub fn attack(&self) -> f32 {
        self.attack
    }

    /// Release time in seconds.
    pub fn release(&self) -> f32 {
        self.release
    }

    /// Sets the sample rate and recomputes both increments.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate();
    }

    /// Opens the gate: attack from the current value, then hold.
    pub fn on(&mut self) {
        self.state = EnvelopeState::Attack;
    }

    /// Closes the gate: release from the current value.
    pub fn off(&mut self) {
        self.state = EnvelopeState::Release;
    }

    /// Forces the envelope to rest at 0.
    pub fn reset(&mut self) {
        self.state = EnvelopeState::Rest;
        self.value = 0.0;
    }

    /// Current stage.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Current output without advancing.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether the envelope is producing output.
    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Rest
    }

    /// Advances one sample and returns the output.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Rest => self.value = 0.0,
            EnvelopeState::Attack => {
                self.value += self.attack_inc;
                if self.value >= 1.0 {
                    self.value = 1.0;
                    self.state = EnvelopeState::Hold;
                }
            }
            EnvelopeState::Hold => self.value = 1.0,
            EnvelopeState::Release => {
                self.value -= self.release_inc;
                if self.value <= 0.0 {
                    self.value = 0.0;
                    self.state = EnvelopeState::Rest;
                }
            }
        }
        self.value
    }

    fn recalculate(&mut self) {
        self.attack_inc = increment(self.attack, self.sample_rate);
        self.release_inc = increment(self.release, self.sample_rate);
    }
}

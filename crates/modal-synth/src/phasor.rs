//! Phase accumulators and the waveforms derived from them.
//!
//! A [`Phasor`] ramps from 0 to 1 once per cycle. Waveform functions read
//! a phase (or a phasor, when they need its increment for anti-aliasing)
//! and return a bipolar sample. [`Chirp`] sweeps a sine from 20 Hz to
//! 20 kHz, restarting at a control rate.

use core::f32::consts::PI;
use libm::{fabsf, floorf, sinf};
use modal_core::lerp;

/// Lowest frequency of a chirp sweep in Hz.
pub const CHIRP_LOW_HZ: f32 = 20.0;
/// Highest frequency of a chirp sweep in Hz.
pub const CHIRP_HIGH_HZ: f32 = 20000.0;

/// Phase accumulator in `[0, 1)`.
///
/// # Example
///
/// ```rust
/// use modal_synth::Phasor;
///
/// let mut ph = Phasor::new(48000.0);
/// ph.set_freq(12000.0);
/// assert_eq!(ph.tick(), 0.25);
/// assert_eq!(ph.tick(), 0.5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Phasor {
    phase: f32,
    inc: f32,
    freq: f32,
    sample_rate: f32,
}

impl Default for Phasor {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Phasor {
    /// Creates a phasor at 440 Hz with phase 0.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            inc: 440.0 / sample_rate,
            freq: 440.0,
            sample_rate,
        }
    }

    /// Sets the frequency in Hz. Negative values are treated as 0.
    pub fn set_freq(&mut self, freq: f32) {
        self.freq = freq.max(0.0);
        self.inc = self.freq / self.sample_rate;
    }

    /// Frequency in Hz.
    pub fn freq(&self) -> f32 {
        self.freq
    }

    /// Sets the sample rate and recomputes the increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.inc = self.freq / self.sample_rate;
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Phase increment per sample (`freq / sample_rate`).
    pub fn increment(&self) -> f32 {
        self.inc
    }

    /// Current phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Sets the phase, wrapped into `[0, 1)`.
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap(phase);
    }

    /// Resets the phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advances one sample and returns the new phase.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        self.phase += self.inc;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
        self.phase
    }
}

#[inline]
fn wrap(phase: f32) -> f32 {
    let wrapped = phase - floorf(phase);
    // floorf can leave exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Naive sawtooth, -1 at phase 0 rising to 1.
#[inline]
pub fn saw(phase: f32) -> f32 {
    2.0 * phase - 1.0
}

/// Sine.
#[inline]
pub fn sine(phase: f32) -> f32 {
    sinf(2.0 * PI * phase)
}

/// Naive triangle, 1 at phase 0, -1 at phase 0.5.
#[inline]
pub fn tri(phase: f32) -> f32 {
    4.0 * fabsf(phase - 0.5) - 1.0
}

/// Naive rectangle: 1 for the last `width` of the cycle, -1 otherwise.
#[inline]
pub fn rect(phase: f32, width: f32) -> f32 {
    if phase > 1.0 - width { 1.0 } else { -1.0 }
}

/// One-sample impulse at the start of every cycle.
#[inline]
pub fn impulse_train(phasor: &Phasor) -> f32 {
    if phasor.phase() <= phasor.increment() {
        1.0
    } else {
        0.0
    }
}

/// 2nd-order PolyBLEP residual around the phase wrap.
#[inline]
fn poly_blep(phase: f32, inc: f32) -> f32 {
    if inc <= 0.0 {
        return 0.0;
    }
    if phase > 1.0 - inc {
        let t = (phase - 1.0) / inc;
        t * t + 2.0 * t + 1.0
    } else if phase < inc {
        let t = phase / inc;
        2.0 * t - t * t - 1.0
    } else {
        0.0
    }
}

/// Band-limited sawtooth (PolyBLEP).
#[inline]
pub fn aa_saw(phasor: &Phasor) -> f32 {
    saw(phasor.phase()) - poly_blep(phasor.phase(), phasor.increment())
}

/// Band-limited rectangle built from two offset PolyBLEP saws.
///
/// `width` is the fraction of the cycle spent high; 0.5 is a square.
#[inline]
pub fn aa_rect(phasor: &Phasor, width: f32) -> f32 {
    let mut shifted = *phasor;
    shifted.set_phase(phasor.phase() + width);
    aa_saw(phasor) - aa_saw(&shifted)
}

/// Repeating 20 Hz to 20 kHz linear sine sweep.
///
/// `control` sets how many sweeps happen per second; `generator` runs at
/// audio rate and follows the control phase.
#[derive(Debug, Clone, Copy)]
pub struct Chirp {
    control: Phasor,
    generator: Phasor,
}

impl Default for Chirp {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Chirp {
    /// Creates a chirp at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            control: Phasor::new(sample_rate),
            generator: Phasor::new(sample_rate),
        }
    }

    /// Sets the sweep rate (sweeps per second).
    pub fn set_freq(&mut self, rate: f32) {
        self.control.set_freq(rate);
    }

    /// Sweep rate in Hz.
    pub fn freq(&self) -> f32 {
        self.control.freq()
    }

    /// Sets the sample rate of both phasors.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.control.set_sample_rate(sample_rate);
        self.generator.set_sample_rate(sample_rate);
    }

    /// Frequency the generator is currently sweeping through.
    pub fn current_freq(&self) -> f32 {
        self.generator.freq()
    }

    /// Restarts the sweep.
    pub fn reset(&mut self) {
        self.control.reset();
        self.generator.reset();
    }

    /// Advances one sample and returns the swept sine.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let sweep = self.control.tick();
        self.generator.set_freq(lerp(CHIRP_LOW_HZ, CHIRP_HIGH_HZ, sweep));
        sine(self.generator.tick())
    }
}

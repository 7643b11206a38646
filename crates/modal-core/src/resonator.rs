//! Complex one-pole modal resonator.
//!
//! Each mode of a modal voice is a single complex pole
//!
//! ```text
//! coeff = 0.001^(1 / (decay * sr)) * e^(j * 2π * freq / sr)
//! y[n]  = amp * x[n] + coeff * y[n-1]
//! out   = Im(y[n])
//! ```
//!
//! The magnitude term makes the free ring fall by 60 dB after `decay`
//! seconds (T60). Modes at or above Nyquist, or at non-positive frequency,
//! are muted.

use crate::math::flush_denormal;
use core::f32::consts::PI;
use libm::{expf, logf};
use num_complex::Complex;

/// Ratio a ringing mode reaches after its decay time (-60 dB).
pub const T60_RATIO: f32 = 0.001;

/// A single decaying sinusoidal mode.
///
/// # Example
///
/// ```rust
/// use modal_core::Resonator;
///
/// let mut mode = Resonator::new(48000.0);
/// mode.set_params(440.0, 1.0, 1.0);
/// mode.ping();
/// let first = mode.tick(0.0);
/// assert!(first.abs() > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Resonator {
    state: Complex<f32>,
    coeff: Complex<f32>,
    amp: f32,
    ping_amp: f32,
    freq: f32,
    decay: f32,
    play: bool,
    sample_rate: f32,
}

impl Resonator {
    /// Creates a silent resonator at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            state: Complex::new(0.0, 0.0),
            coeff: Complex::new(0.0, 0.0),
            amp: 0.0,
            ping_amp: 0.0,
            freq: 0.0,
            decay: 0.0,
            play: false,
            sample_rate,
        }
    }

    /// Sets frequency (Hz), input gain and T60 decay time (seconds).
    ///
    /// The resonator only plays while `0 < freq < sample_rate / 2`.
    pub fn set_params(&mut self, freq: f32, amp: f32, decay: f32) {
        self.freq = freq;
        self.amp = amp;
        self.decay = decay;
        self.ping_amp = amp;
        self.play = freq > 0.0 && freq < self.sample_rate / 2.0;

        let radius = expf(logf(T60_RATIO) / (decay * self.sample_rate));
        let w = 2.0 * PI * freq / self.sample_rate;
        self.coeff = Complex::from_polar(radius, w);
    }

    /// Changes the sample rate and re-derives the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_params(self.freq, self.amp, self.decay);
    }

    /// Strikes the mode: the state jumps to the configured amplitude.
    pub fn ping(&mut self) {
        self.state = Complex::new(self.ping_amp, 0.0);
    }

    /// Processes one input sample and returns the imaginary part of the state.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        if !self.play {
            return 0.0;
        }
        let next = self.coeff * self.state + self.amp * input;
        self.state = Complex::new(flush_denormal(next.re), flush_denormal(next.im));
        self.state.im
    }

    /// Zeroes the internal state.
    pub fn clear(&mut self) {
        self.state = Complex::new(0.0, 0.0);
    }

    /// Magnitude of the complex state, the mode's current envelope.
    pub fn magnitude(&self) -> f32 {
        self.state.norm()
    }

    /// Whether the mode is within the playable band.
    pub fn is_playing(&self) -> bool {
        self.play
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Current input gain.
    pub fn amplitude(&self) -> f32 {
        self.amp
    }

    /// Current T60 decay in seconds.
    pub fn decay(&self) -> f32 {
        self.decay
    }
}

impl Default for Resonator {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    #[test]
    fn test_mutes_above_nyquist() {
        let mut r = Resonator::new(SR);
        r.set_params(30000.0, 1.0, 1.0);
        assert!(!r.is_playing());
        r.ping();
        for _ in 0..64 {
            assert_eq!(r.tick(1.0), 0.0);
        }
    }

    #[test]
    fn test_mutes_at_nyquist_and_zero() {
        let mut r = Resonator::new(SR);
        r.set_params(SR / 2.0, 1.0, 1.0);
        assert!(!r.is_playing(), "exactly Nyquist must be muted");
        r.set_params(0.0, 1.0, 1.0);
        assert!(!r.is_playing(), "0 Hz must be muted");
        r.set_params(-100.0, 1.0, 1.0);
        assert!(!r.is_playing(), "negative frequency must be muted");
    }

    #[test]
    fn test_ping_sets_state() {
        let mut r = Resonator::new(SR);
        r.set_params(440.0, 0.75, 1.0);
        r.ping();
        assert!((r.magnitude() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_t60_decay() {
        let mut r = Resonator::new(SR);
        r.set_params(440.0, 1.0, 1.0);
        r.ping();
        let start = r.magnitude();

        for _ in 0..(SR as usize) {
            r.tick(0.0);
        }
        let ratio = r.magnitude() / start;
        assert!(
            (ratio - T60_RATIO).abs() < T60_RATIO * 0.03,
            "after one T60 the ratio should be ~0.001, got {}",
            ratio
        );
    }

    #[test]
    fn test_output_is_sinusoid_at_freq() {
        // Count zero crossings of the free ring over one second
        let mut r = Resonator::new(SR);
        r.set_params(1000.0, 1.0, 5.0);
        r.ping();

        let mut prev = r.tick(0.0);
        let mut crossings = 0;
        for _ in 1..(SR as usize) {
            let y = r.tick(0.0);
            if (prev < 0.0) != (y < 0.0) {
                crossings += 1;
            }
            prev = y;
        }
        assert!(
            (1998..=2002).contains(&crossings),
            "expected ~2000 zero crossings for 1 kHz, got {}",
            crossings
        );
    }

    #[test]
    fn test_set_sample_rate_replays_params() {
        let mut r = Resonator::new(SR);
        r.set_params(30000.0, 1.0, 1.0);
        assert!(!r.is_playing());

        r.set_sample_rate(96000.0);
        assert!(r.is_playing(), "30 kHz is below Nyquist at 96 kHz");
        assert_eq!(r.frequency(), 30000.0);
        assert_eq!(r.decay(), 1.0);
    }

    #[test]
    fn test_input_drives_mode() {
        let mut r = Resonator::new(SR);
        r.set_params(440.0, 0.5, 1.0);
        r.tick(1.0);
        assert!((r.magnitude() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_clear() {
        let mut r = Resonator::new(SR);
        r.set_params(440.0, 1.0, 1.0);
        r.ping();
        r.clear();
        assert_eq!(r.magnitude(), 0.0);
    }
}

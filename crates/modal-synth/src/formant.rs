//! Four-band vowel formant filter.
//!
//! Four narrow 0 dB band-pass biquads placed on the first four formants of
//! a vowel space. `x` sweeps F1 (270..660 Hz, close to open), `y` sweeps
//! F2 (840..2290 Hz, back to front), `z` sweeps F3 (1690..3010 Hz). `len`
//! scales F1..F3 by 1..1.5 and places F4 at `3500 * len` Hz.

use modal_core::{Biquad, db_to_gain, lerp};

/// Bandwidth of every formant band, in octaves.
pub const FORMANT_BANDWIDTH: f32 = 0.1;

/// Number of formant bands.
pub const FORMANT_BANDS: usize = 4;

/// How the four bands are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormantArch {
    /// Every band filters the input; outputs are summed.
    #[default]
    Parallel,
    /// Bands are chained; each stage's output is tapped and summed.
    Cascade,
}

/// Vowel formant filter.
///
/// # Example
///
/// ```rust
/// use modal_synth::FormantFilter;
///
/// let mut formant = FormantFilter::new(48000.0);
/// formant.set_vowel(0.0, 1.0, 0.5, 0.0);
/// assert_eq!(formant.frequencies()[0], 270.0);
/// assert_eq!(formant.frequencies()[1], 2290.0);
/// let y = formant.tick(1.0);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct FormantFilter {
    bands: [Biquad; FORMANT_BANDS],
    gains_db: [f32; FORMANT_BANDS],
    gains: [f32; FORMANT_BANDS],
    arch: FormantArch,
}

impl Default for FormantFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl FormantFilter {
    /// Creates a parallel filter on the neutral vowel `(0.5, 0.5, 0.5, 0.5)`
    /// with all band gains at 0 dB.
    pub fn new(sample_rate: f32) -> Self {
        let mut formant = Self {
            bands: core::array::from_fn(|_| Biquad::new(sample_rate)),
            gains_db: [0.0; FORMANT_BANDS],
            gains: [1.0; FORMANT_BANDS],
            arch: FormantArch::Parallel,
        };
        formant.set_vowel(0.5, 0.5, 0.5, 0.5);
        formant
    }

    /// Places the four bands for a vowel position and tract length.
    pub fn set_vowel(&mut self, x: f32, y: f32, z: f32, len: f32) {
        let ratio = lerp(1.0, 1.5, len);
        let freqs = [
            lerp(270.0, 660.0, x) * ratio,
            lerp(840.0, 2290.0, y) * ratio,
            lerp(1690.0, 3010.0, z) * ratio,
            3500.0 * len,
        ];
        for (band, freq) in self.bands.iter_mut().zip(freqs) {
            band.set_bpf(freq, FORMANT_BANDWIDTH);
        }
    }

    /// Centre frequencies of the four bands in Hz.
    pub fn frequencies(&self) -> [f32; FORMANT_BANDS] {
        core::array::from_fn(|i| self.bands[i].frequency())
    }

    /// Sets one band's gain in dB. Out-of-range bands are ignored.
    pub fn set_gain_db(&mut self, band: usize, db: f32) {
        if band < FORMANT_BANDS {
            self.gains_db[band] = db;
            self.gains[band] = db_to_gain(db);
        }
    }

    /// Sets all four band gains in dB.
    pub fn set_gains_db(&mut self, db: [f32; FORMANT_BANDS]) {
        for (band, value) in db.into_iter().enumerate() {
            self.set_gain_db(band, value);
        }
    }

    /// Band gains in dB.
    pub fn gains_db(&self) -> [f32; FORMANT_BANDS] {
        self.gains_db
    }

    /// Selects parallel or cascade combination.
    pub fn set_arch(&mut self, arch: FormantArch) {
        self.arch = arch;
    }

    /// Current combination.
    pub fn arch(&self) -> FormantArch {
        self.arch
    }

    /// Re-derives every band at a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for band in &mut self.bands {
            band.set_sample_rate(sample_rate);
        }
    }

    /// Clears all band histories.
    pub fn clear(&mut self) {
        for band in &mut self.bands {
            band.clear();
        }
    }

    /// Processes one sample.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        match self.arch {
            FormantArch::Parallel => self
                .bands
                .iter_mut()
                .zip(self.gains)
                .map(|(band, gain)| band.tick(input) * gain)
                .sum(),
            FormantArch::Cascade => {
                let mut signal = input;
                let mut out = 0.0;
                for (band, gain) in self.bands.iter_mut().zip(self.gains) {
                    signal = band.tick(signal);
                    out += signal * gain;
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::TAU;

    const SR: f32 = 48000.0;

    fn sine_rms(formant: &mut FormantFilter, freq: f32) -> f32 {
        formant.clear();
        let n = 9600;
        let mut sum = 0.0;
        for i in 0..n {
            let x = libm::sinf(TAU * freq * i as f32 / SR);
            let y = formant.tick(x);
            if i >= n / 2 {
                sum += y * y;
            }
        }
        libm::sqrtf(sum / (n / 2) as f32)
    }

    #[test]
    fn test_vowel_frequencies() {
        let mut formant = FormantFilter::new(SR);
        formant.set_vowel(0.0, 0.0, 0.0, 0.0);
        assert_eq!(formant.frequencies(), [270.0, 840.0, 1690.0, 0.0]);

        formant.set_vowel(1.0, 1.0, 1.0, 1.0);
        assert_eq!(formant.frequencies(), [990.0, 3435.0, 4515.0, 3500.0]);
    }

    #[test]
    fn test_default_gains_are_unity() {
        let formant = FormantFilter::new(SR);
        assert_eq!(formant.gains, [1.0; FORMANT_BANDS]);
        assert_eq!(formant.gains_db(), [0.0; FORMANT_BANDS]);
    }

    #[test]
    fn test_gain_db_conversion() {
        let mut formant = FormantFilter::new(SR);
        formant.set_gains_db([0.0, -6.0206, -20.0, f32::NEG_INFINITY]);
        assert_eq!(formant.gains[0], 1.0);
        assert!((formant.gains[1] - 0.5).abs() < 1e-3);
        assert!((formant.gains[2] - 0.1).abs() < 1e-5);
        assert_eq!(formant.gains[3], 0.0);
        formant.set_gain_db(7, 3.0);
        assert_eq!(formant.gains_db()[3], f32::NEG_INFINITY);
    }

    #[test]
    fn test_parallel_passes_formant_frequency() {
        let mut formant = FormantFilter::new(SR);
        formant.set_vowel(0.0, 0.0, 0.0, 0.0);
        // Only F1 at 270 Hz, F2..F3 muted, F4 degenerate at 0 Hz outputs 0
        formant.set_gains_db([0.0, f32::NEG_INFINITY, f32::NEG_INFINITY, 0.0]);

        let at_formant = sine_rms(&mut formant, 270.0);
        let away = sine_rms(&mut formant, 600.0);
        let expected = core::f32::consts::FRAC_1_SQRT_2;
        assert!(
            (at_formant - expected).abs() < 0.03,
            "F1 should pass at unity, rms {}",
            at_formant
        );
        assert!(away < at_formant * 0.2, "off-formant rms {}", away);
    }

    #[test]
    fn test_cascade_differs_from_parallel() {
        let mut parallel = FormantFilter::new(SR);
        let mut cascade = FormantFilter::new(SR);
        cascade.set_arch(FormantArch::Cascade);
        assert_eq!(cascade.arch(), FormantArch::Cascade);

        let a = sine_rms(&mut parallel, 700.0);
        let b = sine_rms(&mut cascade, 700.0);
        assert!(a.is_finite() && b.is_finite());
        assert!((a - b).abs() > 1e-3, "architectures should sound different");
    }

    #[test]
    fn test_zero_length_stays_finite() {
        let mut formant = FormantFilter::new(SR);
        formant.set_vowel(0.5, 0.5, 0.5, 0.0);
        for i in 0..1000 {
            let y = formant.tick(if i == 0 { 1.0 } else { 0.0 });
            assert!(y.is_finite());
        }
    }

    #[test]
    fn test_sample_rate_change_keeps_frequencies() {
        let mut formant = FormantFilter::new(SR);
        formant.set_vowel(0.2, 0.8, 0.4, 0.6);
        let before = formant.frequencies();
        formant.set_sample_rate(96000.0);
        assert_eq!(formant.frequencies(), before);
    }
}

//! Biquad (bi-quadratic) filter with remembered design.
//!
//! A second-order IIR filter configured from the RBJ Audio EQ Cookbook
//! formulas. The filter keeps its last design `(type, Fc, Q)` so that a
//! sample-rate change re-derives the same response instead of silently
//! shifting it.
//!
//! Coefficient functions return `(b0, b1, b2, a0, a1, a2)` un-normalized;
//! [`Biquad`] divides by `a0` when they are applied.

use core::f32::consts::{LN_2, PI};
use libm::{cosf, sinf, sinhf};

/// Coefficient tuple `(b0, b1, b2, a0, a1, a2)`.
pub type Coefficients = (f32, f32, f32, f32, f32, f32);

/// Filter design selected by the last `set_*` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BiquadType {
    /// Unconfigured: passes the input through unchanged.
    #[default]
    Passthrough,
    /// Low-pass, `Q` as resonance.
    Lowpass,
    /// High-pass, `Q` as resonance.
    Highpass,
    /// All-pass, `Q` as resonance.
    Allpass,
    /// Band-pass with constant skirt gain (peak gain = Q).
    BandpassQ,
    /// Band-pass with constant 0 dB peak gain, `Q` is bandwidth in octaves.
    Bandpass,
    /// Notch (band-reject), `Q` is bandwidth in octaves.
    Notch,
    /// Two-zero/two-pole "STK" notch, `Q` is the pole radius (0..1).
    StkNotch,
}

/// Second-order IIR filter, Direct Form I.
///
/// ```text
/// y[n] = (b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]) / a0
/// ```
///
/// A non-finite output (for example from a degenerate design at `Fc = 0`)
/// is replaced with 0 before it enters the history, so the filter never
/// propagates NaN/Inf.
///
/// # Example
///
/// ```rust
/// use modal_core::Biquad;
///
/// let mut bpf = Biquad::new(48000.0);
/// bpf.set_bpf(700.0, 0.1);
/// let y = bpf.tick(1.0);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    kind: BiquadType,
    fc: f32,
    q: f32,
    sample_rate: f32,

    // Normalized by a0
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a passthrough biquad at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            kind: BiquadType::Passthrough,
            fc: 0.0,
            q: 0.0,
            sample_rate,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Configures the filter from a design type, frequency and `Q`.
    ///
    /// The meaning of `q` depends on `kind` (resonance, bandwidth in
    /// octaves, or pole radius); see [`BiquadType`].
    pub fn set_params(&mut self, kind: BiquadType, fc: f32, q: f32) {
        self.kind = kind;
        self.fc = fc;
        self.q = q;
        let sr = self.sample_rate;
        let coeffs = match kind {
            BiquadType::Passthrough => (1.0, 0.0, 0.0, 1.0, 0.0, 0.0),
            BiquadType::Lowpass => lowpass_coefficients(fc, q, sr),
            BiquadType::Highpass => highpass_coefficients(fc, q, sr),
            BiquadType::Allpass => allpass_coefficients(fc, q, sr),
            BiquadType::BandpassQ => bandpass_q_coefficients(fc, q, sr),
            BiquadType::Bandpass => bandpass_coefficients(fc, q, sr),
            BiquadType::Notch => notch_coefficients(fc, q, sr),
            BiquadType::StkNotch => stk_notch_coefficients(fc, q, sr),
        };
        self.apply(coeffs);
    }

    /// Low-pass at `fc` Hz with resonance `q`.
    pub fn set_lpf(&mut self, fc: f32, q: f32) {
        self.set_params(BiquadType::Lowpass, fc, q);
    }

    /// High-pass at `fc` Hz with resonance `q`.
    pub fn set_hpf(&mut self, fc: f32, q: f32) {
        self.set_params(BiquadType::Highpass, fc, q);
    }

    /// All-pass centred at `fc` Hz.
    pub fn set_apf(&mut self, fc: f32, q: f32) {
        self.set_params(BiquadType::Allpass, fc, q);
    }

    /// Constant-skirt-gain band-pass (peak gain = `q`).
    pub fn set_bpf_q(&mut self, fc: f32, q: f32) {
        self.set_params(BiquadType::BandpassQ, fc, q);
    }

    /// Constant 0 dB peak band-pass, `bw` in octaves.
    pub fn set_bpf(&mut self, fc: f32, bw: f32) {
        self.set_params(BiquadType::Bandpass, fc, bw);
    }

    /// Notch at `fc` Hz, `bw` in octaves.
    pub fn set_notch(&mut self, fc: f32, bw: f32) {
        self.set_params(BiquadType::Notch, fc, bw);
    }

    /// STK-style notch at `fc` Hz with pole `radius`.
    pub fn set_stk_notch(&mut self, fc: f32, radius: f32) {
        self.set_params(BiquadType::StkNotch, fc, radius);
    }

    /// Changes the sample rate and re-derives the last design.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_params(self.kind, self.fc, self.q);
    }

    /// Current design type.
    pub fn kind(&self) -> BiquadType {
        self.kind
    }

    /// Current design frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.fc
    }

    /// Current `Q` / bandwidth / radius, depending on [`kind`](Self::kind).
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Normalized coefficients `[b0, b1, b2, a1, a2]` (a0 = 1).
    pub fn coefficients(&self) -> [f32; 5] {
        [self.b0, self.b1, self.b2, self.a1, self.a2]
    }

    /// Processes a single sample.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let mut output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        if !output.is_finite() {
            output = 0.0;
        }

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the filter history without changing the design.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    fn apply(&mut self, (b0, b1, b2, a0, a1, a2): Coefficients) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[inline]
fn omega(frequency: f32, sample_rate: f32) -> (f32, f32, f32) {
    let w0 = 2.0 * PI * frequency / sample_rate;
    (w0, cosf(w0), sinf(w0))
}

/// `alpha` for bandwidth-specified designs (bandwidth in octaves).
#[inline]
fn bandwidth_alpha(w0: f32, sin_w0: f32, bw: f32) -> f32 {
    sin_w0 * sinhf(LN_2 / 2.0 * bw * w0 / sin_w0)
}

/// Low-pass coefficients (RBJ cookbook).
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q);

    let b1 = 1.0 - cos_w0;
    let b0 = b1 / 2.0;
    (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
}

/// High-pass coefficients (RBJ cookbook).
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q);

    let b0 = (1.0 + cos_w0) / 2.0;
    (b0, -(1.0 + cos_w0), b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
}

/// All-pass coefficients (RBJ cookbook).
pub fn allpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q);

    (
        1.0 - alpha,
        -2.0 * cos_w0,
        1.0 + alpha,
        1.0 + alpha,
        -2.0 * cos_w0,
        1.0 - alpha,
    )
}

/// Band-pass coefficients with constant skirt gain (peak gain = `q`).
pub fn bandpass_q_coefficients(frequency: f32, q: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = sin_w0 / (2.0 * q);

    (
        q * alpha,
        0.0,
        -q * alpha,
        1.0 + alpha,
        -2.0 * cos_w0,
        1.0 - alpha,
    )
}

/// Band-pass coefficients with constant 0 dB peak gain.
///
/// `bw` is the bandwidth in octaves between the -3 dB points.
pub fn bandpass_coefficients(frequency: f32, bw: f32, sample_rate: f32) -> Coefficients {
    let (w0, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = bandwidth_alpha(w0, sin_w0, bw);

    (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
}

/// Notch coefficients, `bw` in octaves.
pub fn notch_coefficients(frequency: f32, bw: f32, sample_rate: f32) -> Coefficients {
    let (w0, cos_w0, sin_w0) = omega(frequency, sample_rate);
    let alpha = bandwidth_alpha(w0, sin_w0, bw);

    (
        1.0,
        -2.0 * cos_w0,
        1.0,
        1.0 + alpha,
        -2.0 * cos_w0,
        1.0 - alpha,
    )
}

/// Two-pole resonance with zeros at DC and Nyquist ("STK" notch/reson).
///
/// Poles sit at `radius * e^{±jw0}`. `radius` must be below 1 for stability.
pub fn stk_notch_coefficients(frequency: f32, radius: f32, sample_rate: f32) -> Coefficients {
    let (_, cos_w0, _) = omega(frequency, sample_rate);

    let a2 = radius * radius;
    let a1 = -2.0 * radius * cos_w0;
    let b0 = 0.5 - 0.5 * a2;
    (b0, 0.0, -b0, 1.0, a1, a2)
}

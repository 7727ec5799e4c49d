//! Second-order Butterworth filters
//!
//! Low-pass and high-pass biquads from the Audio EQ Cookbook with
//! Q = 1/sqrt(2), run causally over a whole buffer from zero state.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Cutoffs are clamped to this fraction of the sample rate
const MAX_CUTOFF_RATIO: f64 = 0.49;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

/// Biquad coefficients, normalized by a0
///
/// H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    pub fn low_pass(cutoff_hz: f64, sample_rate: u32) -> Self {
        Self::butterworth(FilterKind::LowPass, cutoff_hz, sample_rate)
    }

    pub fn high_pass(cutoff_hz: f64, sample_rate: u32) -> Self {
        Self::butterworth(FilterKind::HighPass, cutoff_hz, sample_rate)
    }

    pub fn butterworth(kind: FilterKind, cutoff_hz: f64, sample_rate: u32) -> Self {
        let sr = sample_rate as f64;
        let freq = cutoff_hz.clamp(1.0, sr * MAX_CUTOFF_RATIO);

        let w0 = 2.0 * PI * freq / sr;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * FRAC_1_SQRT_2);

        let (b0, b1, b2) = match kind {
            FilterKind::LowPass => ((1.0 - cos_w0) / 2.0, 1.0 - cos_w0, (1.0 - cos_w0) / 2.0),
            FilterKind::HighPass => ((1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0),
        };
        let a0 = 1.0 + alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Filter a whole buffer (Direct Form I, zero initial state)
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0, 0.0, 0.0, 0.0);

        input
            .iter()
            .map(|&x| {
                let y = self.b0 * x + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
                x2 = x1;
                x1 = x;
                y2 = y1;
                y1 = y;
                y
            })
            .collect()
    }

    /// Magnitude response at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: u32) -> f64 {
        let w = 2.0 * PI * freq_hz / sample_rate as f64;
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());

        let num_re = self.b0 + self.b1 * c1 + self.b2 * c2;
        let num_im = -(self.b1 * s1 + self.b2 * s2);
        let den_re = 1.0 + self.a1 * c1 + self.a2 * c2;
        let den_im = -(self.a1 * s1 + self.a2 * s2);

        num_re.hypot(num_im) / den_re.hypot(den_im)
    }
}

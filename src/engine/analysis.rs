//! Signal measurements
//!
//! Objective measurements used to report on processed audio and to verify
//! the pipeline in tests:
//! - RMS and peak level
//! - Stereo correlation (how far the widener decorrelated the channels)
//! - Magnitude at a given frequency (FFT)

use rustfft::{num_complex::Complex, FftPlanner};

use crate::engine::buffer::{peak_abs, AudioBuffer};

/// Convert linear amplitude to decibels
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Calculate RMS (Root Mean Square) of samples
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f64).sqrt()
}

/// Pearson correlation between two channels
///
/// -1.0 = opposite phase, 0.0 = uncorrelated, 1.0 = identical shape.
/// Returns 1.0 when either channel has no variance and the two are equal.
pub fn stereo_correlation(left: &[f64], right: &[f64]) -> f64 {
    let n = left.len().min(right.len());
    if n == 0 {
        return 0.0;
    }
    let (left, right) = (&left[..n], &right[..n]);

    let mean_l = left.iter().sum::<f64>() / n as f64;
    let mean_r = right.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_l = 0.0;
    let mut var_r = 0.0;
    for (l, r) in left.iter().zip(right.iter()) {
        let dl = l - mean_l;
        let dr = r - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    let denominator = (var_l * var_r).sqrt();
    if denominator < 1e-20 {
        if left == right {
            1.0
        } else {
            0.0
        }
    } else {
        cov / denominator
    }
}

/// Magnitude in dB at `frequency` (nearest bin) of the first `fft_size`
/// samples, Hann windowed
pub fn magnitude_at_frequency(
    samples: &[f64],
    sample_rate: u32,
    frequency: f64,
    fft_size: usize,
) -> f64 {
    if fft_size == 0 || samples.len() < fft_size {
        return f64::NEG_INFINITY;
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut spectrum: Vec<Complex<f64>> = samples
        .iter()
        .take(fft_size)
        .enumerate()
        .map(|(i, &s)| {
            let window =
                0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / fft_size as f64).cos());
            Complex::new(s * window, 0.0)
        })
        .collect();
    fft.process(&mut spectrum);

    let bin_hz = sample_rate as f64 / fft_size as f64;
    let bin = (frequency / bin_hz).round() as usize;

    spectrum
        .get(bin.min(fft_size / 2))
        .map(|c| linear_to_db(c.norm() / (fft_size as f64 / 2.0)))
        .unwrap_or(f64::NEG_INFINITY)
}

/// Summary of a processed buffer
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReport {
    /// Peak level in linear scale
    pub peak_linear: f64,
    /// Peak level in dBFS
    pub peak_db: f64,
    /// RMS level in dBFS
    pub rms_db: f64,
    /// Duration in seconds
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: usize,
    /// Stereo correlation, None for mono
    pub stereo_correlation: Option<f64>,
}

impl SignalReport {
    /// Measure an audio buffer
    pub fn analyze(buffer: &AudioBuffer) -> Self {
        let all: Vec<f64> = buffer.to_interleaved();
        let peak_linear = peak_abs(&all);

        let stereo_correlation = if buffer.channels() == 2 {
            Some(stereo_correlation(buffer.channel(0), buffer.channel(1)))
        } else {
            None
        };

        Self {
            peak_linear,
            peak_db: linear_to_db(peak_linear),
            rms_db: linear_to_db(rms(&all)),
            duration_secs: buffer.duration_secs(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channels(),
            stereo_correlation,
        }
    }

    /// Generate a summary string for display
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Duration: {:.2}s | {} ch @ {} Hz\n\
             RMS: {:.1} dBFS | Peak: {:.1} dBFS",
            self.duration_secs, self.channels, self.sample_rate, self.rms_db, self.peak_db,
        );

        if let Some(corr) = self.stereo_correlation {
            s.push_str(&format!("\nStereo Correlation: {:.2}", corr));
        }

        s
    }
}

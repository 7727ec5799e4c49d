//! Convolution reverb engine
//!
//! Convolves the mono dry signal with the impulse response and keeps only
//! the first `dry.len()` samples. The tail past the end of the input is
//! discarded, so decay times longer than the input are cut off.

use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};

use super::impulse::ImpulseResponse;
use crate::engine::buffer::normalize_peak;

/// Direct convolution is used up to this many multiply-adds in `Auto` mode
const DIRECT_WORK_LIMIT: usize = 1 << 20;

/// How the convolution sum is evaluated
///
/// Each method is deterministic. `Direct` and `Fft` agree to within 1e-9
/// after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvolutionMethod {
    /// Direct for small problems, FFT otherwise
    #[default]
    Auto,
    /// Time-domain summation
    Direct,
    /// Zero-padded FFT multiplication
    Fft,
}

/// Convolve `dry` with `ir`, truncate to `dry.len()` and peak-normalize
pub fn apply(dry: &[f64], ir: &ImpulseResponse) -> Vec<f64> {
    apply_with(dry, ir, ConvolutionMethod::Auto)
}

/// `apply` with an explicit evaluation method
pub fn apply_with(dry: &[f64], ir: &ImpulseResponse, method: ConvolutionMethod) -> Vec<f64> {
    if dry.iter().all(|&s| s == 0.0) {
        debug!("Dry signal is silent; wet signal is silent");
        return vec![0.0; dry.len()];
    }

    // Taps at or past dry.len() only reach the discarded tail
    let kernel = &ir.samples()[..ir.len().min(dry.len())];

    let method = match method {
        ConvolutionMethod::Auto if dry.len().saturating_mul(kernel.len()) <= DIRECT_WORK_LIMIT => {
            ConvolutionMethod::Direct
        }
        ConvolutionMethod::Auto => ConvolutionMethod::Fft,
        other => other,
    };

    let mut wet = match method {
        ConvolutionMethod::Fft => fft_convolve_truncated(dry, kernel),
        _ => direct_convolve_truncated(dry, kernel),
    };

    debug!(
        "Convolved {} samples with {} tap kernel ({:?})",
        dry.len(),
        kernel.len(),
        method
    );

    normalize_peak(&mut wet, 1.0);
    wet
}

/// First `signal.len()` samples of the linear convolution, time domain
fn direct_convolve_truncated(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    (0..signal.len())
        .map(|n| {
            let taps = kernel.len().min(n + 1);
            kernel[..taps]
                .iter()
                .enumerate()
                .map(|(k, &h)| h * signal[n - k])
                .sum()
        })
        .collect()
}

/// First `signal.len()` samples of the linear convolution, via FFT
fn fft_convolve_truncated(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if kernel.is_empty() {
        return vec![0.0; signal.len()];
    }

    let fft_size = (signal.len() + kernel.len() - 1).next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let ifft = planner.plan_fft_inverse(fft_size);

    let to_padded = |samples: &[f64]| -> Vec<Complex<f64>> {
        samples
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(fft_size)
            .collect()
    };
    let mut signal_spectrum = to_padded(signal);
    let mut kernel_spectrum = to_padded(kernel);

    fft.process(&mut signal_spectrum);
    fft.process(&mut kernel_spectrum);

    for (sig, ker) in signal_spectrum.iter_mut().zip(kernel_spectrum.iter()) {
        *sig *= ker;
    }

    ifft.process(&mut signal_spectrum);

    // rustfft does not scale the inverse transform
    let scale = 1.0 / fft_size as f64;
    signal_spectrum
        .iter()
        .take(signal.len())
        .map(|c| c.re * scale)
        .collect()
}

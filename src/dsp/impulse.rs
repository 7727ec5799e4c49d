//! Impulse response synthesis
//!
//! Builds a room impulse response from `ReverbParameters`:
//! - A negligible direct-path spike at sample 0
//! - A marker reflection at the pre-delay
//! - Randomly placed early reflections whose spread scales with room size
//! - A damped, exponentially decaying noise tail calibrated to RT60
//!
//! All randomness comes from the generator passed in by the caller.

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::params::{validate_sample_rate, ReverbParameters};
use crate::engine::buffer::normalize_peak;
use crate::error::Result;

// ============================================================================
// Constants
// ============================================================================

/// Amplitude of the direct-path spike; the dry path is mixed separately
pub const DIRECT_PATH_AMPLITUDE: f64 = 0.001;

/// Amplitude written at the pre-delay index
pub const PRE_DELAY_AMPLITUDE: f64 = 0.1;

/// Early reflections spread over `room_size * EARLY_REFLECTION_SPREAD` seconds
pub const EARLY_REFLECTION_SPREAD: f64 = 0.2 * 0.3;

/// Start of the late reverberation tail in seconds
pub const LATE_ONSET_SECONDS: f64 = 0.08;

/// ln(1000): amplitude reaches -60 dB after one decay time
const RT60_CONSTANT: f64 = 6.91;

/// Scale of the late tail before the reverberation amount is applied
const LATE_TAIL_GAIN: f64 = 0.1;

/// Feedback of the one-pole damping recurrence at full damping
const DAMPING_FEEDBACK: f64 = 0.3;

// ============================================================================
// Impulse Response
// ============================================================================

/// Single-channel impulse response with peak absolute value 1
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    samples: Vec<f64>,
    sample_rate: u32,
    raw_peak: f64,
}

impl ImpulseResponse {
    /// Wrap raw samples, peak-normalizing them
    ///
    /// An empty or silent response is replaced by a unit impulse.
    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        let (samples, raw_peak) = normalize_or_unit_impulse(samples);
        Ok(Self {
            samples,
            sample_rate,
            raw_peak,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Peak absolute value before normalization (0.0 if the response was
    /// replaced by a unit impulse)
    ///
    /// Multiply a sample by this to recover its raw amplitude.
    pub fn raw_peak(&self) -> f64 {
        self.raw_peak
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Build the generator used for synthesis
///
/// A fixed seed reproduces a run exactly; without one a fresh seed is drawn.
/// The seed is logged either way so any output can be regenerated.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(rand::random);
    debug!("Impulse response seed: {}", seed);
    ChaCha8Rng::seed_from_u64(seed)
}

/// Standard normal sample (Box-Muller)
fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = loop {
        let v: f64 = rng.random();
        if v > 0.0 {
            break v;
        }
    };
    let u2: f64 = rng.random();
    (-2.0_f64 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Synthesize a normalized impulse response
///
/// # Errors
/// * `InvalidParameter` - a field of `params` or the sample rate is out of range
pub fn synthesize<R: Rng + ?Sized>(
    params: &ReverbParameters,
    sample_rate: u32,
    rng: &mut R,
) -> Result<ImpulseResponse> {
    params.validate()?;
    validate_sample_rate(sample_rate)?;

    let ir = ImpulseResponse::from_samples(raw_response(params, sample_rate, rng), sample_rate)?;

    debug!(
        "Synthesized {} sample impulse response (raw peak {:.4})",
        ir.len(),
        ir.raw_peak()
    );

    Ok(ir)
}

/// Unnormalized impulse response
fn raw_response<R: Rng + ?Sized>(
    params: &ReverbParameters,
    sample_rate: u32,
    rng: &mut R,
) -> Vec<f64> {
    let sr = sample_rate as f64;
    let length = ((params.decay_time_seconds * sr).round() as usize).max(1);
    let mut samples = vec![0.0; length];

    samples[0] = DIRECT_PATH_AMPLITUDE;

    let pre_delay_index = (params.pre_delay_seconds * sr).round() as usize;
    if let Some(sample) = samples.get_mut(pre_delay_index) {
        *sample = PRE_DELAY_AMPLITUDE;
    }

    add_early_reflections(&mut samples, params, sr, pre_delay_index, rng);
    add_late_tail(&mut samples, params, sr, rng);

    samples
}

fn add_early_reflections<R: Rng + ?Sized>(
    samples: &mut [f64],
    params: &ReverbParameters,
    sr: f64,
    pre_delay_index: usize,
    rng: &mut R,
) {
    let max_delay = params.room_size * EARLY_REFLECTION_SPREAD;
    let mut delays: Vec<f64> = (0..params.num_early_reflections)
        .map(|_| rng.random::<f64>() * max_delay)
        .collect();
    delays.sort_by(f64::total_cmp);

    for delay in delays {
        let gain = params.early_reflection_gain
            * (0.5 + 0.5 * rng.random::<f64>())
            * params.reverberation
            * (-delay * 2.0).exp();
        let offset = (delay * sr).round() as usize;
        // Colliding reflections accumulate; ones past the end are dropped
        if let Some(sample) = pre_delay_index
            .checked_add(offset)
            .and_then(|index| samples.get_mut(index))
        {
            *sample += gain;
        }
    }
}

fn add_late_tail<R: Rng + ?Sized>(
    samples: &mut [f64],
    params: &ReverbParameters,
    sr: f64,
    rng: &mut R,
) {
    let onset = (LATE_ONSET_SECONDS * sr).round() as usize;
    if onset >= samples.len() {
        return;
    }

    let tail_len = samples.len() - onset;
    let mut noise: Vec<f64> = (0..tail_len).map(|_| standard_normal(rng)).collect();

    let damping = params.damping;
    for i in 1..tail_len {
        noise[i] = noise[i] * (1.0 - damping) + noise[i - 1] * damping * DAMPING_FEEDBACK;
    }

    let decay_rate = RT60_CONSTANT / params.decay_time_seconds;
    let gain = LATE_TAIL_GAIN * params.reverberation;
    for (i, (sample, n)) in samples[onset..].iter_mut().zip(noise).enumerate() {
        let t = i as f64 / sr;
        *sample += n * (-t * decay_rate).exp() * gain;
    }
}

/// Peak-normalize, or substitute a unit impulse when the response is silent
fn normalize_or_unit_impulse(mut samples: Vec<f64>) -> (Vec<f64>, f64) {
    if samples.is_empty() {
        samples.push(0.0);
    }
    let raw_peak = normalize_peak(&mut samples, 1.0);
    if raw_peak == 0.0 {
        warn!("Impulse response is silent; substituting a unit impulse");
        samples[0] = 1.0;
    }
    (samples, raw_peak)
}

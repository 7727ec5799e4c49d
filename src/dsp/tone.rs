//! Tone shaper
//!
//! Bass and treble tilt for the wet signal. Each control is neutral at 0.5;
//! a neutral control skips its filter entirely, so both at 0.5 returns the
//! input untouched.
//!
//! The treble stage reads the bass-adjusted signal, and only the treble stage
//! re-normalizes.

use log::debug;

use super::filter::Biquad;
use crate::engine::buffer::normalize_peak;

/// Neutral position of both tone controls
pub const NEUTRAL_TONE: f64 = 0.5;

/// Low-pass cutoff of the bass stage
pub const LOW_TONE_CUTOFF_HZ: f64 = 200.0;

/// High-pass cutoff of the treble stage
pub const HIGH_TONE_CUTOFF_HZ: f64 = 3000.0;

/// Filtered signal is mixed back at most at this level
const TONE_MIX_DEPTH: f64 = 0.3;

/// Map a tone control in [0, 1] to a mix amount in [-1, 1]
fn tone_mix(tone: f64) -> f64 {
    (tone - NEUTRAL_TONE) * 2.0
}

/// Apply bass then treble adjustment to the wet signal
pub fn shape(mut wet: Vec<f64>, low_tone: f64, high_tone: f64, sample_rate: u32) -> Vec<f64> {
    if low_tone != NEUTRAL_TONE {
        let low_mix = tone_mix(low_tone);
        let filtered = Biquad::low_pass(LOW_TONE_CUTOFF_HZ, sample_rate).filter(&wet);
        for (sample, f) in wet.iter_mut().zip(filtered) {
            *sample += low_mix * f * TONE_MIX_DEPTH;
        }
        debug!("Bass tone mix {:+.2}", low_mix);
    }

    if high_tone != NEUTRAL_TONE {
        // Negative mix subtracts the high band
        let high_mix = tone_mix(high_tone);
        let filtered = Biquad::high_pass(HIGH_TONE_CUTOFF_HZ, sample_rate).filter(&wet);
        for (sample, f) in wet.iter_mut().zip(filtered) {
            *sample += high_mix * f * TONE_MIX_DEPTH;
        }
        normalize_peak(&mut wet, 1.0);
        debug!("Treble tone mix {:+.2}", high_mix);
    }

    wet
}

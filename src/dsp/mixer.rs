//! Dry/wet mixer
//!
//! Sums the dry and wet stereo signals by level and normalizes the result to
//! a fixed headroom below full scale.

use log::debug;

use crate::engine::analysis::linear_to_db;
use crate::engine::buffer::StereoSignal;
use crate::error::{ReverbError, Result};

/// Output peak after normalization (about -0.45 dBFS)
pub const OUTPUT_HEADROOM: f64 = 0.95;

/// Mix `dry` and `wet` and normalize the global peak to `OUTPUT_HEADROOM`
///
/// A silent mix is returned as is.
///
/// # Errors
/// * `LengthMismatch` - `dry` and `wet` differ in length
pub fn mix(
    dry: &StereoSignal,
    wet: &StereoSignal,
    dry_level: f64,
    wet_level: f64,
) -> Result<StereoSignal> {
    if dry.len() != wet.len() {
        return Err(ReverbError::LengthMismatch {
            context: "dry/wet mix".to_string(),
            expected: dry.len(),
            actual: wet.len(),
        });
    }

    let blend = |d: &[f64], w: &[f64]| -> Vec<f64> {
        d.iter()
            .zip(w)
            .map(|(d, w)| dry_level * d + wet_level * w)
            .collect()
    };
    let left = blend(dry.left(), wet.left());
    let right = blend(dry.right(), wet.right());
    let mixed = StereoSignal::from_equal_channels(left, right);

    let peak = mixed.peak();
    if peak == 0.0 {
        debug!("Mix is silent; skipping normalization");
        return Ok(mixed);
    }

    let gain = OUTPUT_HEADROOM / peak;
    debug!(
        "Mix peak {:.1} dBFS, normalizing by {:.4}",
        linear_to_db(peak),
        gain
    );

    let (left, right) = mixed.into_parts();
    let scale = |channel: Vec<f64>| -> Vec<f64> { channel.into_iter().map(|s| s * gain).collect() };
    Ok(StereoSignal::from_equal_channels(scale(left), scale(right)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn signal(left: Vec<f64>, right: Vec<f64>) -> StereoSignal {
        StereoSignal::new(left, right).unwrap()
    }

    #[test]
    fn test_mix_levels_and_headroom() {
        let dry = signal(vec![1.0, 0.0, -0.5], vec![0.5, 0.5, 0.0]);
        let wet = signal(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 2.0]);
        let out = mix(&dry, &wet, 0.8, 0.5).unwrap();

        // Raw: L = [0.8, 0.5, -0.4], R = [0.4, 0.4, 1.0]; peak 1.0
        assert_abs_diff_eq!(out.left()[0], 0.8 * 0.95, epsilon = 1e-12);
        assert_abs_diff_eq!(out.left()[2], -0.4 * 0.95, epsilon = 1e-12);
        assert_abs_diff_eq!(out.right()[2], 0.95, epsilon = 1e-12);
        assert_abs_diff_eq!(out.peak(), OUTPUT_HEADROOM, epsilon = 1e-12);
    }

    #[test]
    fn test_quiet_mix_is_brought_up_to_headroom() {
        let dry = signal(vec![0.01, -0.02], vec![0.0, 0.01]);
        let wet = signal(vec![0.0; 2], vec![0.0; 2]);
        let out = mix(&dry, &wet, 1.0, 1.0).unwrap();
        assert_abs_diff_eq!(out.left()[1], -0.95, epsilon = 1e-12);
        assert_abs_diff_eq!(out.right()[1], 0.475, epsilon = 1e-12);
    }

    #[test]
    fn test_all_zero_mix_is_not_an_error() {
        let zeros = signal(vec![0.0; 64], vec![0.0; 64]);
        let out = mix(&zeros, &zeros, 0.8, 0.35).unwrap();
        assert_eq!(out, zeros);
    }

    #[test]
    fn test_zero_levels_give_silence() {
        let dry = signal(vec![0.3; 8], vec![-0.3; 8]);
        let out = mix(&dry, &dry, 0.0, 0.0).unwrap();
        assert!(out.left().iter().chain(out.right()).all(|&s| s == 0.0));
    }

    #[test]
    fn test_length_mismatch() {
        let dry = signal(vec![0.0; 4], vec![0.0; 4]);
        let wet = signal(vec![0.0; 5], vec![0.0; 5]);
        assert!(matches!(
            mix(&dry, &wet, 0.5, 0.5),
            Err(ReverbError::LengthMismatch {
                expected: 4,
                actual: 5,
                ..
            })
        ));
    }
}

//! Pipeline Property Tests
//!
//! Invariants each stage must hold for any valid input, checked through the
//! public stage functions.

use approx::assert_abs_diff_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use test_case::test_case;

use roomverb::dsp::convolution::{self, ConvolutionMethod};
use roomverb::dsp::impulse::{seeded_rng, synthesize, ImpulseResponse};
use roomverb::dsp::{mix, shape, widen, ReverbParameters, ReverbPreset, OUTPUT_HEADROOM};
use roomverb::engine::buffer::peak_abs;
use roomverb::StereoSignal;

fn noise(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<f64>() * 2.0 - 1.0).collect()
}

// === Impulse Response ===

#[test]
fn test_reference_impulse_response() {
    let params = ReverbParameters {
        room_size: 0.7,
        pre_delay_seconds: 0.03,
        decay_time_seconds: 2.5,
        damping: 0.3,
        reverberation: 0.6,
        num_early_reflections: 8,
        ..ReverbParameters::default()
    };
    let ir = synthesize(&params, 44100, &mut seeded_rng(Some(1))).unwrap();

    assert_eq!(ir.len(), 110250);
    assert_abs_diff_eq!(ir.samples()[0] * ir.raw_peak(), 0.001, epsilon = 1e-12);
    assert_ne!(ir.samples()[1323], 0.0);
    assert_abs_diff_eq!(peak_abs(ir.samples()), 1.0, epsilon = 1e-12);
}

#[test_case(ReverbPreset::SmallRoom ; "small room")]
#[test_case(ReverbPreset::Studio ; "studio")]
#[test_case(ReverbPreset::Hall ; "hall")]
#[test_case(ReverbPreset::Cathedral ; "cathedral")]
#[test_case(ReverbPreset::Plate ; "plate")]
fn test_impulse_response_peak_is_one(preset: ReverbPreset) {
    for seed in 0..4 {
        let ir = synthesize(&preset.parameters(), 16000, &mut seeded_rng(Some(seed))).unwrap();
        assert_abs_diff_eq!(peak_abs(ir.samples()), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_silent_impulse_response_is_unit_impulse() {
    let ir = ImpulseResponse::from_samples(vec![0.0; 16], 8000).unwrap();
    assert_eq!(ir.samples()[0], 1.0);
    assert!(ir.samples()[1..].iter().all(|&s| s == 0.0));
}

// === Convolution ===

#[test_case(1, 1 ; "single sample both")]
#[test_case(10, 1000 ; "ir longer than dry")]
#[test_case(1000, 10 ; "dry longer than ir")]
#[test_case(4096, 4096 ; "equal lengths")]
fn test_convolution_preserves_length(dry_len: usize, ir_len: usize) {
    let ir = ImpulseResponse::from_samples(noise(ir_len, 1), 8000).unwrap();
    let dry = noise(dry_len, 2);

    for method in [
        ConvolutionMethod::Auto,
        ConvolutionMethod::Direct,
        ConvolutionMethod::Fft,
    ] {
        assert_eq!(convolution::apply_with(&dry, &ir, method).len(), dry_len);
    }
}

#[test]
fn test_one_second_of_silence_stays_silent() {
    let ir = synthesize(
        &ReverbPreset::Hall.parameters(),
        44100,
        &mut seeded_rng(Some(4)),
    )
    .unwrap();
    let wet = convolution::apply(&vec![0.0; 44100], &ir);

    assert_eq!(wet.len(), 44100);
    assert!(wet.iter().all(|&s| s == 0.0));
}

#[test]
fn test_convolution_output_is_normalized() {
    let ir = ImpulseResponse::from_samples(noise(300, 5), 8000).unwrap();
    let wet = convolution::apply(&noise(2000, 6), &ir);
    assert_abs_diff_eq!(peak_abs(&wet), 1.0, epsilon = 1e-12);
}

// === Tone ===

#[test]
fn test_neutral_tone_is_identity() {
    let wet = noise(5000, 7);
    assert_eq!(shape(wet.clone(), 0.5, 0.5, 44100), wet);
}

// === Stereo ===

#[test_case(0.0 ; "no width")]
#[test_case(0.5 ; "half width")]
#[test_case(1.0 ; "full width")]
fn test_disabled_widener_is_identity(width: f64) {
    let wet = noise(800, 8);
    let stereo = widen(wet.clone(), width, false, 44100);
    assert_eq!(stereo.left(), wet.as_slice());
    assert_eq!(stereo.right(), wet.as_slice());
}

#[test]
fn test_zero_width_collapses_to_mono() {
    let stereo = widen(noise(800, 9), 0.0, true, 48000);
    assert_eq!(stereo.left(), stereo.right());
}

#[test]
fn test_full_width_right_is_left_delayed_44_samples() {
    let wet = noise(2000, 10);
    let stereo = widen(wet.clone(), 1.0, true, 44100);

    for i in 0..44 {
        // Delayed copy is still zero-padded history
        let (left, right) = (wet[i], 0.0);
        let mid = (left + right) / 2.0;
        let side = (left - right) / 2.0 * 1.0;
        assert_abs_diff_eq!(stereo.left()[i], mid + side, epsilon = 1e-12);
        assert_abs_diff_eq!(stereo.right()[i], mid - side, epsilon = 1e-12);
        assert_abs_diff_eq!(stereo.right()[i], 0.0, epsilon = 1e-12);
    }
    for i in 44..2000 {
        assert_abs_diff_eq!(stereo.right()[i], stereo.left()[i - 44], epsilon = 1e-12);
    }
}

// === Mixer ===

#[test_case(1.0, 1.0 ; "both full")]
#[test_case(0.8, 0.35 ; "hall levels")]
#[test_case(0.0, 1.0 ; "wet only")]
#[test_case(0.01, 0.02 ; "very quiet")]
fn test_mixer_peak_never_exceeds_headroom(dry_level: f64, wet_level: f64) {
    let dry = StereoSignal::new(noise(1000, 11), noise(1000, 12)).unwrap();
    let wet = StereoSignal::new(noise(1000, 13), noise(1000, 14)).unwrap();

    let out = mix(&dry, &wet, dry_level, wet_level).unwrap();
    assert!(out.peak() <= OUTPUT_HEADROOM + 1e-12);
    assert_abs_diff_eq!(out.peak(), OUTPUT_HEADROOM, epsilon = 1e-12);
}

#[test]
fn test_mixer_all_zero_inputs() {
    let zeros = StereoSignal::new(vec![0.0; 512], vec![0.0; 512]).unwrap();
    let out = mix(&zeros, &zeros, 0.8, 0.35).unwrap();
    assert!(out.left().iter().chain(out.right()).all(|&s| s == 0.0));
}

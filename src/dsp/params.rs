//! Reverb parameters
//!
//! `ReverbParameters` is the single immutable configuration consumed by the
//! pipeline. The core never fills in missing values; `validate` only checks
//! that every field lies in its domain.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReverbError, Result};

/// Perceptual reverb controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReverbParameters {
    /// Room size: 0 (closet) to 1 (huge hall); scales early-reflection spread
    pub room_size: f64,
    /// Gap before the first reflection, in seconds
    pub pre_delay_seconds: f64,
    /// RT60 in seconds; also the impulse response length
    pub decay_time_seconds: f64,
    /// Damping: 0 (bright tail) to 1 (dark tail)
    pub damping: f64,
    /// Wet signal level: 0 to 1
    pub wet_level: f64,
    /// Dry signal level: 0 to 1
    pub dry_level: f64,
    /// Bass tone: 0.5 is neutral, above boosts, below cuts
    pub low_tone: f64,
    /// Treble tone: 0.5 is neutral, above boosts, below cuts
    pub high_tone: f64,
    /// Stereo width: 0 (mono) to 1 (full)
    pub stereo_width: f64,
    /// Whether the wet signal is widened at all
    pub enable_stereo: bool,
    /// Overall reverberation amount: 0 to 1
    pub reverberation: f64,
    /// Number of discrete early reflections
    pub num_early_reflections: usize,
    /// Early reflection gain: 0 to 1
    pub early_reflection_gain: f64,
}

impl Default for ReverbParameters {
    fn default() -> Self {
        ReverbPreset::Hall.parameters()
    }
}

/// Reject non-finite values and values outside `[min, max]`
fn check_range(param: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ReverbError::invalid_parameter(
            param,
            value,
            format!("{:.1} to {:.1}", min, max),
        ));
    }
    Ok(())
}

impl ReverbParameters {
    /// Validate all parameters are within their domains
    pub fn validate(&self) -> Result<()> {
        check_range("room_size", self.room_size, 0.0, 1.0)?;
        if !self.pre_delay_seconds.is_finite() || self.pre_delay_seconds < 0.0 {
            return Err(ReverbError::invalid_parameter(
                "pre_delay_seconds",
                self.pre_delay_seconds,
                "0.0 or more seconds",
            ));
        }
        if !self.decay_time_seconds.is_finite() || self.decay_time_seconds <= 0.0 {
            return Err(ReverbError::invalid_parameter(
                "decay_time_seconds",
                self.decay_time_seconds,
                "more than 0.0 seconds",
            ));
        }
        check_range("damping", self.damping, 0.0, 1.0)?;
        check_range("wet_level", self.wet_level, 0.0, 1.0)?;
        check_range("dry_level", self.dry_level, 0.0, 1.0)?;
        check_range("low_tone", self.low_tone, 0.0, 1.0)?;
        check_range("high_tone", self.high_tone, 0.0, 1.0)?;
        check_range("stereo_width", self.stereo_width, 0.0, 1.0)?;
        check_range("reverberation", self.reverberation, 0.0, 1.0)?;
        check_range("early_reflection_gain", self.early_reflection_gain, 0.0, 1.0)?;
        Ok(())
    }
}

/// Check a sample rate is usable
pub fn validate_sample_rate(sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(ReverbError::invalid_parameter(
            "sample_rate",
            sample_rate,
            "a positive integer",
        ));
    }
    Ok(())
}

// ============================================================================
// Presets
// ============================================================================

/// Named starting points for `ReverbParameters`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReverbPreset {
    SmallRoom,
    Studio,
    Hall,
    Cathedral,
    Plate,
}

impl ReverbPreset {
    pub const ALL: [ReverbPreset; 5] = [
        ReverbPreset::SmallRoom,
        ReverbPreset::Studio,
        ReverbPreset::Hall,
        ReverbPreset::Cathedral,
        ReverbPreset::Plate,
    ];

    /// Kebab-case preset name
    pub fn name(&self) -> &'static str {
        match self {
            ReverbPreset::SmallRoom => "small-room",
            ReverbPreset::Studio => "studio",
            ReverbPreset::Hall => "hall",
            ReverbPreset::Cathedral => "cathedral",
            ReverbPreset::Plate => "plate",
        }
    }

    pub fn parameters(&self) -> ReverbParameters {
        match self {
            ReverbPreset::SmallRoom => ReverbParameters {
                room_size: 0.2,
                pre_delay_seconds: 0.005,
                decay_time_seconds: 0.6,
                damping: 0.5,
                wet_level: 0.25,
                dry_level: 0.9,
                low_tone: 0.5,
                high_tone: 0.45,
                stereo_width: 0.6,
                enable_stereo: true,
                reverberation: 0.4,
                num_early_reflections: 6,
                early_reflection_gain: 0.6,
            },
            ReverbPreset::Studio => ReverbParameters {
                room_size: 0.4,
                pre_delay_seconds: 0.015,
                decay_time_seconds: 1.2,
                damping: 0.4,
                wet_level: 0.3,
                dry_level: 0.85,
                low_tone: 0.5,
                high_tone: 0.5,
                stereo_width: 0.8,
                enable_stereo: true,
                reverberation: 0.5,
                num_early_reflections: 8,
                early_reflection_gain: 0.5,
            },
            ReverbPreset::Hall => ReverbParameters {
                room_size: 0.7,
                pre_delay_seconds: 0.03,
                decay_time_seconds: 2.5,
                damping: 0.3,
                wet_level: 0.35,
                dry_level: 0.8,
                low_tone: 0.5,
                high_tone: 0.5,
                stereo_width: 1.0,
                enable_stereo: true,
                reverberation: 0.6,
                num_early_reflections: 8,
                early_reflection_gain: 0.5,
            },
            ReverbPreset::Cathedral => ReverbParameters {
                room_size: 1.0,
                pre_delay_seconds: 0.06,
                decay_time_seconds: 5.0,
                damping: 0.2,
                wet_level: 0.5,
                dry_level: 0.6,
                low_tone: 0.6,
                high_tone: 0.4,
                stereo_width: 1.0,
                enable_stereo: true,
                reverberation: 0.85,
                num_early_reflections: 12,
                early_reflection_gain: 0.4,
            },
            ReverbPreset::Plate => ReverbParameters {
                room_size: 0.3,
                pre_delay_seconds: 0.0,
                decay_time_seconds: 1.8,
                damping: 0.1,
                wet_level: 0.4,
                dry_level: 0.75,
                low_tone: 0.4,
                high_tone: 0.65,
                stereo_width: 0.9,
                enable_stereo: true,
                reverberation: 0.7,
                num_early_reflections: 4,
                early_reflection_gain: 0.3,
            },
        }
    }
}

impl fmt::Display for ReverbPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReverbPreset {
    type Err = ReverbError;

    fn from_str(s: &str) -> Result<Self> {
        ReverbPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ReverbError::invalid_parameter(
                    "preset",
                    s,
                    "small-room, studio, hall, cathedral or plate",
                )
            })
    }
}

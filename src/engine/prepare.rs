//! Signal preparation
//!
//! Turns a decoded buffer into the two signals the reverb needs: the dry
//! stereo pair used for the final mix, and the mono feed that gets convolved.

use log::{debug, warn};

use crate::engine::buffer::{AudioBuffer, ChannelLayout, StereoSignal};
use crate::error::{ReverbError, Result};

/// Options for the signal preparer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrepareOptions {
    /// Truncate the input to this many seconds (analysis window)
    pub max_duration_secs: Option<f64>,
}

impl PrepareOptions {
    /// Options with an analysis window of `seconds`
    pub fn with_max_duration(seconds: f64) -> Self {
        Self {
            max_duration_secs: Some(seconds),
        }
    }
}

/// Output of the signal preparer
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSignal {
    /// Dry signal as a stereo pair (mono input is duplicated)
    pub dry: StereoSignal,
    /// Mono reverb feed: the single channel, or the mean of left and right
    pub mono: Vec<f64>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl PreparedSignal {
    /// Samples per channel
    pub fn len(&self) -> usize {
        self.mono.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mono.is_empty()
    }
}

/// Normalize channel layout and apply the analysis window
///
/// # Errors
/// * `InvalidParameter` - zero sample rate or a non-positive window
/// * `EmptyBuffer` - no samples left to process
pub fn prepare(buffer: &AudioBuffer, options: &PrepareOptions) -> Result<PreparedSignal> {
    let sample_rate = buffer.sample_rate();
    if sample_rate == 0 {
        return Err(ReverbError::invalid_parameter(
            "sample_rate",
            sample_rate,
            "a positive integer",
        ));
    }
    if buffer.is_empty() {
        return Err(ReverbError::EmptyBuffer);
    }

    let mut frames = buffer.len();
    if let Some(seconds) = options.max_duration_secs {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(ReverbError::invalid_parameter(
                "max_duration_secs",
                seconds,
                "a positive number of seconds",
            ));
        }
        let window = (seconds * sample_rate as f64).round() as usize;
        if window < frames {
            warn!(
                "Truncating input from {:.3}s to {:.3}s analysis window",
                buffer.duration_secs(),
                seconds
            );
            frames = window;
        }
    }
    if frames == 0 {
        return Err(ReverbError::EmptyBuffer);
    }

    let (dry, mono) = match buffer.layout() {
        ChannelLayout::Mono => {
            let mono = buffer.channel(0)[..frames].to_vec();
            (StereoSignal::dual_mono(mono.clone()), mono)
        }
        ChannelLayout::Stereo => {
            let left = buffer.channel(0)[..frames].to_vec();
            let right = buffer.channel(1)[..frames].to_vec();
            let mono = left
                .iter()
                .zip(right.iter())
                .map(|(l, r)| (l + r) * 0.5)
                .collect();
            (StereoSignal::new(left, right)?, mono)
        }
    };

    debug!(
        "Prepared {} frames at {} Hz ({:?} input)",
        frames,
        sample_rate,
        buffer.layout()
    );

    Ok(PreparedSignal {
        dry,
        mono,
        sample_rate,
    })
}

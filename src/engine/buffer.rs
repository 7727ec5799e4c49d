//! Audio Buffer Management
//!
//! Planar `f64` buffers handed between pipeline stages, plus the peak
//! normalization helpers every stage shares.

use log::debug;

use crate::error::{ReverbError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Largest absolute sample value, 0.0 for an empty slice
#[inline]
pub fn peak_abs(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0_f64, |peak, &s| peak.max(s.abs()))
}

/// Scale `samples` so their peak equals `target`
///
/// Returns the peak found before scaling. A zero peak leaves the samples
/// untouched (identity scale).
pub fn normalize_peak(samples: &mut [f64], target: f64) -> f64 {
    let peak = peak_abs(samples);
    if peak > 0.0 {
        let gain = target / peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    } else {
        debug!("Skipping normalization of silent signal ({} samples)", samples.len());
    }
    peak
}

// ============================================================================
// Channel Layout
// ============================================================================

/// Audio channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// Single channel (mono)
    Mono,
    /// Two channels (stereo: left, right)
    #[default]
    Stereo,
}

impl ChannelLayout {
    /// Returns the number of channels for this layout
    pub fn num_channels(&self) -> usize {
        match self {
            ChannelLayout::Mono => 1,
            ChannelLayout::Stereo => 2,
        }
    }

    /// Create a ChannelLayout from a channel count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelLayout::Mono),
            2 => Some(ChannelLayout::Stereo),
            _ => None,
        }
    }
}

// ============================================================================
// Audio Buffer
// ============================================================================

/// Decoded audio handed to the pipeline
///
/// Stores non-interleaved `f64` samples, one `Vec` per channel. Every channel
/// has the same length and there are one or two channels.
///
/// # Example
/// ```
/// use roomverb::engine::{AudioBuffer, ChannelLayout};
///
/// let buffer = AudioBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4], ChannelLayout::Stereo, 44100)
///     .unwrap();
/// assert_eq!(buffer.channels(), 2);
/// assert_eq!(buffer.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<Vec<f64>>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from planar channel data
    ///
    /// # Errors
    /// * `UnsupportedChannels` - if there are not exactly 1 or 2 channels
    /// * `LengthMismatch` - if the channels differ in length
    pub fn from_channels(samples: Vec<Vec<f64>>, sample_rate: u32) -> Result<Self> {
        if ChannelLayout::from_count(samples.len()).is_none() {
            return Err(ReverbError::UnsupportedChannels {
                channels: samples.len(),
            });
        }

        let expected = samples[0].len();
        if let Some(channel) = samples.iter().find(|ch| ch.len() != expected) {
            return Err(ReverbError::LengthMismatch {
                context: "audio buffer channels".to_string(),
                expected,
                actual: channel.len(),
            });
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a mono buffer
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples: vec![samples],
            sample_rate,
        }
    }

    /// Create a stereo buffer from left and right channels
    pub fn stereo(left: Vec<f64>, right: Vec<f64>, sample_rate: u32) -> Result<Self> {
        Self::from_channels(vec![left, right], sample_rate)
    }

    /// Create an audio buffer from interleaved sample data
    ///
    /// # Arguments
    /// * `interleaved` - Interleaved sample data (L, R, L, R, ... for stereo)
    /// * `layout` - Channel configuration
    /// * `sample_rate` - Sample rate in Hz
    pub fn from_interleaved(
        interleaved: &[f64],
        layout: ChannelLayout,
        sample_rate: u32,
    ) -> Result<Self> {
        let num_channels = layout.num_channels();

        if interleaved.len() % num_channels != 0 {
            return Err(ReverbError::LengthMismatch {
                context: "interleaved frames".to_string(),
                expected: interleaved.len() - interleaved.len() % num_channels,
                actual: interleaved.len(),
            });
        }

        let num_samples = interleaved.len() / num_channels;
        let mut samples = vec![Vec::with_capacity(num_samples); num_channels];

        for frame in interleaved.chunks_exact(num_channels) {
            for (ch, &sample) in frame.iter().enumerate() {
                samples[ch].push(sample);
            }
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Convert the buffer to interleaved format (L, R, L, R, ... for stereo)
    pub fn to_interleaved(&self) -> Vec<f64> {
        let mut interleaved = Vec::with_capacity(self.channels() * self.len());

        for sample_idx in 0..self.len() {
            for channel in &self.samples {
                interleaved.push(channel[sample_idx]);
            }
        }

        interleaved
    }

    /// Get the number of channels
    #[inline]
    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    /// Get the channel layout
    pub fn layout(&self) -> ChannelLayout {
        match self.channels() {
            1 => ChannelLayout::Mono,
            _ => ChannelLayout::Stereo,
        }
    }

    /// Get the sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get the number of samples per channel
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer holds no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Get immutable access to a channel's samples
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f64] {
        &self.samples[index]
    }

    /// Consume the buffer, returning its planar channel data
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.samples
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.samples
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|s| s.is_finite())
    }
}

// ============================================================================
// Stereo Signal
// ============================================================================

/// Owned left/right pair of equal length
///
/// Used for the dry channel pair, the widened wet signal and the final mix.
#[derive(Debug, Clone, PartialEq)]
pub struct StereoSignal {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl StereoSignal {
    /// Pair two channels, rejecting unequal lengths
    pub fn new(left: Vec<f64>, right: Vec<f64>) -> Result<Self> {
        if left.len() != right.len() {
            return Err(ReverbError::LengthMismatch {
                context: "stereo channel pair".to_string(),
                expected: left.len(),
                actual: right.len(),
            });
        }
        Ok(Self { left, right })
    }

    /// Pair two channels the caller built with the same length
    pub(crate) fn from_equal_channels(left: Vec<f64>, right: Vec<f64>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self { left, right }
    }

    /// Duplicate a mono signal onto both channels
    pub fn dual_mono(samples: Vec<f64>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    pub fn left(&self) -> &[f64] {
        &self.left
    }

    pub fn right(&self) -> &[f64] {
        &self.right
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Peak absolute value across both channels
    pub fn peak(&self) -> f64 {
        peak_abs(&self.left).max(peak_abs(&self.right))
    }

    /// Split into `(left, right)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.left, self.right)
    }

    /// Convert into a stereo `AudioBuffer` at the given sample rate
    pub fn into_audio_buffer(self, sample_rate: u32) -> AudioBuffer {
        AudioBuffer {
            samples: vec![self.left, self.right],
            sample_rate,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_abs() {
        assert_eq!(peak_abs(&[]), 0.0);
        assert_eq!(peak_abs(&[0.1, -0.7, 0.5]), 0.7);
    }

    #[test]
    fn test_normalize_peak() {
        let mut samples = vec![0.25, -0.5, 0.1];
        let peak = normalize_peak(&mut samples, 1.0);
        assert_eq!(peak, 0.5);
        assert_eq!(samples, vec![0.5, -1.0, 0.2]);
    }

    #[test]
    fn test_normalize_peak_silent_is_identity() {
        let mut samples = vec![0.0; 16];
        let peak = normalize_peak(&mut samples, 1.0);
        assert_eq!(peak, 0.0);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_channel_layout() {
        assert_eq!(ChannelLayout::Mono.num_channels(), 1);
        assert_eq!(ChannelLayout::Stereo.num_channels(), 2);
        assert_eq!(ChannelLayout::from_count(1), Some(ChannelLayout::Mono));
        assert_eq!(ChannelLayout::from_count(2), Some(ChannelLayout::Stereo));
        assert_eq!(ChannelLayout::from_count(6), None);
    }

    #[test]
    fn test_buffer_from_interleaved_stereo() {
        let interleaved = vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
        let buffer =
            AudioBuffer::from_interleaved(&interleaved, ChannelLayout::Stereo, 44100).unwrap();

        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.channel(0), &[0.1, 0.3, 0.5]);
        assert_eq!(buffer.channel(1), &[0.2, 0.4, 0.6]);
        assert_eq!(buffer.to_interleaved(), interleaved);
    }

    #[test]
    fn test_buffer_from_interleaved_invalid() {
        // 5 samples can't be evenly split into stereo
        let result =
            AudioBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5], ChannelLayout::Stereo, 44100);
        assert!(matches!(result, Err(ReverbError::LengthMismatch { .. })));
    }

    #[test]
    fn test_buffer_rejects_unequal_channels() {
        let result = AudioBuffer::stereo(vec![0.0; 10], vec![0.0; 9], 44100);
        assert!(matches!(
            result,
            Err(ReverbError::LengthMismatch {
                expected: 10,
                actual: 9,
                ..
            })
        ));
    }

    #[test]
    fn test_buffer_rejects_surround() {
        let result = AudioBuffer::from_channels(vec![vec![0.0; 4]; 6], 48000);
        assert!(matches!(
            result,
            Err(ReverbError::UnsupportedChannels { channels: 6 })
        ));

        let result = AudioBuffer::from_channels(Vec::new(), 48000);
        assert!(matches!(
            result,
            Err(ReverbError::UnsupportedChannels { channels: 0 })
        ));
    }

    #[test]
    fn test_buffer_duration() {
        let buffer = AudioBuffer::mono(vec![0.0; 22050], 44100);
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(buffer.layout(), ChannelLayout::Mono);
    }

    #[test]
    fn test_buffer_is_finite() {
        assert!(AudioBuffer::mono(vec![0.5; 8], 44100).is_finite());
        assert!(!AudioBuffer::mono(vec![f64::NAN; 8], 44100).is_finite());
    }

    #[test]
    fn test_stereo_signal_length_check() {
        assert!(StereoSignal::new(vec![0.0; 3], vec![0.0; 3]).is_ok());
        assert!(matches!(
            StereoSignal::new(vec![0.0; 3], vec![0.0; 4]),
            Err(ReverbError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_stereo_signal_dual_mono() {
        let signal = StereoSignal::dual_mono(vec![0.1, -0.4]);
        assert_eq!(signal.left(), signal.right());
        assert_eq!(signal.peak(), 0.4);

        let buffer = signal.into_audio_buffer(48000);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.sample_rate(), 48000);
    }
}

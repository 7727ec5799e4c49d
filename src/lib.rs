//! Roomverb - Synthetic Room Reverb
//!
//! Adds room reverberation to a finite, decoded audio recording:
//! 1. Synthesize an impulse response from perceptual parameters
//!    (room size, pre-delay, decay, damping, early reflections)
//! 2. Convolve the dry signal with it
//! 3. Reshape the low/high tonal balance of the wet signal
//! 4. Widen the wet signal into stereo
//! 5. Mix wet against dry and normalize with headroom
//!
//! # Example
//!
//! ```no_run
//! use roomverb::{AudioBuffer, ReverbPreset, ReverbProcessor};
//!
//! let input = AudioBuffer::mono(vec![0.0; 44100], 44100);
//! let processor = ReverbProcessor::new(ReverbPreset::Hall.parameters())?;
//! let result = processor.process_seeded(&input, Some(42))?;
//! assert_eq!(result.output.len(), 44100);
//! # Ok::<(), roomverb::ReverbError>(())
//! ```

pub mod cli;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod pipeline;

pub use dsp::{ConvolutionMethod, ImpulseResponse, ReverbParameters, ReverbPreset};
pub use engine::{AudioBuffer, ChannelLayout, SignalReport, StereoSignal};
pub use error::{ReverbError, Result};
pub use pipeline::{ReverbOutput, ReverbProcessor};

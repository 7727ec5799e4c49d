//! Audio Engine Module
//!
//! Buffer types and the code around the reverb pipeline:
//! - Audio buffer management
//! - Signal preparation (channel layout, analysis window)
//! - Signal measurements
//! - WAV file I/O

pub mod analysis;
pub mod buffer;
pub mod io;
pub mod prepare;

pub use analysis::SignalReport;
pub use buffer::{normalize_peak, peak_abs, AudioBuffer, ChannelLayout, StereoSignal};
pub use io::{load_wav, save_wav};
pub use prepare::{prepare, PrepareOptions, PreparedSignal};

//! Error handling for Roomverb
//!
//! Every fatal condition in the pipeline maps onto one `ReverbError` variant.
//! Degenerate (all-zero) signals are not errors: normalization steps fall
//! back to an identity scale instead.

use thiserror::Error;

/// Result type alias for Roomverb operations
pub type Result<T> = std::result::Result<T, ReverbError>;

/// Main error type for Roomverb operations
#[derive(Error, Debug)]
pub enum ReverbError {
    // Parameter Errors
    #[error("Invalid parameter: {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    // Buffer Errors
    #[error("Length mismatch in {context}: expected {expected} samples, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Audio buffer is empty")]
    EmptyBuffer,

    #[error("Unsupported channel count: {channels} (only mono and stereo are supported)")]
    UnsupportedChannels { channels: usize },

    // Audio I/O Errors
    #[error("Failed to read audio file: {path}")]
    AudioRead {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWrite {
        path: String,
        #[source]
        source: hound::Error,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReverbError {
    /// Build an `InvalidParameter` error from any displayable value
    pub fn invalid_parameter(
        param: &str,
        value: impl std::fmt::Display,
        expected: impl Into<String>,
    ) -> Self {
        ReverbError::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ReverbError::InvalidParameter { .. } => "INVALID_PARAMETER",
            ReverbError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            ReverbError::EmptyBuffer => "EMPTY_BUFFER",
            ReverbError::UnsupportedChannels { .. } => "UNSUPPORTED_CHANNELS",
            ReverbError::AudioRead { .. } => "AUDIO_READ_ERROR",
            ReverbError::AudioWrite { .. } => "AUDIO_WRITE_ERROR",
            ReverbError::Io(_) => "IO_ERROR",
            ReverbError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "Adjust the parameter to be within its valid range",
            Self::LengthMismatch { .. } => "Make sure every channel holds the same number of samples",
            Self::EmptyBuffer => "Load audio before processing",
            Self::UnsupportedChannels { .. } => "Downmix the audio to mono or stereo first",
            Self::AudioRead { .. } => "Check that the file exists and is a valid WAV file",
            Self::AudioWrite { .. } => "Check that the output directory exists and is writable",
            Self::Serialization(_) => "Check the parameter file is valid JSON",
            _ => "Check the error details and try again",
        }
    }
}

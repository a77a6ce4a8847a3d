use core::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use thiserror::Error;

/// Result type for wav_codec operations
pub type WavCodecResult<T> = Result<T, WavCodecError>;

/// Error type for wav_codec operations
///
/// Container-level problems (bad magic, chunk ordering, truncation) carry
/// an [`ErrorPosition`] pointing at the offending bytes. Format-level
/// problems name the rejected value so callers can report it verbatim.
#[derive(Debug, Error)]
pub enum WavCodecError {
    /// File I/O errors (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// RIFF container structure violations: bad magic, truncated chunk
    /// headers, inconsistent fmt fields
    #[error("Invalid container at {position}: {description} - {details}")]
    InvalidContainer {
        description: String,
        details: String,
        position: ErrorPosition,
    },

    /// The fmt chunk declared a format tag other than integer PCM (0x0001)
    /// or IEEE float (0x0003)
    #[error("Unsupported format code in WAV file: 0x{0:04x}")]
    UnsupportedFormatCode(u16),

    /// No converter is registered for the requested (bit depth, float) pair
    #[error("Unsupported data format: {0}")]
    UnsupportedSampleFormat(String),

    /// A data chunk appeared before any fmt chunk
    #[error("Missing \"fmt \" chunk before \"data\" chunk")]
    MissingFmtChunk,

    /// The chunk walk exhausted the buffer without finding a data chunk
    #[error("Missing \"data\" chunk in WAV file")]
    MissingDataChunk,

    /// Caller-supplied channel buffers cannot be encoded as given
    #[error("Invalid encode input: {0}")]
    InvalidEncodeInput(String),
}

/// Position information for errors that occur during parsing
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    /// Byte offset in the buffer where the error occurred
    pub offset: usize,
    /// Human-readable description of the position
    pub description: String,
}

impl ErrorPosition {
    /// Create a new error position at the given byte offset
    pub fn new(offset: usize) -> Self {
        Self {
            offset,
            description: format!("byte offset {}", offset),
        }
    }

    /// Set a custom description for the error position
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Display for ErrorPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        if self.description.is_empty() {
            write!(f, "byte offset {}", self.offset)
        } else {
            write!(f, "{}", self.description)
        }
    }
}

impl WavCodecError {
    /// Create an InvalidContainer error with position information
    pub fn invalid_container(
        description: impl Into<String>,
        details: impl Into<String>,
        position: ErrorPosition,
    ) -> Self {
        WavCodecError::InvalidContainer {
            description: description.into(),
            details: details.into(),
            position,
        }
    }

    /// Create an InvalidContainer error without position information
    pub fn invalid_container_simple(
        description: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        WavCodecError::InvalidContainer {
            description: description.into(),
            details: details.into(),
            position: ErrorPosition::default(),
        }
    }

    /// Create an UnsupportedSampleFormat error naming the format key
    pub fn unsupported_sample_format(key: impl Into<String>) -> Self {
        WavCodecError::UnsupportedSampleFormat(key.into())
    }

    /// Create an InvalidEncodeInput error with a custom message
    pub fn invalid_encode_input(message: impl Into<String>) -> Self {
        WavCodecError::InvalidEncodeInput(message.into())
    }
}

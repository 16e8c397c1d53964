//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during composition and probing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Could not determine duration of {path}: {attempts}")]
    DurationUnresolved { path: PathBuf, attempts: String },

    #[error("Invalid composition: {0}")]
    InvalidComposition(String),

    #[error("Composition timed out after {0} seconds. Try with shorter clips or simpler transitions.")]
    Timeout(u64),

    #[error("Composition failed: {message}")]
    CompositionFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    /// The I/O channel to the FFmpeg process broke mid-run. Transient; the
    /// caller may retry the whole composition.
    #[error("FFmpeg process pipe was interrupted")]
    InterruptedPipe,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a composition failure error.
    pub fn composition_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::CompositionFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// True for failures worth retrying at the orchestration layer.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InterruptedPipe | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(MediaError::InterruptedPipe.is_retryable());
        assert!(MediaError::Timeout(300).is_retryable());
        assert!(!MediaError::FfmpegNotFound.is_retryable());
        assert!(!MediaError::InvalidComposition("x".into()).is_retryable());
    }
}

//! Error types for the data pipeline.

use thiserror::Error;

/// Top-level error returned by pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad CLI input, missing or invalid directory, missing password, unreadable config.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A per-file processor raised an error it classified as fatal.
    #[error("Processing failed for {file}: {message}")]
    ProcessingFailed { file: String, message: String },

    #[error("Run interrupted: {0}")]
    Interrupted(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Process exit code for this error kind.
    ///
    /// Configuration and lookup errors exit with 1, run failures with 2,
    /// and an interrupted run with 130 (the conventional SIGINT status).
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::ConfigError(_) | PipelineError::NotFound(_) => 1,
            PipelineError::Interrupted(_) => 130,
            PipelineError::ProcessingFailed { .. }
            | PipelineError::Unexpected(_)
            | PipelineError::IoError(_) => 2,
        }
    }
}

impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::ConfigError(err.to_string())
    }
}

/// Error raised by a per-file processor.
///
/// Non-fatal errors are recorded against the file and the run continues;
/// fatal errors (e.g. store unreachable) fail the whole run.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ProcessingError {
    pub message: String,
    pub fatal: bool,
}

impl ProcessingError {
    pub fn recoverable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: false,
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fatal: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(PipelineError::ConfigError("x".into()).exit_code(), 1);
        assert_eq!(PipelineError::NotFound("0042".into()).exit_code(), 1);
        assert_eq!(PipelineError::Interrupted("ctrl-c".into()).exit_code(), 130);
        assert_eq!(PipelineError::Unexpected("boom".into()).exit_code(), 2);
        let err = PipelineError::ProcessingFailed {
            file: "a.txt".into(),
            message: "store unreachable".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_processing_error_constructors() {
        assert!(!ProcessingError::recoverable("bad row").fatal);
        assert!(ProcessingError::fatal("store down").fatal);
        assert_eq!(ProcessingError::fatal("store down").to_string(), "store down");
    }
}

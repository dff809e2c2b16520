#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! Error types for memory statistics logging

use std::path::PathBuf;

use thiserror::Error;

/// Result type for memlog operations
pub type Result<T> = std::result::Result<T, MemlogError>;

/// Errors raised by the memory statistics collector
#[derive(Debug, Error)]
pub enum MemlogError {
    /// A mandatory configuration key is absent while logging is enabled
    #[error("configuration key '{0}' is mandatory when memory logging is enabled")]
    MissingConfigKey(&'static str),

    /// Configuration value failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The log destination could not be opened
    #[error("failed to open log file '{path}': {reason}")]
    LogOpenFailed { path: PathBuf, reason: String },

    /// A record could not be appended to the log destination
    #[error("failed to write log file: {0}")]
    LogWriteFailed(String),

    /// The memory usage source could not be read
    #[error("failed to read memory usage: {0}")]
    MemoryReadFailed(String),

    /// A memory usage line could not be parsed
    #[error("failed to parse memory usage: {0}")]
    MemoryParseFailed(String),

    /// The background sampler thread could not be started
    #[error("failed to start sampler thread: {0}")]
    SamplerSpawnFailed(String),

    /// Generic I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MemlogError {
    /// Create a log-open error.
    pub fn log_open_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::LogOpenFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

//! Error types for the turnstile crate.

use thiserror::Error;

/// Main error type for turnstile operations.
#[derive(Error, Debug)]
pub enum TurnstileError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote counter transport errors (connect, timeout, body decode)
    #[error("Remote counter error: {0}")]
    RemoteTransport(#[from] reqwest::Error),

    /// Remote counter responded with a non-success status
    #[error("Remote counter returned status {0}")]
    RemoteStatus(reqwest::StatusCode),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for turnstile operations.
pub type Result<T> = std::result::Result<T, TurnstileError>;

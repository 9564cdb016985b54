//! Error types for the Atlas gateway

use thiserror::Error;

/// Result type alias for Atlas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Atlas gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Vocabulary file missing, unreadable, or empty
    #[error("vocabulary error: {0}")]
    Vocabulary(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

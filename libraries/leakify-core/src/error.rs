/// Core error types for Leakify
use thiserror::Error;

/// Result type alias using `LeakifyError`
pub type Result<T> = std::result::Result<T, LeakifyError>;

/// Core error type for Leakify
#[derive(Error, Debug)]
pub enum LeakifyError {
    /// Persistence errors (preference store, files)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backend could not be reached or answered with an error
    #[error("Network error: {0}")]
    Network(String),

    /// Session expired or was never established
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl LeakifyError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the caller has to log in again before retrying
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

//! Error types for the Leakify backend client.

use thiserror::Error;

/// Errors that can occur when talking to the Leakify backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Session missing or expired
    #[error("Authentication required")]
    AuthRequired,

    /// Login was rejected
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl From<ClientError> for leakify_core::LeakifyError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthRequired | ClientError::AuthFailed(_) => Self::AuthRequired,
            ClientError::InvalidUrl(msg) => Self::invalid_input(msg),
            other => Self::network(other.to_string()),
        }
    }
}

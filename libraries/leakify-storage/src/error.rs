/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backing file could not be read or written
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store refused the write
    #[error("Write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}

impl StorageError {
    /// Create a write rejected error
    pub fn write_rejected(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteRejected {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for leakify_core::LeakifyError {
    fn from(err: StorageError) -> Self {
        leakify_core::LeakifyError::storage(err.to_string())
    }
}

//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Filtered view has no songs
    #[error("Nothing to play: the current view is empty")]
    EmptyView,

    /// Preference store failed
    #[error("Storage error: {0}")]
    Storage(#[from] leakify_storage::StorageError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<PlaybackError> for leakify_core::LeakifyError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::Storage(e) => e.into(),
            other => leakify_core::LeakifyError::Other(other.to_string()),
        }
    }
}

//! Core traits that platform layers implement

use crate::error::Result;
use crate::types::Song;
use async_trait::async_trait;

/// Remote side of the library: song listing and playback URLs.
///
/// Implemented over HTTP by `leakify-client`; front-ends hold it as
/// `Arc<dyn LibraryBackend>` and feed the results back into the session.
#[async_trait]
pub trait LibraryBackend: Send + Sync {
    /// Fetch the full song list
    async fn fetch_songs(&self) -> Result<Vec<Song>>;

    /// Fetch a fresh playback URL for one song
    async fn fresh_url(&self, filename: &str) -> Result<String>;
}

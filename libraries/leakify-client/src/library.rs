//! Song listing and playback URLs.

use crate::error::{ClientError, Result};
use crate::types::SongUrlResponse;
use leakify_core::{Song, SongList};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Library client for the Leakify backend.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a Url,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a Url) -> Self {
        Self { http, base_url }
    }

    /// Fetch every song the session may play.
    pub async fn songs(&self) -> Result<Vec<Song>> {
        let url = self.endpoint("api/songs")?;
        debug!(url = %url, "Fetching song list");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let list: SongList = parse(response, "song list").await?;
        debug!(songs = list.songs.len(), "Fetched song list");
        Ok(list.songs)
    }

    /// Ask for a fresh signed playback URL for one song.
    pub async fn song_url(&self, filename: &str) -> Result<String> {
        let url = self.endpoint("api/song-url")?;
        debug!(url = %url, filename = %filename, "Fetching playback URL");

        let response = self
            .http
            .get(url)
            .query(&[("path", filename)])
            .send()
            .await
            .map_err(ClientError::from_send)?;

        let body: SongUrlResponse = parse(response, "song url").await?;
        Ok(body.url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }
}

async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
    } else if status.as_u16() == 401 {
        Err(ClientError::AuthRequired)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

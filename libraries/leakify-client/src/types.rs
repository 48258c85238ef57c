//! Request and response types of the backend API.

use serde::{Deserialize, Serialize};

/// Connection settings for a Leakify backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://music.example.com`
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 30,
        }
    }
}

/// Body of `POST /api/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub user: String,
    pub pass: String,
}

/// Answer of `POST /api/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Answer of `GET /api/song-url`
#[derive(Debug, Clone, Deserialize)]
pub struct SongUrlResponse {
    pub url: String,
}

/// Stored login, replayed when the session cookie expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

//! Main Leakify backend client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::library::LibraryClient;
use crate::types::{ClientConfig, Credentials};
use async_trait::async_trait;
use leakify_core::{LibraryBackend, Song};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;
use url::Url;

/// Client for a Leakify backend.
///
/// Keeps a cookie-backed session. The credentials of the last successful
/// login are remembered so an expired session can be renewed transparently
/// (see [`LeakifyClient::with_relogin`]).
///
/// # Example
///
/// ```ignore
/// use leakify_client::{ClientConfig, LeakifyClient};
///
/// let client = LeakifyClient::new(ClientConfig::new("https://music.example.com"))?;
/// client.login("user", "password").await?;
///
/// let songs = client.songs().await?;
/// println!("Found {} songs", songs.len());
/// ```
#[derive(Clone)]
pub struct LeakifyClient {
    http: Client,
    base_url: Url,
    credentials: Arc<RwLock<Option<Credentials>>>,
}

impl LeakifyClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.url)?;

        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Leakify/{} (CLI)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url,
            credentials: Arc::new(RwLock::new(None)),
        })
    }

    /// Base URL, always ending in `/`.
    pub fn url(&self) -> &Url {
        &self.base_url
    }

    /// Log in and remember the credentials for later renewal.
    pub async fn login(&self, user: &str, pass: &str) -> Result<()> {
        AuthClient::new(&self.http, &self.base_url)
            .login(user, pass)
            .await?;

        *self.credentials.write().await = Some(Credentials {
            user: user.to_string(),
            pass: pass.to_string(),
        });
        Ok(())
    }

    pub async fn is_logged_in(&self) -> bool {
        self.credentials.read().await.is_some()
    }

    /// Fetch the song list.
    pub async fn songs(&self) -> Result<Vec<Song>> {
        self.library().songs().await
    }

    /// Fetch a fresh signed playback URL for `filename`.
    pub async fn song_url(&self, filename: &str) -> Result<String> {
        self.library().song_url(filename).await
    }

    /// Get the library client.
    pub fn library(&self) -> LibraryClient<'_> {
        LibraryClient::new(&self.http, &self.base_url)
    }

    /// Conventional streaming endpoint `/play/{filename}`.
    ///
    /// The filename becomes a single percent-encoded path segment, so
    /// slashes inside it are escaped.
    pub fn play_url(&self, filename: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl("base URL cannot have a path".into()))?
            .pop_if_empty()
            .push("play")
            .push(filename);
        Ok(url)
    }

    /// Resolve a playback URL handed out by the backend.
    ///
    /// Absolute URLs pass through; server-relative ones are joined onto the
    /// base URL.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        self.base_url
            .join(url)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    /// The underlying HTTP client, sharing this client's session cookie.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Execute an operation, logging in again once if the session expired.
    pub async fn with_relogin<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match operation().await {
            Ok(result) => Ok(result),
            Err(ClientError::AuthRequired) => {
                let Some(credentials) = self.credentials.read().await.clone() else {
                    return Err(ClientError::AuthRequired);
                };

                warn!("Session expired, logging in again");
                self.login(&credentials.user, &credentials.pass).await?;

                operation().await
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl LibraryBackend for LeakifyClient {
    async fn fetch_songs(&self) -> leakify_core::Result<Vec<Song>> {
        Ok(self.with_relogin(|| self.songs()).await?)
    }

    async fn fresh_url(&self, filename: &str) -> leakify_core::Result<String> {
        let url = self.with_relogin(|| self.song_url(filename)).await?;
        Ok(self.resolve(&url)?.to_string())
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    let mut url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

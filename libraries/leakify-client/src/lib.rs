//! Leakify Backend Client
//!
//! HTTP client library for the Leakify backend API.
//!
//! # Features
//!
//! - **Authentication**: cookie session via `POST /api/login`, with
//!   transparent re-login when the session expires
//! - **Library**: song listing and fresh signed playback URLs
//! - **Streaming URLs**: the conventional `/play/{filename}` endpoint
//! - **Cache policy**: which requests an offline cache may serve
//!
//! # Example
//!
//! ```ignore
//! use leakify_client::{ClientConfig, LeakifyClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LeakifyClient::new(ClientConfig::new("https://music.example.com"))?;
//!     client.login("user", "password").await?;
//!
//!     let songs = client.with_relogin(|| client.songs()).await?;
//!     println!("Found {} songs", songs.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
pub mod cache_policy;
mod client;
mod error;
mod library;
mod types;

pub use auth::AuthClient;
pub use client::LeakifyClient;
pub use error::{ClientError, Result};
pub use library::LibraryClient;
pub use types::{ClientConfig, Credentials, LoginRequest, LoginResponse, SongUrlResponse};

//! Leakify Storage
//!
//! Local persistence for user preferences: liked songs and the
//! recently-played list.
//!
//! # Architecture
//!
//! - **Key-value backends**: `KeyValueStore` with an in-memory adapter and a
//!   JSON file adapter
//! - **Preferences**: `PreferenceStore` keeps the liked set and the bounded
//!   recent list, writing through on every change
//!
//! # Example
//!
//! ```rust
//! use leakify_core::Song;
//! use leakify_storage::{MemoryStore, PreferenceStore};
//!
//! # fn main() -> Result<(), leakify_storage::StorageError> {
//! let mut prefs = PreferenceStore::load(MemoryStore::new())?;
//! assert!(prefs.toggle_like("intro.mp3")?);
//!
//! prefs.record_play(&Song::new("intro.mp3", "Intro", "Artist"))?;
//! assert_eq!(prefs.recent_len(), 1);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod kv;
pub mod preferences;

pub use error::{Result, StorageError};
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub use preferences::{PreferenceStore, LIKES_KEY, RECENT_CAPACITY, RECENT_KEY};

//! Leakify Core
//!
//! Platform-agnostic types, catalog filtering and error handling shared by
//! every Leakify crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `SongRecord`
//! - **Catalog**: the song snapshot plus its filtered view
//! - **Core Traits**: `LibraryBackend`
//! - **Error Handling**: unified `LeakifyError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use leakify_core::{Catalog, FilterSpec, Song};
//!
//! let mut catalog = Catalog::new();
//! catalog.replace(vec![
//!     Song::new("a.mp3", "A", "X"),
//!     Song::new("b.mp3", "B", "Y"),
//!     Song::new("c.mp3", "C", "X"),
//! ]);
//! catalog.apply_filter(FilterSpec::artist("X"));
//!
//! let titles: Vec<_> = catalog.view().map(|s| s.title.as_str()).collect();
//! assert_eq!(titles, ["A", "C"]);
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod traits;
pub mod types;

pub use catalog::{filter_indices, Catalog, FilterSpec, LibraryStatus, Scope};
pub use error::{LeakifyError, Result};
pub use traits::LibraryBackend;
pub use types::{Song, SongList, SongRecord};

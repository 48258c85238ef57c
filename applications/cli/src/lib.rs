//! Leakify CLI Library
//!
//! Terminal front-end for the Leakify player: configuration, a headless
//! media output, the stdin command language and the event loop.
//!
//! This library exposes the components for testing purposes.

pub mod config;
pub mod error;
pub mod input;
pub mod media;
pub mod player;
pub mod render;

// Re-export commonly used types for convenience
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use media::ProbeOutput;
pub use player::{Completion, Player};

//! Platform-agnostic playback management for Leakify
//!
//! This crate provides the playback engine behind every Leakify front-end:
//! - Navigation over the filtered view (next, previous with a back-stack,
//!   shuffle, repeat)
//! - A playback controller for a single media output, with one URL-refresh
//!   retry per load and stale-result discarding
//! - Seek, volume and a sleep timer with a linear fade-out
//! - Likes and recently-played bookkeeping through `leakify-storage`
//! - A command interface and read-only views for presentation
//!
//! # Architecture
//!
//! The engine is synchronous and performs no I/O of its own. The platform
//! provides a [`MediaOutput`], feeds its notifications back through
//! [`PlayerSession::handle_media_event`] and reacts to the events returned
//! by [`PlayerSession::drain_events`], for instance fetching a fresh playback
//! URL on [`PlaybackEvent::UrlRefreshRequested`].
//!
//! # Example
//!
//! ```rust
//! use leakify_core::Song;
//! use leakify_playback::{
//!     Command, LoadTicket, MediaEvent, MediaOutput, MediaSource, PlaybackConfig, PlayerSession,
//! };
//! use leakify_storage::{MemoryStore, PreferenceStore};
//! use std::time::{Duration, Instant};
//!
//! #[derive(Default)]
//! struct Silent(Option<LoadTicket>);
//!
//! impl MediaOutput for Silent {
//!     fn load(&mut self, ticket: LoadTicket, _source: &MediaSource) {
//!         self.0 = Some(ticket);
//!     }
//!     fn play(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _position: Duration) {}
//!     fn set_gain(&mut self, _gain: f32) {}
//! }
//!
//! let prefs = PreferenceStore::load(MemoryStore::new()).unwrap();
//! let mut session = PlayerSession::new(&PlaybackConfig::default(), Silent::default(), prefs);
//! session.load_catalog(Ok(vec![Song::new("a.mp3", "A", "X")]));
//!
//! session.dispatch(Command::TogglePlayPause, Instant::now()).unwrap();
//! let ticket = session.output_mut().0.unwrap();
//! session.handle_media_event(ticket, MediaEvent::Started);
//!
//! assert_eq!(session.recently_played().len(), 1);
//! ```

pub mod command;
pub mod controller;
mod error;
pub mod events;
pub mod history;
pub mod navigation;
pub mod output;
pub mod session;
pub mod sleep_timer;
pub mod types;
pub mod views;
mod volume;

pub use command::Command;
pub use controller::{MediaOutcome, PlaybackController};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use navigation::{Navigator, TrackEndAction};
pub use output::MediaOutput;
pub use session::PlayerSession;
pub use sleep_timer::{SleepTick, SleepTimer};
pub use types::{
    Attempt, LoadTicket, MediaErrorKind, MediaEvent, MediaSource, PlaybackConfig, PlaybackState,
};
pub use views::{NowPlaying, Upcoming};
pub use volume::Volume;

//! Playback Events
//!
//! Event-based communication for UI synchronization. The engine queues
//! events while handling commands and media notifications; front-ends pick
//! them up with `drain_events()`.

use crate::types::{LoadTicket, PlaybackState};
use leakify_core::LibraryStatus;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playback state changed (loading, playing, paused, stopped)
    StateChanged { state: PlaybackState },

    /// A new track was handed to the media output
    TrackChanged {
        song_id: String,
        previous_song_id: Option<String>,
    },

    /// Audio actually began for the current track
    PlaybackStarted { song_id: String },

    /// Position update, suppressed during a seek gesture
    PositionUpdate {
        position_ms: u64,
        duration_ms: Option<u64>,
    },

    /// Volume changed
    VolumeChanged { level: u8 },

    /// Shuffle or repeat flipped
    ModesChanged { shuffle: bool, repeat: bool },

    /// The first load failed; the front-end should fetch a fresh playback URL
    /// for `song_id` and report back with the same ticket.
    UrlRefreshRequested { ticket: LoadTicket, song_id: String },

    /// Playback of a song gave up after its retry
    PlaybackFailed { song_id: String, reason: String },

    LikeChanged { song_id: String, liked: bool },

    /// Recently-played list changed
    RecentChanged { len: usize },

    /// Catalog loaded, failed or re-filtered
    LibraryChanged { status: LibraryStatus },

    /// Backend rejected the session; show the login gate
    AuthRequired,

    /// Sleep timer armed, re-armed or cancelled
    SleepTimerChanged { remaining_secs: Option<u64> },

    /// Sleep timer ran out
    SleepTimerExpired,

    /// Non-fatal error worth surfacing
    Error { message: String },
}

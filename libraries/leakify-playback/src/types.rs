//! Core playback types

use leakify_core::Song;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Playback state
///
/// `Unloaded` is the state before anything was ever played. `Stopped` means
/// a track is selected but nothing is playing, either because its load failed
/// or because it ended with nowhere to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Unloaded,
    Loading,
    Playing,
    Paused,
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Identifies one load of the media output.
///
/// Every `play` issues a fresh ticket; media events carrying any other ticket
/// belong to a superseded load and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

impl fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which try of a load this is. A load is retried at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    Retried,
}

/// Where the media output should fetch audio from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaSource {
    /// Absolute or server-relative URL handed out by the backend
    Url(String),
    /// Conventional `/play/{filename}` endpoint
    Endpoint { filename: String },
}

impl MediaSource {
    /// Pre-supplied URL if the song carries one, the play endpoint otherwise
    pub fn for_song(song: &Song) -> Self {
        match &song.url {
            Some(url) => Self::Url(url.clone()),
            None => Self::Endpoint {
                filename: song.filename.clone(),
            },
        }
    }
}

/// Failure classes reported by the media output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaErrorKind {
    /// Load was aborted, usually by replacing the source
    Aborted,
    /// Source format cannot be played
    FormatUnsupported,
    Network,
    Decode,
    Other,
}

impl MediaErrorKind {
    /// Whether a fresh playback URL could fix this failure
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::Aborted | Self::FormatUnsupported)
    }
}

/// Notification from the media output about one load
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Playback actually began
    Started,
    Failed { kind: MediaErrorKind, message: String },
    /// Duration became known
    MetadataLoaded { duration: Duration },
    TimeUpdate { position: Duration },
    Ended,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Back-stack capacity (default: 50)
    pub history_size: usize,

    /// Volume restored after a sleep fade (0-100, default: 80)
    pub default_volume: u8,

    /// Length of the sleep timer fade-out (default: 3s)
    pub fade_duration: Duration,

    pub shuffle: bool,
    pub repeat: bool,

    /// Fixed RNG seed for shuffle, for reproducible runs
    pub shuffle_seed: Option<u64>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            default_volume: 80,
            fade_duration: Duration::from_secs(3),
            shuffle: false,
            repeat: false,
            shuffle_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_source_prefers_song_url() {
        let song = Song::new("a b.mp3", "A", "X").with_url("https://cdn/a?sig=1");
        assert_eq!(
            MediaSource::for_song(&song),
            MediaSource::Url("https://cdn/a?sig=1".into())
        );

        let bare = Song::new("a b.mp3", "A", "X");
        assert_eq!(
            MediaSource::for_song(&bare),
            MediaSource::Endpoint {
                filename: "a b.mp3".into()
            }
        );
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(MediaErrorKind::Network.is_retryable());
        assert!(MediaErrorKind::Decode.is_retryable());
        assert!(MediaErrorKind::Other.is_retryable());
        assert!(!MediaErrorKind::Aborted.is_retryable());
        assert!(!MediaErrorKind::FormatUnsupported.is_retryable());
    }
}

//! Read-only projections for presentation
//!
//! Derived on demand from the session; nothing here mutates state.

use crate::output::MediaOutput;
use crate::session::PlayerSession;
use crate::types::PlaybackState;
use leakify_core::{Song, SongRecord};
use leakify_storage::KeyValueStore;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Snapshot of the now-playing bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowPlaying {
    pub song: Option<Song>,
    pub index: Option<usize>,
    pub state: PlaybackState,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub volume: u8,
    pub shuffle: bool,
    pub repeat: bool,
    pub liked: bool,
    pub sleep_remaining: Option<Duration>,
}

/// Tracks queued after the current one
#[derive(Debug, Clone, PartialEq)]
pub struct Upcoming<'a> {
    pub songs: Vec<&'a Song>,
    /// Shuffle is on, so the real order will differ from this listing
    pub shuffled: bool,
}

impl<M: MediaOutput, S: KeyValueStore> PlayerSession<M, S> {
    pub fn now_playing(&self, now: Instant) -> NowPlaying {
        let song = self.controller.current_song().cloned();
        let liked = song
            .as_ref()
            .is_some_and(|s| self.preferences.is_liked(s.id()));

        NowPlaying {
            index: song
                .as_ref()
                .and_then(|s| self.catalog.position_of(s.id())),
            song,
            state: self.controller.state(),
            position: self.controller.position(),
            duration: self.controller.duration(),
            volume: self.controller.volume(),
            shuffle: self.navigator.is_shuffle(),
            repeat: self.navigator.is_repeat(),
            liked,
            sleep_remaining: self.controller.sleep_remaining(now),
        }
    }

    /// Up to `limit` songs following the current one in view order,
    /// wrapping around and never listing the current song itself
    pub fn upcoming(&self, limit: usize) -> Upcoming<'_> {
        let len = self.catalog.view_len();
        let current = self.navigator.current().filter(|&i| i < len);

        let (start, available) = match current {
            Some(cur) => (cur + 1, len - 1),
            None => (0, len),
        };

        let songs = (0..available.min(limit))
            .filter_map(|offset| self.catalog.song_at((start + offset) % len))
            .collect();

        Upcoming {
            songs,
            shuffled: self.navigator.is_shuffle(),
        }
    }

    /// Recently played, newest first
    pub fn recently_played(&self) -> Vec<&SongRecord> {
        self.preferences.recent().collect()
    }

    /// Liked songs present in the catalog, in catalog order
    pub fn liked_songs(&self) -> Vec<&Song> {
        self.catalog
            .songs()
            .iter()
            .filter(|song| self.preferences.is_liked(song.id()))
            .collect()
    }
}

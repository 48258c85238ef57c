//! Liked songs and the recently-played list
//!
//! Both collections are written through to the key-value store on every
//! change. The in-memory state only changes once the write succeeded, so a
//! failed write never leaves memory and storage disagreeing.

use crate::error::Result;
use crate::kv::KeyValueStore;
use chrono::{DateTime, Utc};
use leakify_core::{Song, SongRecord};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, VecDeque};

/// Storage key of the liked identifiers (JSON array of strings)
pub const LIKES_KEY: &str = "likes";

/// Storage key of the recently-played records (JSON array, newest first)
pub const RECENT_KEY: &str = "recent";

/// Maximum number of recently-played entries kept
pub const RECENT_CAPACITY: usize = 30;

#[derive(Debug)]
pub struct PreferenceStore<S: KeyValueStore> {
    store: S,
    liked: BTreeSet<String>,
    recent: VecDeque<SongRecord>,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Load preferences from `store`.
    ///
    /// Values that fail to parse are logged and treated as empty; only a
    /// failing backend is an error.
    pub fn load(store: S) -> Result<Self> {
        let liked: BTreeSet<String> = read_or_default(&store, LIKES_KEY)?;
        let mut recent: VecDeque<SongRecord> = read_or_default(&store, RECENT_KEY)?;
        recent.truncate(RECENT_CAPACITY);

        tracing::debug!(
            liked = liked.len(),
            recent = recent.len(),
            "Loaded preferences"
        );

        Ok(Self {
            store,
            liked,
            recent,
        })
    }

    /// Flip membership of `id` in the liked set and return the new state
    pub fn toggle_like(&mut self, id: &str) -> Result<bool> {
        let mut liked = self.liked.clone();
        let now_liked = if liked.remove(id) {
            false
        } else {
            liked.insert(id.to_string());
            true
        };

        self.store.set(LIKES_KEY, serde_json::to_string(&liked)?)?;
        self.liked = liked;

        tracing::debug!(id, liked = now_liked, "Toggled like");
        Ok(now_liked)
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.liked.contains(id)
    }

    /// Liked identifiers, sorted
    pub fn liked(&self) -> impl Iterator<Item = &str> + '_ {
        self.liked.iter().map(String::as_str)
    }

    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    pub fn clear_likes(&mut self) -> Result<()> {
        self.store.remove(LIKES_KEY)?;
        self.liked.clear();
        Ok(())
    }

    /// Record a successful playback start of `song`
    pub fn record_play(&mut self, song: &Song) -> Result<()> {
        self.record_play_at(song, Utc::now())
    }

    /// Move-or-insert `song` at the front of the recent list
    pub fn record_play_at(&mut self, song: &Song, played_at: DateTime<Utc>) -> Result<()> {
        let mut recent = self.recent.clone();
        recent.retain(|record| record.filename != song.filename);
        recent.push_front(SongRecord::from_song(song, played_at));
        recent.truncate(RECENT_CAPACITY);

        self.store.set(RECENT_KEY, serde_json::to_string(&recent)?)?;
        self.recent = recent;

        tracing::trace!(id = song.id(), "Recorded play");
        Ok(())
    }

    /// Recently played, newest first
    pub fn recent(&self) -> impl Iterator<Item = &SongRecord> + '_ {
        self.recent.iter()
    }

    pub fn recent_len(&self) -> usize {
        self.recent.len()
    }

    pub fn clear_recent(&mut self) -> Result<()> {
        self.store.remove(RECENT_KEY)?;
        self.recent.clear();
        Ok(())
    }

    /// Access the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn read_or_default<S, T>(store: &S, key: &str) -> Result<T>
where
    S: KeyValueStore,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring unreadable preference value");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::TimeZone;

    fn create_test_song(n: usize) -> Song {
        Song::new(format!("song{n}.mp3"), format!("Song {n}"), "Artist")
    }

    fn store() -> PreferenceStore<MemoryStore> {
        PreferenceStore::load(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_toggle_like_is_its_own_inverse() {
        let mut prefs = store();

        assert!(prefs.toggle_like("a.mp3").unwrap());
        assert!(prefs.is_liked("a.mp3"));

        assert!(!prefs.toggle_like("a.mp3").unwrap());
        assert!(!prefs.is_liked("a.mp3"));
        assert_eq!(prefs.liked_count(), 0);
    }

    #[test]
    fn test_toggle_like_persists_immediately() {
        let mut prefs = store();
        prefs.toggle_like("b.mp3").unwrap();
        prefs.toggle_like("a.mp3").unwrap();

        let raw = prefs.store().get(LIKES_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"["a.mp3","b.mp3"]"#);
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let mut prefs = store();
        prefs.toggle_like("a.mp3").unwrap();
        prefs.store_mut().set_read_only(true);

        assert!(prefs.toggle_like("a.mp3").is_err());
        assert!(prefs.is_liked("a.mp3"));

        assert!(prefs.record_play(&create_test_song(1)).is_err());
        assert_eq!(prefs.recent_len(), 0);
    }

    #[test]
    fn test_record_play_moves_to_front() {
        let mut prefs = store();
        for n in 0..3 {
            prefs.record_play(&create_test_song(n)).unwrap();
        }
        prefs.record_play(&create_test_song(0)).unwrap();

        let order: Vec<_> = prefs.recent().map(|r| r.filename.as_str()).collect();
        assert_eq!(order, vec!["song0.mp3", "song2.mp3", "song1.mp3"]);
    }

    #[test]
    fn test_record_play_caps_at_capacity() {
        let mut prefs = store();
        for n in 0..(RECENT_CAPACITY + 10) {
            prefs.record_play(&create_test_song(n)).unwrap();
        }

        assert_eq!(prefs.recent_len(), RECENT_CAPACITY);
        let newest = prefs.recent().next().unwrap();
        assert_eq!(newest.filename, format!("song{}.mp3", RECENT_CAPACITY + 9));
    }

    #[test]
    fn test_load_restores_persisted_state() {
        let mut prefs = store();
        let at = Utc.timestamp_millis_opt(1_000).unwrap();
        prefs.record_play_at(&create_test_song(7), at).unwrap();
        prefs.toggle_like("song7.mp3").unwrap();

        let reloaded = PreferenceStore::load(prefs.store().clone()).unwrap();
        assert!(reloaded.is_liked("song7.mp3"));
        let record = reloaded.recent().next().unwrap();
        assert_eq!(record.display, "Song 7");
        assert_eq!(record.played_at, at);
    }

    #[test]
    fn test_corrupt_values_load_as_empty() {
        let mut raw = MemoryStore::new();
        raw.insert_raw(LIKES_KEY, "{not an array");
        raw.insert_raw(RECENT_KEY, "42");

        let prefs = PreferenceStore::load(raw).unwrap();
        assert_eq!(prefs.liked_count(), 0);
        assert_eq!(prefs.recent_len(), 0);
    }

    #[test]
    fn test_clear_operations() {
        let mut prefs = store();
        prefs.toggle_like("a.mp3").unwrap();
        prefs.record_play(&create_test_song(1)).unwrap();

        prefs.clear_recent().unwrap();
        prefs.clear_likes().unwrap();

        assert_eq!(prefs.recent_len(), 0);
        assert_eq!(prefs.liked_count(), 0);
        assert_eq!(prefs.store().get(RECENT_KEY).unwrap(), None);
    }
}

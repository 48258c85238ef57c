//! Song catalog and the filtered view derived from it
//!
//! The catalog owns the full song list as fetched from the backend. The
//! filtered view is stored as indices into that list, so it is always a
//! subsequence in catalog order. A reload replaces the list wholesale; a
//! failed reload drops it.

use crate::types::Song;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which part of the library is in scope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    /// Exact artist name
    Artist(String),
    /// Category label, compared case-insensitively
    Tag(String),
}

/// Scope plus free-text search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub scope: Scope,
    pub search: String,
}

impl FilterSpec {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn artist(name: impl Into<String>) -> Self {
        Self {
            scope: Scope::Artist(name.into()),
            search: String::new(),
        }
    }

    pub fn tag(label: impl Into<String>) -> Self {
        Self {
            scope: Scope::Tag(label.into()),
            search: String::new(),
        }
    }

    #[must_use]
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    /// Whether `song` passes both predicates
    pub fn matches(&self, song: &Song) -> bool {
        let in_scope = match &self.scope {
            Scope::All => true,
            Scope::Artist(artist) => song.artist == *artist,
            Scope::Tag(tag) => song
                .tag
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
        };
        if !in_scope {
            return false;
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        [
            Some(song.title.as_str()),
            Some(song.artist.as_str()),
            song.tag.as_deref(),
            song.subfolder.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Indices of the songs matching `filter`, in catalog order.
pub fn filter_indices(songs: &[Song], filter: &FilterSpec) -> Vec<usize> {
    songs
        .iter()
        .enumerate()
        .filter(|(_, song)| filter.matches(song))
        .map(|(idx, _)| idx)
        .collect()
}

/// What the library panel should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LibraryStatus {
    NotLoaded,
    LoadFailed { reason: String },
    /// Catalog is loaded but the filter matched nothing
    NoMatches,
    Ready { visible: usize, total: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    songs: Vec<Song>,
    filter: FilterSpec,
    view: Vec<usize>,
    loaded: bool,
    load_error: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot, keeping the active filter
    pub fn replace(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.loaded = true;
        self.load_error = None;
        self.recompute();
    }

    /// Drop the snapshot after a failed load
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.songs.clear();
        self.view.clear();
        self.loaded = false;
        self.load_error = Some(reason.into());
    }

    pub fn apply_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.view = filter_indices(&self.songs, &self.filter);
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Catalog indices of the filtered view
    pub fn view_indices(&self) -> &[usize] {
        &self.view
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn view(&self) -> impl Iterator<Item = &Song> + '_ {
        self.view.iter().filter_map(|&idx| self.songs.get(idx))
    }

    /// Song at position `index` of the filtered view
    pub fn song_at(&self, index: usize) -> Option<&Song> {
        self.view.get(index).and_then(|&idx| self.songs.get(idx))
    }

    /// Position of a song in the filtered view
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.view().position(|song| song.id() == id)
    }

    /// Look a song up in the full snapshot, ignoring the filter
    pub fn find(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id() == id)
    }

    /// Sorted distinct artist names, for the artist chips
    pub fn artists(&self) -> Vec<String> {
        self.songs
            .iter()
            .filter(|song| !song.artist.is_empty())
            .map(|song| song.artist.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted distinct category labels
    pub fn tags(&self) -> Vec<String> {
        self.songs
            .iter()
            .filter_map(|song| song.tag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn status(&self) -> LibraryStatus {
        if let Some(reason) = &self.load_error {
            return LibraryStatus::LoadFailed {
                reason: reason.clone(),
            };
        }
        if !self.loaded {
            return LibraryStatus::NotLoaded;
        }
        if self.view.is_empty() {
            return LibraryStatus::NoMatches;
        }
        LibraryStatus::Ready {
            visible: self.view.len(),
            total: self.songs.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Song> {
        vec![
            Song::new("a.mp3", "Alpha", "X").with_tag("LEAKED"),
            Song::new("b.mp3", "Bravo", "Y"),
            Song::new("c.mp3", "Charlie", "X").with_subfolder("Sessions"),
            Song::new("d.mp3", "Delta Remaster", "Z").with_tag("REMASTER"),
        ]
    }

    fn titles(catalog: &Catalog) -> Vec<&str> {
        catalog.view().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_artist_filter_preserves_order() {
        let mut catalog = Catalog::new();
        catalog.replace(sample());
        catalog.apply_filter(FilterSpec::artist("X"));

        assert_eq!(titles(&catalog), vec!["Alpha", "Charlie"]);
        assert_eq!(catalog.view_indices(), &[0, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let songs = sample();

        let by_title = filter_indices(&songs, &FilterSpec::all().with_search("  bRaVo "));
        assert_eq!(by_title, vec![1]);

        let by_tag = filter_indices(&songs, &FilterSpec::all().with_search("leaked"));
        assert_eq!(by_tag, vec![0]);

        let by_subfolder = filter_indices(&songs, &FilterSpec::all().with_search("session"));
        assert_eq!(by_subfolder, vec![2]);

        let by_artist = filter_indices(&songs, &FilterSpec::all().with_search("z"));
        assert_eq!(by_artist, vec![3]);
    }

    #[test]
    fn test_tag_scope_ignores_case() {
        let songs = sample();
        assert_eq!(filter_indices(&songs, &FilterSpec::tag("remaster")), vec![3]);
    }

    #[test]
    fn test_scope_and_search_combine() {
        let songs = sample();
        let filter = FilterSpec::artist("X").with_search("char");
        assert_eq!(filter_indices(&songs, &filter), vec![2]);
    }

    #[test]
    fn test_apply_filter_idempotent() {
        let mut catalog = Catalog::new();
        catalog.replace(sample());

        let filter = FilterSpec::all().with_search("a");
        catalog.apply_filter(filter.clone());
        let first = catalog.view_indices().to_vec();
        catalog.apply_filter(filter);
        assert_eq!(catalog.view_indices(), first.as_slice());
    }

    #[test]
    fn test_status_transitions() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.status(), LibraryStatus::NotLoaded);

        catalog.replace(sample());
        assert_eq!(
            catalog.status(),
            LibraryStatus::Ready {
                visible: 4,
                total: 4
            }
        );

        catalog.apply_filter(FilterSpec::all().with_search("nothing matches this"));
        assert_eq!(catalog.status(), LibraryStatus::NoMatches);

        catalog.mark_failed("connection refused");
        assert!(catalog.songs().is_empty());
        assert_eq!(catalog.view_len(), 0);
        assert!(matches!(catalog.status(), LibraryStatus::LoadFailed { .. }));
    }

    #[test]
    fn test_replace_keeps_filter_and_never_merges() {
        let mut catalog = Catalog::new();
        catalog.replace(sample());
        catalog.apply_filter(FilterSpec::artist("X"));

        catalog.replace(vec![Song::new("e.mp3", "Echo", "X")]);
        assert_eq!(catalog.songs().len(), 1);
        assert_eq!(titles(&catalog), vec!["Echo"]);
    }

    #[test]
    fn test_artists_and_tags_sorted_distinct() {
        let mut catalog = Catalog::new();
        catalog.replace(sample());

        assert_eq!(catalog.artists(), vec!["X", "Y", "Z"]);
        assert_eq!(catalog.tags(), vec!["LEAKED", "REMASTER"]);
    }

    #[test]
    fn test_lookup_helpers() {
        let mut catalog = Catalog::new();
        catalog.replace(sample());
        catalog.apply_filter(FilterSpec::artist("X"));

        assert_eq!(catalog.position_of("c.mp3"), Some(1));
        assert_eq!(catalog.position_of("b.mp3"), None);
        assert!(catalog.find("b.mp3").is_some());
        assert_eq!(catalog.song_at(1).map(|s| s.id()), Some("c.mp3"));
        assert!(catalog.song_at(2).is_none());
    }
}

//! Track navigation
//!
//! Owns the current view index, the back-stack and the shuffle/repeat flags,
//! and decides which index plays next. It knows nothing about songs: callers
//! pass the current length of the filtered view into every operation.

use crate::history::History;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What to do when the current track finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEndAction {
    /// Repeat is on: play the same track again from zero
    Restart,
    /// Play the view index that was just selected
    Advance(usize),
    /// View is empty
    Stop,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: Option<usize>,
    history: History,
    shuffle: bool,
    repeat: bool,
    rng: StdRng,
}

impl Navigator {
    pub fn new(history_size: usize) -> Self {
        Self::with_rng(history_size, StdRng::from_entropy())
    }

    /// Navigator with a deterministic shuffle sequence
    pub fn with_seed(history_size: usize, seed: u64) -> Self {
        Self::with_rng(history_size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(history_size: usize, rng: StdRng) -> Self {
        Self {
            current: None,
            history: History::new(history_size),
            shuffle: false,
            repeat: false,
            rng,
        }
    }

    /// Currently selected view index
    ///
    /// Not re-validated when the view changes; treat it as a hint until the
    /// next selection.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Select `index`, optionally remembering the previous track.
    ///
    /// Out-of-range indices are ignored. Re-selecting the current track never
    /// pushes it onto the back-stack.
    pub fn select_track(&mut self, index: usize, len: usize, record_history: bool) -> Option<usize> {
        if index >= len {
            tracing::debug!(index, len, "Ignoring out-of-range selection");
            return None;
        }

        if record_history {
            if let Some(previous) = self.current.filter(|&cur| cur != index) {
                self.history.push(previous);
            }
        }

        self.current = Some(index);
        Some(index)
    }

    /// Advance to the next track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let index = if self.shuffle {
            self.rng.gen_range(0..len)
        } else {
            match self.current {
                Some(cur) => (cur + 1) % len,
                None => 0,
            }
        };

        self.select_track(index, len, true)
    }

    /// Go back.
    ///
    /// Pops the back-stack first, without pushing the track being left. Entries
    /// that no longer fit the view are skipped. With an empty back-stack this
    /// falls back to a random pick (shuffle) or the circular previous index.
    pub fn previous(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        while let Some(index) = self.history.pop() {
            if index < len {
                return self.select_track(index, len, false);
            }
            tracing::trace!(index, len, "Skipping stale history entry");
        }

        let index = if self.shuffle {
            self.rng.gen_range(0..len)
        } else {
            match self.current {
                Some(cur) => (cur % len + len - 1) % len,
                None => len - 1,
            }
        };

        self.select_track(index, len, false)
    }

    /// Decide what follows the end of the current track
    pub fn on_track_end(&mut self, len: usize) -> TrackEndAction {
        if self.repeat && self.current.is_some_and(|cur| cur < len) {
            return TrackEndAction::Restart;
        }
        match self.next(len) {
            Some(index) => TrackEndAction::Advance(index),
            None => TrackEndAction::Stop,
        }
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn toggle_repeat(&mut self) -> bool {
        self.repeat = !self.repeat;
        self.repeat
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    /// Back-stack contents, oldest first
    pub fn history(&self) -> impl Iterator<Item = usize> + '_ {
        self.history.entries()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drop the back-stack, e.g. after the library was reloaded
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(50)
    }
}

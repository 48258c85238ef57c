//! Playback history tracking
//!
//! Bounded back-stack of view indices for "previous" navigation

use std::collections::VecDeque;

/// Back-stack with bounded size
///
/// Oldest entries are discarded once the capacity is reached.
#[derive(Debug, Clone)]
pub struct History {
    /// Visited indices (most recent = back)
    entries: VecDeque<usize>,

    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Add an index to history
    ///
    /// If history is full, the oldest entry is discarded
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.entries.len() >= self.max_size {
            self.entries.pop_front();
        }
        self.entries.push_back(index);
    }

    /// Most recent entry (without removing)
    pub fn peek(&self) -> Option<usize> {
        self.entries.back().copied()
    }

    /// Pop most recent entry
    pub fn pop(&mut self) -> Option<usize> {
        self.entries.pop_back()
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Trail-based backtracking for the candidate search.
//!
//! The trail records every candidate removed from the live set. Each open
//! search level owns a segment of the trail starting at its checkpoint;
//! rewinding a level hands that segment's ids back newest first, which is
//! exactly the order the dancing-links relink needs to restore the set.

/// The trail of removed candidate ids.
///
/// # Memory Model
///
/// - DYNAMIC: owned by one SearchContext, sized from the candidate domain
/// - A candidate is removed at most once while its removal is live, so the
///   trail never holds more than `domain_size` entries
#[derive(Debug, Default)]
pub struct Trail {
    /// Removed candidate ids, oldest first
    entries: Vec<u32>,
    /// Start of each open level's segment
    checkpoints: Vec<usize>,
}

impl Trail {
    /// Create an empty trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a trail for a search over `domain_size` candidates and `depth` levels.
    pub fn with_capacity(domain_size: usize, depth: usize) -> Self {
        Self {
            entries: Vec::with_capacity(domain_size),
            checkpoints: Vec::with_capacity(depth + 1),
        }
    }

    /// Open a new level.
    ///
    /// Returns the checkpoint index.
    pub fn checkpoint(&mut self) -> usize {
        let checkpoint = self.entries.len();
        self.checkpoints.push(checkpoint);
        checkpoint
    }

    /// Record the removal of `id` in the current level.
    pub fn record(&mut self, id: u32) {
        debug_assert!(!self.checkpoints.is_empty(), "record outside any level");
        self.entries.push(id);
    }

    /// Close the current level, handing each recorded id to `undo`, newest first.
    ///
    /// Returns false if no level was open.
    pub fn rewind(&mut self, mut undo: impl FnMut(u32)) -> bool {
        let Some(checkpoint) = self.checkpoints.pop() else {
            return false;
        };
        while self.entries.len() > checkpoint {
            if let Some(id) = self.entries.pop() {
                undo(id);
            }
        }
        true
    }

    /// Entries recorded in the current level, oldest first.
    pub fn entries_since_checkpoint(&self) -> &[u32] {
        let start = self.checkpoints.last().copied().unwrap_or(0);
        &self.entries[start..]
    }

    /// Drop all entries and levels.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.checkpoints.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the number of open levels.
    pub fn checkpoint_depth(&self) -> usize {
        self.checkpoints.len()
    }
}

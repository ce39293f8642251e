// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search context combining MEMO and DYNAMIC state.
//!
//! - Tier 1 (MEMO): [`MemoizedData`], the point set and triangle table,
//!   immutable and borrowed by the adjacency rules
//! - Tier 2 (DYNAMIC): [`SearchContext`], the scratch memory of one search
//!   (candidate links, trail, chosen sequence, counters)
//!
//! Keeping the tiers apart lets several searches share one MEMO instance.

pub mod dynamic;
pub mod memoized;

pub use dynamic::DynamicState;
pub use memoized::MemoizedData;

use crate::state::Statistics;
use crate::trail::Trail;

/// Scratch memory of one search.
///
/// # Memory Model
///
/// ```text
/// SearchContext {
///     trail: Trail,              // Tier 2: removed candidates, per level
///     state: DynamicState,       // Tier 2: live candidates, chosen values
///     statistics: Statistics,    // counters for the current search
/// }
/// ```
///
/// Everything is sized from the candidate domain and the sequence length
/// when the context is created and dropped with it.
///
/// # Trail Safety
///
/// Candidates must only be removed through [`SearchContext::remove_candidate`]
/// and restored through [`SearchContext::close_level`], so that the trail
/// and the candidate links never disagree.
#[derive(Debug)]
pub struct SearchContext {
    /// Trail for O(1) backtracking (Tier 2)
    pub trail: Trail,
    /// Mutable search state (Tier 2)
    pub state: DynamicState,
    pub statistics: Statistics,
}

impl SearchContext {
    pub fn new(domain_size: usize, max_len: usize) -> Self {
        Self {
            trail: Trail::with_capacity(domain_size, max_len),
            state: DynamicState::new(domain_size, max_len),
            statistics: Statistics::new(),
        }
    }

    /// Restore the full candidate set and clear all levels.
    ///
    /// Counters are kept; they accumulate across searches on one context.
    pub fn reset(&mut self) {
        self.trail.clear();
        self.state.reset();
    }

    /// Open a new search level.
    pub fn open_level(&mut self) {
        self.trail.checkpoint();
    }

    /// Remove a live candidate in the current level (trail-tracked).
    pub fn remove_candidate(&mut self, id: u32) {
        self.state.candidates.unlink(id);
        self.trail.record(id);
    }

    /// Close the current level, relinking everything it removed.
    ///
    /// Returns false if no level was open.
    pub fn close_level(&mut self) -> bool {
        let candidates = &mut self.state.candidates;
        self.trail.rewind(|id| candidates.relink(id))
    }

    /// Number of open levels.
    pub fn level_count(&self) -> usize {
        self.trail.checkpoint_depth()
    }
}

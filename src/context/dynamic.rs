// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Mutable search state (Tier 2: DYNAMIC).

use crate::propagation::CandidateSet;

/// Mutable search state (Tier 2: DYNAMIC).
///
/// Changes during search; every candidate removal is recorded on the trail.
/// The chosen sequence is not trailed: the backtracker pops it directly.
#[derive(Debug, Clone)]
pub struct DynamicState {
    /// Candidates still compatible with every chosen value.
    pub candidates: CandidateSet,

    /// Values chosen so far, strictly ascending.
    pub chosen: Vec<u32>,
}

impl DynamicState {
    pub fn new(domain_size: usize, max_len: usize) -> Self {
        Self {
            candidates: CandidateSet::new(domain_size),
            chosen: Vec::with_capacity(max_len),
        }
    }

    pub fn reset(&mut self) {
        self.candidates.reset();
        self.chosen.clear();
    }
}

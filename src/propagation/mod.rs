// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constraint propagation for the sequence search.
//!
//! When a value is chosen, every live candidate that the adjacency rule
//! rejects against it is removed for the rest of that branch. Removals go on
//! the trail of the level just opened, so backtracking out of the level puts
//! them back in their original positions.
//!
//! Only the newest value needs checking: candidates incompatible with earlier
//! values were removed when those values were chosen.

pub mod candidates;

pub use candidates::CandidateSet;

use crate::context::SearchContext;
use crate::engine::PairRule;

/// Remove every live candidate incompatible with `chosen` (trail-tracked).
///
/// Returns the number of candidates removed.
pub fn prune_incompatible<R: PairRule + ?Sized>(
    ctx: &mut SearchContext,
    rule: &R,
    chosen: u32,
) -> usize {
    let mut removed = 0;
    let mut cursor = ctx.state.candidates.head();
    while let Some(candidate) = cursor {
        cursor = ctx.state.candidates.after(candidate);
        if !rule.compatible(chosen, candidate) {
            ctx.remove_candidate(candidate);
            removed += 1;
        }
    }
    removed
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use thrackle_search::combinatorics::SubsetIndex;
use thrackle_search::context::MemoizedData;
use thrackle_search::engine::PairRule;
use thrackle_search::geometry::PointSet;

/// Triangles of `n` points in convex position, with the rank table materialized.
pub fn convex_memo(n: usize) -> MemoizedData {
    MemoizedData::new(PointSet::convex(n).unwrap(), true, true)
}

/// Every ascending `k`-subset of the rule's domain whose pairs all satisfy
/// the rule, found by checking all `C(domain, k)` subsets.
pub fn brute_force<R: PairRule>(rule: &R, k: usize) -> Vec<Vec<u32>> {
    SubsetIndex::new(rule.domain_size(), k)
        .iter()
        .filter(|seq| {
            seq.iter()
                .enumerate()
                .all(|(i, &a)| seq[i + 1..].iter().all(|&b| rule.compatible(a, b)))
        })
        .collect()
}

/// Push events `(value, level)` describing the preorder walk of the
/// ascending-prefix tree of `sequences`.
pub fn prefix_events(sequences: &[Vec<u32>]) -> Vec<(u32, usize)> {
    let mut events = Vec::new();
    let mut previous: &[u32] = &[];
    for seq in sequences {
        let shared = previous
            .iter()
            .zip(seq.iter())
            .take_while(|(a, b)| a == b)
            .count();
        for (level, &value) in seq.iter().enumerate().skip(shared) {
            events.push((value, level));
        }
        previous = seq;
    }
    events
}

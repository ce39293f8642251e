// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the backtracker against brute force and known counts.

mod common;

use strum::IntoEnumIterator;

use thrackle_search::engine::{AcceptAll, Backtracker, FnRule, PairRule};
use thrackle_search::geometry::{is_edge_disjoint_set, is_thrackle, Triangle};
use thrackle_search::predicates::TriangleRule;
use thrackle_search::propagation::CandidateSet;
use thrackle_search::state::Counters;
use thrackle_search::store::SequenceStore;
use thrackle_search::{binomial, SearchConfig, StoreMode, Trail};

use common::{brute_force, convex_memo};

fn all_sequences<R: PairRule>(rule: R, k: usize) -> Vec<Vec<u32>> {
    let domain = rule.domain_size();
    let mut search = Backtracker::new(domain, k, rule).unwrap();
    let mut found = Vec::new();
    let summary = search.for_each_sequence(|seq| found.push(seq.to_vec()));
    assert!(summary.exhausted);
    assert_eq!(summary.sequences(), found.len() as u64);
    found
}

#[test]
fn test_every_rule_matches_brute_force() {
    for n in 5..=7 {
        let memo = convex_memo(n);
        for variant in TriangleRule::iter() {
            let rule = variant.over(&memo);
            for k in 1..=3 {
                let expected = brute_force(&rule, k);
                let found = all_sequences(rule, k);
                assert_eq!(found, expected, "n={} k={} rule={}", n, k, variant);
            }
        }
    }
}

#[test]
fn test_known_counts_in_convex_position() {
    let cases: &[(usize, TriangleRule, [u64; 5])] = &[
        (5, TriangleRule::Thrackle, [10, 15, 0, 0, 0]),
        (6, TriangleRule::Thrackle, [20, 97, 120, 30, 0]),
        (6, TriangleRule::EdgeDisjoint, [20, 100, 120, 30, 0]),
        (7, TriangleRule::Thrackle, [35, 364, 1386, 1932, 924]),
        (7, TriangleRule::EdgeDisjoint, [35, 385, 1575, 2310, 1050]),
    ];
    for &(n, variant, counts) in cases {
        let memo = convex_memo(n);
        for (i, &expected) in counts.iter().enumerate() {
            let k = i + 1;
            let mut search = Backtracker::new(memo.triangle_count(), k, variant.over(&memo)).unwrap();
            let summary = search.for_each_sequence(|_| {});
            assert_eq!(summary.sequences(), expected, "n={} k={} rule={}", n, k, variant);
        }
    }
}

#[test]
fn test_results_recheck_independently() {
    let memo = convex_memo(7);
    let triangles = |seq: &[u32]| -> Vec<Triangle> { seq.iter().map(|&r| memo.triangle(r)).collect() };

    let thrackles = all_sequences(TriangleRule::Thrackle.over(&memo), 4);
    assert!(!thrackles.is_empty());
    for seq in &thrackles {
        assert!(is_thrackle(&triangles(seq), &memo.points), "{:?}", seq);
    }

    let disjoint = all_sequences(TriangleRule::EdgeDisjoint.over(&memo), 4);
    for seq in &disjoint {
        assert!(is_edge_disjoint_set(&triangles(seq)));
    }
    assert!(disjoint.len() > thrackles.len());
}

#[test]
fn test_accept_all_is_the_subset_index() {
    for n in 1..=8 {
        for k in 1..=n {
            let found = all_sequences(AcceptAll { domain_size: n }, k);
            assert_eq!(found.len() as u64, binomial(n, k));
            assert!(found.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_custom_rule() {
    // Values at least 3 apart.
    let rule = FnRule::new("spread", 10, |a: u32, b: u32| a.abs_diff(b) >= 3);
    let found = all_sequences(&rule, 3);
    assert_eq!(found, brute_force(&rule, 3));
    assert_eq!(found[0], vec![0, 3, 6]);
    assert_eq!(found.len(), 20);
}

#[test]
fn test_first_sequence_is_lexicographically_smallest() {
    let memo = convex_memo(7);
    let rule = TriangleRule::Thrackle.over(&memo);
    let all = brute_force(&rule, 4);
    let mut search = Backtracker::new(memo.triangle_count(), 4, rule).unwrap();
    assert_eq!(search.search_first(), all.first().cloned());
    assert_eq!(search.statistics().get(Counters::SequencesFound), 1);
}

#[test]
fn test_store_sees_every_node() {
    let memo = convex_memo(6);
    let rule = TriangleRule::Thrackle.over(&memo);
    let mut search = Backtracker::new(memo.triangle_count(), 3, rule).unwrap();
    let mut store = SequenceStore::dry_run(3).with_sequence_len(3);
    let summary = search.search_all(&mut store).unwrap();
    let stats = store.finish().unwrap().statistics;
    assert_eq!(stats.nodes, summary.nodes());
    assert_eq!(stats.accepted, 120);
    assert_eq!(stats.nodes_per_level[1], 20);
    assert_eq!(stats.nodes_per_level[3], 120);
}

#[test]
fn test_config_modes_agree() {
    let flat = SearchConfig::new(6, 3).run().unwrap();
    let tree = SearchConfig::new(6, 3)
        .with_mode(StoreMode::Tree)
        .with_sequence_len(3)
        .run()
        .unwrap();
    assert_eq!(flat.report.statistics.accepted, 120);
    assert_eq!(tree.report.statistics.accepted, 120);
    let root = tree.report.output.tree().unwrap();
    let from_tree = root.sequences(3, thrackle_search::store::PrintMode::Exact);
    let from_flat: Vec<Vec<u32>> = flat
        .report
        .output
        .sequences()
        .unwrap()
        .map(|s| s.to_vec())
        .collect();
    assert_eq!(from_tree, from_flat);
}

#[test]
fn test_trail_replay_restores_order() {
    let mut candidates = CandidateSet::new(12);
    let mut trail = Trail::with_capacity(12, 3);
    let original: Vec<u32> = candidates.iter().collect();

    trail.checkpoint();
    for id in [5, 0, 11, 7] {
        candidates.unlink(id);
        trail.record(id);
    }
    trail.checkpoint();
    for id in [6, 1] {
        candidates.unlink(id);
        trail.record(id);
    }
    assert_eq!(candidates.iter().collect::<Vec<_>>(), vec![2, 3, 4, 8, 9, 10]);

    assert!(trail.rewind(|id| candidates.relink(id)));
    assert_eq!(candidates.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 6, 8, 9, 10]);
    assert!(trail.rewind(|id| candidates.relink(id)));
    assert_eq!(candidates.iter().collect::<Vec<_>>(), original);
    assert!(!trail.rewind(|id| candidates.relink(id)));
}

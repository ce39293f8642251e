// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Sequence store: the sink for a search's push events.
//!
//! A search reports every node it visits as `push(value, level)`, where
//! `level` is the node's depth below the root (the first value is level 0).
//! A push may go at most one level deeper than the current path. A push at
//! or above the current depth means the current path ended, so it is closed
//! as a leaf sequence first.
//!
//! The store is built in one of three modes:
//!
//! - **Flat**: accepted leaf sequences become fixed-length records
//!   ([`FlatDestination`]). Complete sequences may also be pushed directly
//!   with [`SequenceStore::push_sequence`].
//! - **Tree**: the whole search tree is materialized as [`BacktrackNode`]s.
//! - **DryRun**: only the statistics a tree would have are kept.
//!
//! All modes share the counters in [`StoreStatistics`], the optional
//! exact-length filter, the optional cap on accepted sequences and the
//! per-sequence callback.

pub mod dry_run;
pub mod file;
pub mod flat;
pub mod tree;

pub use file::{read_sequence_file, FileHeader, SequenceFile, SequenceWriter, FIXED_LEN, TIMING};
pub use flat::{format_sequence, FlatDestination};
pub use tree::{BacktrackNode, PrintMode};

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SearchError};
use dry_run::ChildCounts;
use flat::FlatSink;
use tree::TreeBuilder;

/// Callback run for every accepted sequence. The slice is only valid for the call.
pub type SequenceCallback<'cb> = Box<dyn FnMut(&[u32]) + 'cb>;

#[derive(Debug)]
enum Backend {
    Flat(FlatSink),
    Tree(TreeBuilder),
    DryRun,
}

impl Backend {
    fn mode_name(&self) -> &'static str {
        match self {
            Backend::Flat(_) => "flat",
            Backend::Tree(_) => "tree",
            Backend::DryRun => "dry-run",
        }
    }
}

/// What a finished store produced.
#[derive(Debug)]
pub enum StoreOutput {
    /// Sequences went to stdout.
    Printed,
    /// Sequences kept in memory, `record_len` values each.
    Sequences { record_len: usize, values: Vec<u32> },
    /// Sequences written to a file.
    File { path: PathBuf, header: FileHeader },
    /// The materialized search tree.
    Tree(BacktrackNode),
    /// Nothing but statistics.
    DryRun,
}

impl StoreOutput {
    /// In-memory sequences, if any.
    pub fn sequences(&self) -> Option<impl Iterator<Item = &[u32]> + '_> {
        match self {
            StoreOutput::Sequences { record_len, values } => Some(values.chunks((*record_len).max(1))),
            _ => None,
        }
    }

    pub fn tree(&self) -> Option<&BacktrackNode> {
        match self {
            StoreOutput::Tree(root) => Some(root),
            _ => None,
        }
    }

    pub fn into_tree(self) -> Option<BacktrackNode> {
        match self {
            StoreOutput::Tree(root) => Some(root),
            _ => None,
        }
    }
}

/// Summary of everything pushed into a store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreStatistics {
    /// Deepest level reached, excluding the root.
    pub levels: usize,
    /// Nodes pushed, excluding the root.
    pub nodes: u64,
    /// Node count per depth, the root at depth 0.
    pub nodes_per_level: Vec<u64>,
    /// Leaves closed, accepted or not.
    pub sequences: u64,
    /// Leaves that passed the length filter and the cap.
    pub accepted: u64,
    /// Leaf count per depth.
    pub leaves_per_level: Vec<u64>,
    /// Bytes the materialized tree occupies (or would occupy).
    pub tree_bytes: u64,
    pub max_children: u32,
    pub time_ms: Option<f32>,
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[u64]) -> fmt::Result {
    for (i, count) in counts.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", count)?;
    }
    writeln!(f)
}

impl fmt::Display for StoreStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Levels: {} + root", self.levels)?;
        writeln!(f, "Nodes: {} + root", self.nodes)?;
        write!(f, "Nodes per level: ")?;
        write_counts(f, &self.nodes_per_level)?;
        writeln!(f, "Sequences (leaves): {}", self.sequences)?;
        write!(f, "Sequences per level: ")?;
        write_counts(f, &self.leaves_per_level)?;
        writeln!(f, "Tree size: {} bytes", self.tree_bytes)?;
        writeln!(f, "Max children: {}", self.max_children)?;
        if let Some(time) = self.time_ms {
            writeln!(f, "Time: {:.6} ms", time)?;
        }
        Ok(())
    }
}

/// Output and statistics of a finished store.
#[derive(Debug)]
pub struct StoreReport {
    pub output: StoreOutput,
    pub statistics: StoreStatistics,
}

/// Sink for the push events of one search.
pub struct SequenceStore<'cb> {
    backend: Backend,
    /// Values along the current path, root excluded.
    path: Vec<u32>,
    /// A node was opened since the last leaf was closed.
    leaf_open: bool,
    max_depth: usize,
    sequence_len: Option<usize>,
    max_sequences: Option<u64>,
    record_len: Option<usize>,
    callback: Option<SequenceCallback<'cb>>,

    next_id: u64,
    levels: usize,
    nodes_per_level: Vec<u64>,
    leaves_per_level: Vec<u64>,
    sequences: u64,
    accepted: u64,
    child_counts: ChildCounts,

    started: Option<Instant>,
    time_ms: Option<f32>,
}

impl fmt::Debug for SequenceStore<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceStore")
            .field("mode", &self.backend.mode_name())
            .field("depth", &self.path.len())
            .field("sequences", &self.sequences)
            .field("accepted", &self.accepted)
            .finish()
    }
}

impl<'cb> SequenceStore<'cb> {
    fn with_backend(backend: Backend, max_depth: usize) -> Self {
        Self {
            backend,
            path: Vec::new(),
            leaf_open: false,
            max_depth,
            sequence_len: None,
            max_sequences: None,
            record_len: None,
            callback: None,
            next_id: 1,
            levels: 0,
            nodes_per_level: vec![1],
            leaves_per_level: vec![0],
            sequences: 0,
            accepted: 0,
            child_counts: ChildCounts::new(max_depth),
            started: None,
            time_ms: None,
        }
    }

    /// Store accepted sequences as flat records.
    pub fn flat(destination: FlatDestination) -> Result<Self> {
        Ok(Self::with_backend(
            Backend::Flat(FlatSink::open(destination)?),
            usize::MAX,
        ))
    }

    /// Materialize the search tree, at most `max_depth` levels below the root.
    pub fn tree(max_depth: usize) -> Self {
        Self::with_backend(Backend::Tree(TreeBuilder::new(max_depth)), max_depth)
    }

    /// Collect tree statistics only, at most `max_depth` levels below the root.
    pub fn dry_run(max_depth: usize) -> Self {
        Self::with_backend(Backend::DryRun, max_depth)
    }

    /// Accept only sequences of exactly `len` values; flat records have this length.
    pub fn with_sequence_len(mut self, len: usize) -> Self {
        self.sequence_len = Some(len);
        self.record_len = Some(len);
        self
    }

    /// Stop accepting after `max` sequences.
    pub fn with_max_sequences(mut self, max: u64) -> Self {
        self.max_sequences = Some(max);
        self
    }

    /// Call `callback` with every accepted sequence.
    pub fn with_callback(mut self, callback: impl FnMut(&[u32]) + 'cb) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Whether the cap on accepted sequences is reached.
    pub fn is_finished(&self) -> bool {
        self.max_sequences
            .is_some_and(|max| self.accepted >= max)
    }

    /// Current path length.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn timing_begin(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn timing_end(&mut self) {
        match self.started {
            Some(start) => self.time_ms = Some(start.elapsed().as_secs_f32() * 1000.0),
            None => warn!("timing_end called without timing_begin; ignored"),
        }
    }

    /// Report a node with `value` at `level` below the root.
    pub fn push(&mut self, value: u32, level: usize) -> Result<()> {
        if self.is_finished() {
            return Ok(());
        }
        let depth = self.path.len();
        if level > depth {
            return Err(SearchError::LevelSkip { level, depth });
        }
        if level < depth {
            self.close_leaf()?;
            if self.is_finished() {
                return Ok(());
            }
        }
        while self.path.len() > level {
            self.close_node();
        }
        self.open_node(value, level)
    }

    /// Add a complete sequence directly (flat mode only).
    pub fn push_sequence(&mut self, seq: &[u32]) -> Result<()> {
        if !matches!(self.backend, Backend::Flat(_)) {
            return Err(SearchError::ModeMismatch(self.backend.mode_name()));
        }
        if self.is_finished() {
            return Ok(());
        }
        self.check_record_len(seq.len())?;
        self.sequences += 1;
        self.accept(seq)
    }

    /// Close the current path and everything still open, and hand back the result.
    pub fn finish(mut self) -> Result<StoreReport> {
        self.close_leaf()?;
        while !self.path.is_empty() {
            self.close_node();
        }
        self.child_counts.close_all();
        if self.started.is_some() && self.time_ms.is_none() {
            self.timing_end();
        }

        let nodes = self.next_id;
        let statistics = StoreStatistics {
            levels: self.levels,
            nodes: nodes - 1,
            nodes_per_level: self.nodes_per_level,
            sequences: self.sequences,
            accepted: self.accepted,
            leaves_per_level: self.leaves_per_level,
            tree_bytes: BacktrackNode::footprint(nodes),
            max_children: self.child_counts.max_children(),
            time_ms: self.time_ms,
        };

        let output = match self.backend {
            Backend::Flat(sink) => sink.finish(self.record_len, self.time_ms)?,
            Backend::Tree(builder) => StoreOutput::Tree(builder.finish()),
            Backend::DryRun => StoreOutput::DryRun,
        };
        debug!(
            nodes = statistics.nodes,
            sequences = statistics.sequences,
            accepted = statistics.accepted,
            "sequence store finished"
        );
        Ok(StoreReport { output, statistics })
    }

    fn open_node(&mut self, value: u32, level: usize) -> Result<()> {
        if level >= self.max_depth {
            return Err(SearchError::DepthExceeded {
                depth: level + 1,
                max: self.max_depth,
            });
        }
        let id = self.next_id;
        if let Backend::Tree(builder) = &mut self.backend {
            builder.open(id, value)?;
        }
        self.next_id += 1;
        self.path.push(value);
        self.child_counts.open();
        self.leaf_open = true;

        let depth = level + 1;
        self.levels = self.levels.max(depth);
        if self.nodes_per_level.len() <= depth {
            self.nodes_per_level.resize(depth + 1, 0);
            self.leaves_per_level.resize(depth + 1, 0);
        }
        self.nodes_per_level[depth] += 1;
        Ok(())
    }

    fn close_node(&mut self) {
        if let Backend::Tree(builder) = &mut self.backend {
            builder.close();
        }
        self.child_counts.close();
        self.path.pop();
    }

    /// Count the current path as a leaf, and accept it if it qualifies.
    fn close_leaf(&mut self) -> Result<()> {
        if !self.leaf_open {
            return Ok(());
        }
        self.leaf_open = false;
        let len = self.path.len();
        self.sequences += 1;
        self.leaves_per_level[len] += 1;

        if self.is_finished() || self.sequence_len.is_some_and(|want| want != len) {
            return Ok(());
        }
        if matches!(self.backend, Backend::Flat(_)) {
            self.check_record_len(len)?;
        }
        let path = std::mem::take(&mut self.path);
        let result = self.accept(&path);
        self.path = path;
        result
    }

    fn check_record_len(&mut self, len: usize) -> Result<()> {
        match self.record_len {
            Some(expected) if expected != len => Err(SearchError::RecordLength {
                expected,
                actual: len,
            }),
            Some(_) => Ok(()),
            None => {
                self.record_len = Some(len);
                Ok(())
            }
        }
    }

    fn accept(&mut self, seq: &[u32]) -> Result<()> {
        self.accepted += 1;
        if let Some(callback) = self.callback.as_mut() {
            callback(seq);
        }
        if let Backend::Flat(sink) = &mut self.backend {
            sink.write(seq)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Push events of the tree R -> {1 -> {2, 3}, 4 -> 5}.
    fn feed(store: &mut SequenceStore<'_>) {
        for &(value, level) in &[(1, 0), (2, 1), (3, 1), (4, 0), (5, 1)] {
            store.push(value, level).unwrap();
        }
    }

    #[test]
    fn test_tree_mode() {
        let mut store = SequenceStore::tree(4);
        feed(&mut store);
        let report = store.finish().unwrap();
        let stats = &report.statistics;
        assert_eq!(stats.levels, 2);
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.nodes_per_level, vec![1, 2, 3]);
        assert_eq!(stats.sequences, 3);
        assert_eq!(stats.leaves_per_level, vec![0, 0, 3]);
        assert_eq!(stats.max_children, 2);

        let root = report.output.tree().unwrap();
        assert_eq!(root.node_count(), 6);
        assert_eq!(root.heap_size(), stats.tree_bytes);
        assert_eq!(
            root.sequences(2, PrintMode::Exact),
            vec![vec![1, 2], vec![1, 3], vec![4, 5]]
        );
    }

    #[test]
    fn test_dry_run_matches_tree() {
        let mut tree = SequenceStore::tree(4);
        let mut dry = SequenceStore::dry_run(4);
        feed(&mut tree);
        feed(&mut dry);
        let tree = tree.finish().unwrap();
        let dry = dry.finish().unwrap();
        assert_eq!(tree.statistics, dry.statistics);
        assert!(matches!(dry.output, StoreOutput::DryRun));
    }

    #[test]
    fn test_short_leaves_are_counted_but_filtered() {
        let mut seen = Vec::new();
        let mut store = SequenceStore::flat(FlatDestination::Growable)
            .unwrap()
            .with_sequence_len(2)
            .with_callback(|seq| seen.push(seq.to_vec()));
        // 1 is a dead end at depth 1; 2 -> 3 is complete.
        store.push(1, 0).unwrap();
        store.push(2, 0).unwrap();
        store.push(3, 1).unwrap();
        let report = store.finish().unwrap();
        assert_eq!(report.statistics.sequences, 2);
        assert_eq!(report.statistics.accepted, 1);
        assert_eq!(report.statistics.leaves_per_level, vec![0, 1, 1]);
        let kept: Vec<&[u32]> = report.output.sequences().unwrap().collect();
        assert_eq!(kept, vec![&[2, 3][..]]);
        assert_eq!(seen, vec![vec![2, 3]]);
    }

    #[test]
    fn test_cap_stops_accepting() {
        let mut store = SequenceStore::tree(3).with_max_sequences(2);
        store.push(1, 0).unwrap();
        store.push(2, 1).unwrap();
        assert!(!store.is_finished());
        store.push(3, 1).unwrap();
        assert!(!store.is_finished());
        // Closing [1, 3] reaches the cap; 4 is never opened.
        store.push(4, 0).unwrap();
        assert!(store.is_finished());
        store.push(5, 1).unwrap();

        let report = store.finish().unwrap();
        assert_eq!(report.statistics.accepted, 2);
        assert_eq!(report.statistics.nodes, 3);
        let root = report.output.into_tree().unwrap();
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn test_level_skip() {
        let mut store = SequenceStore::dry_run(4);
        store.push(1, 0).unwrap();
        let err = store.push(2, 2).unwrap_err();
        assert!(matches!(err, SearchError::LevelSkip { level: 2, depth: 1 }));
    }

    #[test]
    fn test_depth_exceeded() {
        let mut store = SequenceStore::tree(1);
        store.push(1, 0).unwrap();
        let err = store.push(2, 1).unwrap_err();
        assert!(matches!(err, SearchError::DepthExceeded { depth: 2, max: 1 }));
    }

    #[test]
    fn test_push_sequence_flat_only() {
        let mut tree = SequenceStore::tree(2);
        assert!(matches!(
            tree.push_sequence(&[1, 2]),
            Err(SearchError::ModeMismatch("tree"))
        ));

        let mut flat = SequenceStore::flat(FlatDestination::Growable).unwrap();
        flat.push_sequence(&[1, 2]).unwrap();
        flat.push_sequence(&[3, 4]).unwrap();
        assert!(matches!(
            flat.push_sequence(&[5]),
            Err(SearchError::RecordLength {
                expected: 2,
                actual: 1
            })
        ));
        let report = flat.finish().unwrap();
        assert_eq!(report.statistics.accepted, 2);
        let kept: Vec<&[u32]> = report.output.sequences().unwrap().collect();
        assert_eq!(kept, vec![&[1, 2][..], &[3, 4][..]]);
    }

    #[test]
    fn test_timing_and_display() {
        let mut store = SequenceStore::dry_run(2);
        store.timing_begin();
        feed(&mut store);
        store.timing_end();
        let stats = store.finish().unwrap().statistics;
        assert!(stats.time_ms.is_some());
        let text = stats.to_string();
        assert!(text.starts_with("Levels: 2 + root\nNodes: 5 + root\nNodes per level: 1 2 3\n"));
        assert!(text.contains("Sequences (leaves): 3\n"));
        assert!(text.contains("Max children: 2\n"));
        assert!(text.contains("Time: "));
    }

    #[test]
    fn test_statistics_serialize() {
        let mut store = SequenceStore::dry_run(2);
        feed(&mut store);
        let stats = store.finish().unwrap().statistics;
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"nodes\":5"));
        let back: StoreStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_empty_store() {
        let report = SequenceStore::tree(3).finish().unwrap();
        assert_eq!(report.statistics.nodes, 0);
        assert_eq!(report.statistics.sequences, 0);
        assert_eq!(report.statistics.nodes_per_level, vec![1]);
        assert_eq!(report.output.tree().unwrap().node_count(), 1);
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search configuration and the one-call search driver.
//!
//! A [`SearchConfig`] names the point count `n`, the sequence length `k`, the
//! adjacency rule and where results go. [`SearchConfig::run`] builds the
//! memoized triangle data, the backtracker and the store, and runs one
//! search to exhaustion or to the configured cap.

use std::time::Instant;

use strum_macros::{Display, EnumIter, EnumString};
use tracing::info;

use crate::context::MemoizedData;
use crate::engine::{Backtracker, SearchSummary};
use crate::error::{Result, SearchError};
use crate::geometry::{PointSet, Triangle};
use crate::store::{FlatDestination, SequenceStore, StoreReport};

pub use crate::predicates::TriangleRule as SearchVariant;

/// How a search keeps its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum StoreMode {
    /// Accepted sequences as flat records.
    #[default]
    Flat,
    /// The whole search tree.
    Tree,
    /// Tree statistics only.
    DryRun,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Points in convex position.
    pub n: usize,
    /// Triangles per sequence.
    pub k: usize,
    pub variant: SearchVariant,
    pub mode: StoreMode,
    /// Used in flat mode.
    pub destination: FlatDestination,
    pub max_sequences: Option<u64>,
    /// Accept only sequences of this length. Flat mode defaults to `k`.
    pub sequence_len: Option<usize>,
    /// Materialize the triangle rank table.
    pub precompute: bool,
    pub binomial_cache: bool,
}

impl SearchConfig {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            variant: SearchVariant::default(),
            mode: StoreMode::default(),
            destination: FlatDestination::Growable,
            max_sequences: None,
            sequence_len: None,
            precompute: true,
            binomial_cache: true,
        }
    }

    pub fn with_variant(mut self, variant: SearchVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_mode(mut self, mode: StoreMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_destination(mut self, destination: FlatDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_max_sequences(mut self, max: u64) -> Self {
        self.max_sequences = Some(max);
        self
    }

    pub fn with_sequence_len(mut self, len: usize) -> Self {
        self.sequence_len = Some(len);
        self
    }

    pub fn with_precompute(mut self, precompute: bool) -> Self {
        self.precompute = precompute;
        self
    }

    pub fn with_binomial_cache(mut self, enabled: bool) -> Self {
        self.binomial_cache = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n < 3 {
            return Err(SearchError::InvalidConfig(format!(
                "need at least 3 points, got {}",
                self.n
            )));
        }
        if self.k == 0 {
            return Err(SearchError::InvalidConfig(
                "sequence length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Length filter the store applies.
    pub fn effective_sequence_len(&self) -> Option<usize> {
        match (self.sequence_len, self.mode) {
            (Some(len), _) => Some(len),
            (None, StoreMode::Flat) => Some(self.k),
            (None, _) => None,
        }
    }

    /// Triangles of `n` points in convex position.
    pub fn memoize(&self) -> Result<MemoizedData> {
        let points = PointSet::convex(self.n)?;
        Ok(MemoizedData::new(
            points,
            self.precompute,
            self.binomial_cache,
        ))
    }

    /// An empty store for this configuration.
    pub fn store<'cb>(&self) -> Result<SequenceStore<'cb>> {
        let mut store = match self.mode {
            StoreMode::Flat => SequenceStore::flat(self.destination.clone())?,
            StoreMode::Tree => SequenceStore::tree(self.k),
            StoreMode::DryRun => SequenceStore::dry_run(self.k),
        };
        if let Some(len) = self.effective_sequence_len() {
            store = store.with_sequence_len(len);
        }
        if let Some(max) = self.max_sequences {
            store = store.with_max_sequences(max);
        }
        Ok(store)
    }

    /// Run the search, streaming every node into a fresh store.
    pub fn run(&self) -> Result<SearchOutcome> {
        self.validate()?;
        let memo = self.memoize()?;
        let store = self.store()?;
        self.run_with(&memo, store)
    }

    /// Run the search over `memo` into a caller-built store.
    pub fn run_with(&self, memo: &MemoizedData, mut store: SequenceStore<'_>) -> Result<SearchOutcome> {
        self.validate()?;
        let rule = self.variant.over(memo);
        let mut search = Backtracker::new(memo.triangle_count(), self.k, rule)?;

        store.timing_begin();
        let summary = search.search_all(&mut store)?;
        store.timing_end();
        let report = store.finish()?;

        info!(
            n = self.n,
            k = self.k,
            variant = %self.variant,
            mode = %self.mode,
            sequences = summary.sequences(),
            accepted = report.statistics.accepted,
            exhausted = summary.exhausted,
            "search complete"
        );
        Ok(SearchOutcome { summary, report })
    }

    /// The lexicographically first sequence, as triangles.
    pub fn first(&self) -> Result<Option<Vec<Triangle>>> {
        self.validate()?;
        let memo = self.memoize()?;
        let rule = self.variant.over(&memo);
        let mut search = Backtracker::new(memo.triangle_count(), self.k, rule)?;
        let start = Instant::now();
        let found = search.search_first();
        info!(
            n = self.n,
            k = self.k,
            variant = %self.variant,
            found = found.is_some(),
            elapsed_ms = start.elapsed().as_secs_f32() * 1000.0,
            "first search complete"
        );
        Ok(found.map(|ranks| ranks.iter().map(|&r| memo.triangle(r)).collect()))
    }
}

/// Result of [`SearchConfig::run`].
#[derive(Debug)]
pub struct SearchOutcome {
    pub summary: SearchSummary,
    pub report: StoreReport,
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Constraint-propagating backtracking search.
//!
//! The backtracker enumerates strictly ascending sequences of `k` candidate
//! ids in which every pair satisfies a [`PairRule`]. It is an explicit loop
//! over the search depth with three phases:
//!
//! 1. **Advance**: take the smallest live candidate, remove it on the current
//!    level, append it to the chosen sequence and report the push. A complete
//!    sequence is reported and dropped again, staying at the same depth so the
//!    next sibling is tried; otherwise a new level is opened.
//! 2. **ComputeCandidates**: remove every live candidate the rule rejects
//!    against the newest value, recording each removal on the new level.
//! 3. **Backtrack**: rewind the current level. At depth 0 the search is
//!    exhausted; otherwise the newest value is popped (it stays removed on the
//!    parent level, so it is never chosen there again) and Advance resumes.
//!
//! Because a level only ever removes candidates, and rewinding relinks them in
//! reverse, the live set is always ascending and each subset is found once.
//!
//! # Example
//!
//! ```
//! use thrackle_search::engine::{AcceptAll, Backtracker};
//!
//! let mut search = Backtracker::new(5, 2, AcceptAll { domain_size: 5 }).unwrap();
//! let mut found = Vec::new();
//! search.for_each_sequence(|seq| found.push(seq.to_vec()));
//! assert_eq!(found.len(), 10);
//! assert_eq!(found[0], vec![0, 1]);
//! assert_eq!(found[9], vec![3, 4]);
//! ```

pub mod predicate;

pub use predicate::{AcceptAll, FnRule, PairRule};

use std::convert::Infallible;

use tracing::{debug, warn};

use crate::context::SearchContext;
use crate::error::{Result, SearchError};
use crate::propagation::prune_incompatible;
use crate::state::{Counters, Statistics};
use crate::store::SequenceStore;

/// Phase of the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ComputeCandidates,
    Advance,
    Backtrack,
}

/// What the search loop reports to its driver.
enum Event<'s> {
    Push { value: u32, level: usize },
    Sequence(&'s [u32]),
}

enum Flow {
    Continue,
    Stop,
}

/// Outcome of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub statistics: Statistics,
    /// False when the driver stopped the search early.
    pub exhausted: bool,
}

impl SearchSummary {
    pub fn sequences(&self) -> u64 {
        self.statistics.get(Counters::SequencesFound)
    }

    pub fn nodes(&self) -> u64 {
        self.statistics.get(Counters::NodesPushed)
    }
}

/// Backtracking search over `k`-sequences of a candidate domain.
#[derive(Debug)]
pub struct Backtracker<R> {
    rule: R,
    k: usize,
    ctx: SearchContext,
}

impl<R: PairRule> Backtracker<R> {
    /// Create a search for sequences of length `k` over `0..domain_size`.
    ///
    /// The rule must be defined over the same domain. A `k` larger than the
    /// domain is accepted and simply finds nothing.
    pub fn new(domain_size: usize, k: usize, rule: R) -> Result<Self> {
        if k == 0 {
            return Err(SearchError::InvalidConfig(
                "sequence length must be at least 1".to_string(),
            ));
        }
        if rule.domain_size() != domain_size {
            warn!(
                rule = rule.name(),
                expected = rule.domain_size(),
                actual = domain_size,
                "rule and candidate domain disagree"
            );
            return Err(SearchError::DomainMismatch {
                rule: rule.name().to_string(),
                expected: rule.domain_size(),
                actual: domain_size,
            });
        }
        Ok(Self {
            rule,
            k,
            ctx: SearchContext::new(domain_size, k),
        })
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn sequence_len(&self) -> usize {
        self.k
    }

    /// Counters of the most recent search.
    pub fn statistics(&self) -> &Statistics {
        &self.ctx.statistics
    }

    /// The first sequence in lexicographic order, if any.
    pub fn search_first(&mut self) -> Option<Vec<u32>> {
        let mut found = None;
        self.run_infallible(|event| match event {
            Event::Sequence(seq) => {
                found = Some(seq.to_vec());
                Flow::Stop
            }
            Event::Push { .. } => Flow::Continue,
        });
        found
    }

    /// Call `f` with every sequence, in lexicographic order.
    pub fn for_each_sequence<F>(&mut self, mut f: F) -> SearchSummary
    where
        F: FnMut(&[u32]),
    {
        let exhausted = self.run_infallible(|event| {
            if let Event::Sequence(seq) = event {
                f(seq);
            }
            Flow::Continue
        });
        self.summary(exhausted)
    }

    /// Stream every pushed node into `store`.
    ///
    /// Stops as soon as the store reports that its cap is reached. The store
    /// is not finished here; the caller decides when to call `finish`.
    pub fn search_all(&mut self, store: &mut SequenceStore<'_>) -> Result<SearchSummary> {
        let exhausted = self.run::<SearchError, _>(|event| {
            if let Event::Push { value, level } = event {
                store.push(value, level)?;
                if store.is_finished() {
                    return Ok(Flow::Stop);
                }
            }
            Ok(Flow::Continue)
        })?;
        Ok(self.summary(exhausted))
    }

    fn summary(&self, exhausted: bool) -> SearchSummary {
        let summary = SearchSummary {
            statistics: self.ctx.statistics.clone(),
            exhausted,
        };
        debug!(
            rule = self.rule.name(),
            k = self.k,
            exhausted,
            statistics = %summary.statistics,
            "search finished"
        );
        summary
    }

    fn run_infallible<F>(&mut self, mut on_event: F) -> bool
    where
        F: FnMut(Event<'_>) -> Flow,
    {
        match self.run(|event| Ok::<_, Infallible>(on_event(event))) {
            Ok(exhausted) => exhausted,
            Err(never) => match never {},
        }
    }

    /// The search loop. Returns true when the space was exhausted.
    fn run<E, F>(&mut self, mut on_event: F) -> std::result::Result<bool, E>
    where
        F: FnMut(Event<'_>) -> std::result::Result<Flow, E>,
    {
        let ctx = &mut self.ctx;
        ctx.reset();
        ctx.statistics = Statistics::new();
        ctx.open_level();
        let mut phase = Phase::Advance;

        loop {
            match phase {
                Phase::Advance => {
                    let Some(value) = ctx.state.candidates.head() else {
                        phase = Phase::Backtrack;
                        continue;
                    };
                    ctx.remove_candidate(value);
                    ctx.state.chosen.push(value);
                    ctx.statistics.increment(Counters::NodesPushed);

                    let level = ctx.state.chosen.len() - 1;
                    if let Flow::Stop = on_event(Event::Push { value, level })? {
                        return Ok(false);
                    }

                    if ctx.state.chosen.len() == self.k {
                        ctx.statistics.increment(Counters::SequencesFound);
                        let flow = on_event(Event::Sequence(&ctx.state.chosen))?;
                        ctx.state.chosen.pop();
                        if let Flow::Stop = flow {
                            return Ok(false);
                        }
                    } else {
                        ctx.open_level();
                        phase = Phase::ComputeCandidates;
                    }
                }
                Phase::ComputeCandidates => {
                    if let Some(&last) = ctx.state.chosen.last() {
                        let removed = prune_incompatible(ctx, &self.rule, last);
                        ctx.statistics
                            .add(Counters::CandidatesPruned, removed as u64);
                    }
                    phase = Phase::Advance;
                }
                Phase::Backtrack => {
                    ctx.close_level();
                    ctx.statistics.increment(Counters::Backtracks);
                    if ctx.state.chosen.pop().is_none() {
                        return Ok(true);
                    }
                    phase = Phase::Advance;
                }
            }
        }
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Pairwise adjacency rules for the backtracker.
//!
//! A rule decides whether a candidate may follow an already chosen value in
//! the same sequence. The backtracker only ever asks about the most recently
//! chosen value: earlier values have already removed their own incompatible
//! candidates, so every pair in a completed sequence has been checked once.
//!
//! # Example
//!
//! ```
//! use thrackle_search::engine::{FnRule, PairRule};
//!
//! // Values that differ by more than one.
//! let rule = FnRule::new("spread", 10, |a, b| a.abs_diff(b) > 1);
//! assert!(rule.compatible(2, 5));
//! assert!(!rule.compatible(2, 3));
//! assert_eq!(rule.name(), "spread");
//! ```

/// Trait for adjacency rules over a fixed candidate domain.
pub trait PairRule {
    /// Whether `candidate` may appear in a sequence that already holds `chosen`.
    fn compatible(&self, chosen: u32, candidate: u32) -> bool;

    /// Size of the universe the rule is defined over.
    fn domain_size(&self) -> usize;

    /// Get the rule name, for logging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<R: PairRule + ?Sized> PairRule for &R {
    fn compatible(&self, chosen: u32, candidate: u32) -> bool {
        (**self).compatible(chosen, candidate)
    }

    fn domain_size(&self) -> usize {
        (**self).domain_size()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Rule backed by a closure.
pub struct FnRule<F> {
    name: String,
    domain_size: usize,
    compatible: F,
}

impl<F> FnRule<F>
where
    F: Fn(u32, u32) -> bool,
{
    pub fn new(name: impl Into<String>, domain_size: usize, compatible: F) -> Self {
        Self {
            name: name.into(),
            domain_size,
            compatible,
        }
    }
}

impl<F> PairRule for FnRule<F>
where
    F: Fn(u32, u32) -> bool,
{
    fn compatible(&self, chosen: u32, candidate: u32) -> bool {
        (self.compatible)(chosen, candidate)
    }

    fn domain_size(&self) -> usize {
        self.domain_size
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Every pair is compatible, so the search enumerates all `k`-subsets.
#[derive(Debug, Clone, Copy)]
pub struct AcceptAll {
    pub domain_size: usize,
}

impl PairRule for AcceptAll {
    fn compatible(&self, _chosen: u32, _candidate: u32) -> bool {
        true
    }

    fn domain_size(&self) -> usize {
        self.domain_size
    }

    fn name(&self) -> &str {
        "AcceptAll"
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Search for triangle thrackles on point sets in convex position.
//!
//! A thrackle here is a set of triangles on `n` points in which every pair
//! either shares exactly one vertex or shares none and has crossing sides.
//! The search enumerates them as strictly ascending sequences of triangle
//! ranks.
//!
//! # Architecture
//!
//! The implementation uses a two-tier memory model:
//!
//! ## Tier 1: MEMO Data (Immutable)
//!
//! Computed once per point configuration and shared by every search:
//! - The point set and its orientation predicates
//! - The `n`-choose-3 triangle index, optionally materialized
//! - An optional binomial coefficient table
//!
//! ## Tier 2: DYNAMIC Data (Mutable)
//!
//! Scratch state owned by one search and sized when it starts:
//! - Candidate set - live candidates as an ascending linked list
//! - Trail - candidate removals per level, replayed in reverse to backtrack
//! - Chosen sequence and statistics counters
//!
//! # Search Algorithm
//!
//! The [`Backtracker`] is an explicit loop over the search depth with three
//! phases: Advance takes the smallest live candidate, ComputeCandidates
//! removes everything the adjacency rule rejects against it, and Backtrack
//! rewinds a level. Every node it visits is pushed into a
//! [`SequenceStore`], which keeps flat records, the whole search tree, or
//! statistics only. A materialized tree can be laid out for drawing with
//! [`TreeLayout`].
//!
//! # References
//!
//! - Buchheim, C., Jünger, M. and Leipert, S. (2006). "Drawing rooted trees
//!   in linear time." Softw. Pract. Exper. 36, 651-665.

pub mod combinatorics;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod predicates;
pub mod propagation;
pub mod state;
pub mod store;
pub mod trail;

// Re-export commonly used types
pub use combinatorics::{binomial, BinomialCache, SubsetIndex};
pub use config::{SearchConfig, SearchOutcome, SearchVariant, StoreMode};
pub use context::{MemoizedData, SearchContext};
pub use engine::{Backtracker, PairRule, SearchSummary};
pub use error::{Result, SearchError};
pub use layout::{LayoutOptions, TreeLayout, ViewTree};
pub use store::{FlatDestination, SequenceStore, StoreReport, StoreStatistics};
pub use trail::Trail;

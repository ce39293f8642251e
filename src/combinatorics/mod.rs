// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Binomial coefficients and the `k`-subset index.

pub mod binomial;
pub mod index;

pub use binomial::{binomial, BinomialCache};
pub use index::{checked_rank, rank, rank_with, unrank, unrank_with, SubsetIndex, Tuples};

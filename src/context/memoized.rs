// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Immutable precomputed data (Tier 1: MEMO).

use tracing::debug;

use crate::combinatorics::{rank_with, unrank_with, BinomialCache, SubsetIndex};
use crate::geometry::{PointSet, Triangle};

/// Immutable precomputed data (Tier 1: MEMO).
///
/// Computed once per point configuration and never changed during search.
/// Rules borrow it, so any number of searches may share one instance.
///
/// Triangles are the 3-subsets of the point indices, numbered by rank.
/// When the rank table fits in memory it is materialized and lookups are a
/// slice; otherwise every lookup unranks through the binomial cache.
#[derive(Debug, Clone)]
pub struct MemoizedData {
    pub points: PointSet,
    pub binomial: BinomialCache,
    /// `n`-choose-3 index over the point indices
    pub triangles: SubsetIndex,
}

impl MemoizedData {
    pub fn new(points: PointSet, precompute: bool, binomial_cache: bool) -> Self {
        let n = points.len();
        let binomial = if binomial_cache {
            BinomialCache::new(n, 3)
        } else {
            BinomialCache::disabled()
        };
        let mut triangles = SubsetIndex::new(n, 3);
        let precomputed = precompute && triangles.precompute();

        debug!(
            points = n,
            triangles = triangles.size(),
            precomputed,
            cached = binomial.is_enabled(),
            "memoized data ready"
        );

        Self {
            points,
            binomial,
            triangles,
        }
    }

    /// Number of triangles, which is the candidate domain of a search.
    pub fn triangle_count(&self) -> usize {
        self.triangles.size() as usize
    }

    /// Triangle of the given rank.
    pub fn triangle(&self, rank: u32) -> Triangle {
        match self.triangles.tuple_at(rank as u64) {
            Some(tuple) => Triangle::from_tuple(tuple),
            None => Triangle::from_tuple(&unrank_with(
                rank as u64,
                self.points.len(),
                3,
                &self.binomial,
            )),
        }
    }

    /// Rank of a triangle.
    pub fn triangle_rank(&self, triangle: &Triangle) -> u32 {
        let mut vertices = triangle.vertices();
        rank_with(&mut vertices, self.points.len(), &self.binomial) as u32
    }
}

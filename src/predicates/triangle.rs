// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Adjacency rules between triangles of a point configuration.

use strum_macros::{Display, EnumIter, EnumString};

use crate::context::MemoizedData;
use crate::engine::PairRule;

/// Which pairs of triangles may appear together in one sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TriangleRule {
    /// Exactly one shared vertex, or no shared vertex and crossing sides.
    #[default]
    Thrackle,
    /// At most one shared vertex, and some pair of sides intersects.
    CrossingOnly,
    /// At most one shared vertex; no side is shared.
    EdgeDisjoint,
}

impl TriangleRule {
    /// Bind the rule to the triangles of a point configuration.
    pub fn over(self, memo: &MemoizedData) -> TriangleAdjacency<'_> {
        TriangleAdjacency { rule: self, memo }
    }
}

/// A [`TriangleRule`] over the triangles of one [`MemoizedData`].
///
/// Candidate ids are triangle ranks.
#[derive(Debug, Clone, Copy)]
pub struct TriangleAdjacency<'a> {
    rule: TriangleRule,
    memo: &'a MemoizedData,
}

impl TriangleAdjacency<'_> {
    pub fn rule(&self) -> TriangleRule {
        self.rule
    }

    /// Whether every pair in `ranks` satisfies the rule.
    pub fn admits(&self, ranks: &[u32]) -> bool {
        ranks.iter().enumerate().all(|(i, &a)| {
            ranks[i + 1..]
                .iter()
                .all(|&b| self.compatible(a, b))
        })
    }
}

impl PairRule for TriangleAdjacency<'_> {
    fn compatible(&self, chosen: u32, candidate: u32) -> bool {
        let a = self.memo.triangle(chosen);
        let b = self.memo.triangle(candidate);
        let points = &self.memo.points;
        match self.rule {
            TriangleRule::Thrackle => a.thrackles_with(&b, points),
            TriangleRule::CrossingOnly => {
                a.common_vertices(&b) <= 1 && a.has_intersecting_sides(&b, points)
            }
            TriangleRule::EdgeDisjoint => a.common_vertices(&b) <= 1,
        }
    }

    fn domain_size(&self) -> usize {
        self.memo.triangle_count()
    }

    fn name(&self) -> &str {
        match self.rule {
            TriangleRule::Thrackle => "thrackle",
            TriangleRule::CrossingOnly => "crossing-only",
            TriangleRule::EdgeDisjoint => "edge-disjoint",
        }
    }
}

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Triangles over a [`PointSet`], identified by their three vertex indices.

use std::fmt;

use super::point::{segments_intersect, PointSet};

/// Three distinct vertex indices in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triangle([u32; 3]);

impl Triangle {
    /// Build a triangle from any three distinct indices.
    pub fn new(mut vertices: [u32; 3]) -> Self {
        vertices.sort_unstable();
        debug_assert!(vertices[0] < vertices[1] && vertices[1] < vertices[2]);
        Self(vertices)
    }

    /// Triangle from a 3-tuple produced by the subset index.
    pub fn from_tuple(tuple: &[u32]) -> Self {
        Self::new([tuple[0], tuple[1], tuple[2]])
    }

    pub fn vertices(&self) -> [u32; 3] {
        self.0
    }

    /// Number of vertex indices shared with `other`.
    pub fn common_vertices(&self, other: &Triangle) -> usize {
        self.0.iter().filter(|v| other.0.contains(v)).count()
    }

    /// Whether some side of `self` meets some side of `other`.
    pub fn has_intersecting_sides(&self, other: &Triangle, points: &PointSet) -> bool {
        for i in 0..3 {
            let p1 = points.get(self.0[i]);
            let p2 = points.get(self.0[(i + 1) % 3]);
            for j in 0..3 {
                let q1 = points.get(other.0[j]);
                let q2 = points.get(other.0[(j + 1) % 3]);
                if segments_intersect(p1, p2, q1, q2) {
                    return true;
                }
            }
        }
        false
    }

    /// The thrackle condition for one pair: exactly one shared vertex, or
    /// no shared vertex and crossing sides.
    pub fn thrackles_with(&self, other: &Triangle, points: &PointSet) -> bool {
        match self.common_vertices(other) {
            1 => true,
            0 => self.has_intersecting_sides(other, points),
            _ => false,
        }
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.0[0], self.0[1], self.0[2])
    }
}

/// Every pair of triangles in `set` thrackles.
pub fn is_thrackle(set: &[Triangle], points: &PointSet) -> bool {
    set.iter().enumerate().all(|(i, a)| {
        set[i + 1..]
            .iter()
            .all(|b| a.thrackles_with(b, points))
    })
}

/// No two triangles in `set` share a side.
pub fn is_edge_disjoint_set(set: &[Triangle]) -> bool {
    set.iter()
        .enumerate()
        .all(|(i, a)| set[i + 1..].iter().all(|b| a.common_vertices(b) < 2))
}

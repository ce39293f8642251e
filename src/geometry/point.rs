// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integer points and the orientation predicates built on them.

use std::fmt;

use crate::error::{Result, SearchError};

/// A point with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Twice the signed area of triangle `abc`; positive when `c` is left of `a -> b`.
pub fn area2(a: Point, b: Point, c: Point) -> i64 {
    (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
}

/// Strict left turn.
pub fn left(a: Point, b: Point, c: Point) -> bool {
    area2(a, b, c) > 0
}

/// Orientation test for segments `p1 p2` and `q1 q2`.
///
/// Each segment must separate the endpoints of the other. Collinear and
/// shared-endpoint configurations count as "not left", so callers that care
/// about touching segments must check shared vertices themselves.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    (!left(p1, p2, q1) ^ !left(p1, p2, q2)) && (!left(q1, q2, p1) ^ !left(q1, q2, p2))
}

/// An ordered set of points, addressed by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// `n` points in convex position on a circle of radius 127 centred at (127, 127).
    ///
    /// Coordinates are truncated toward zero, so point `i` (1-based) sits at
    /// `(⌊127(1 + cos iθ)⌋, ⌊127(1 + sin iθ)⌋)` with `θ = 2π / n`.
    pub fn convex(n: usize) -> Result<Self> {
        if n < 3 {
            return Err(SearchError::InvalidConfig(format!(
                "a convex point set needs at least 3 points, got {}",
                n
            )));
        }
        let theta = 2.0 * std::f64::consts::PI / n as f64;
        let points = (1..=n)
            .map(|i| {
                let angle = i as f64 * theta;
                Point::new(
                    (127.0 * (1.0 + angle.cos())) as i64,
                    (127.0 * (1.0 + angle.sin())) as i64,
                )
            })
            .collect();
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn get(&self, index: u32) -> Point {
        self.points[index as usize]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl fmt::Display for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.points {
            writeln!(f, "({},{})", p.x, p.y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation() {
        let a = Point::new(0, 0);
        let b = Point::new(10, 0);
        assert_eq!(area2(a, b, Point::new(0, 10)), 100);
        assert!(left(a, b, Point::new(5, 1)));
        assert!(!left(a, b, Point::new(5, -1)));
        assert!(!left(a, b, Point::new(20, 0)));
    }

    #[test]
    fn test_segments_intersect() {
        let o = Point::new(0, 0);
        let e = Point::new(10, 10);
        assert!(segments_intersect(o, e, Point::new(0, 10), Point::new(10, 0)));
        assert!(!segments_intersect(
            o,
            Point::new(10, 0),
            Point::new(0, 5),
            Point::new(10, 5)
        ));
        assert!(!segments_intersect(
            o,
            Point::new(1, 1),
            Point::new(5, 0),
            Point::new(6, 10)
        ));
    }

    #[test]
    fn test_convex_hexagon_coordinates() {
        let set = PointSet::convex(6).unwrap();
        assert_eq!(
            set.points(),
            &[
                Point::new(190, 236),
                Point::new(63, 236),
                Point::new(0, 127),
                Point::new(63, 17),
                Point::new(190, 17),
                Point::new(254, 126),
            ]
        );
    }

    #[test]
    fn test_convex_position() {
        for n in 3..12 {
            let set = PointSet::convex(n).unwrap();
            assert_eq!(set.len(), n);
            for i in 0..n {
                let a = set.get(i as u32);
                let b = set.get(((i + 1) % n) as u32);
                for j in 0..n {
                    if j != i && j != (i + 1) % n {
                        assert!(left(a, b, set.get(j as u32)), "n={} edge {}", n, i);
                    }
                }
            }
        }
    }

    #[test]
    fn test_convex_too_small() {
        assert!(PointSet::convex(2).is_err());
    }
}

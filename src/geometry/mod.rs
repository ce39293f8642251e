// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Planar primitives for the triangle search.
//!
//! - Point, PointSet: integer coordinates and orientation tests
//! - Triangle: three vertex indices into a PointSet
//! - bounds: known sizes of maximal triangle thrackles

pub mod bounds;
pub mod point;
pub mod triangle;

pub use bounds::{thrackle_size, thrackle_size_lower_bound, thrackle_size_upper_bound, SizeEstimate};
pub use point::{area2, left, segments_intersect, Point, PointSet};
pub use triangle::{is_edge_disjoint_set, is_thrackle, Triangle};

// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Domain adjacency rules.
//!
//! # Organization
//!
//! - `triangle`: thrackle, crossing-only and edge-disjoint rules over the
//!   triangles of a point set
//!
//! Generic rules (`FnRule`, `AcceptAll`) live next to the `PairRule` trait
//! in the engine.

pub mod triangle;

pub use triangle::{TriangleAdjacency, TriangleRule};

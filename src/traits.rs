//! Core seams between the planner's data model and its index.
//!
//! Kept minimal: the k-d tree only needs a fixed-size integer key per item,
//! and never sees rides or vehicles directly.

/// Fixed-size numeric key used to place an item in a `K`-dimensional index.
pub trait SpatialKey<const K: usize> {
    fn spatial_key(&self) -> [i64; K];
}


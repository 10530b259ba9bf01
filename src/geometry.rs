//! Grid geometry.
//!
//! Vehicles move along rows and columns only, so travel time between two
//! intersections is their Manhattan distance.

use serde::{Deserialize, Serialize};

/// An intersection on the city grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: i64,
    pub col: i64,
}

impl Point {
    pub const ORIGIN: Point = Point { row: 0, col: 0 };

    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl From<(i64, i64)> for Point {
    fn from((row, col): (i64, i64)) -> Self {
        Self { row, col }
    }
}

/// Manhattan distance between two intersections, in time steps.
pub fn distance(a: Point, b: Point) -> i64 {
    (a.row - b.row).abs() + (a.col - b.col).abs()
}

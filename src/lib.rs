//! ride-planner
//!
//! Greedy fleet planner for time-windowed grid rides: the vehicle that is
//! free earliest takes the nearest open ride it can still finish in time.

pub mod traits;
pub mod error;
pub mod geometry;
pub mod ride;
pub mod vehicle;
pub mod kdtree;
pub mod index;
pub mod queue;
pub mod solver;
pub mod problem;
pub mod output;
pub mod score;
pub mod runner;

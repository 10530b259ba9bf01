//! Scoring a set of routes against a problem.
//!
//! A ride finished by its latest finish earns its ride time, plus the
//! problem's bonus when it started exactly at its earliest start. Late
//! rides earn nothing but still move the vehicle.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, distance};
use crate::problem::Problem;
use crate::ride::RideId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub distance_points: i64,
    pub bonus_points: i64,
    /// Rides finished in time.
    pub on_time: usize,
    /// Rides started exactly at their earliest start.
    pub bonus_rides: usize,
    /// Rides finished after their latest finish.
    pub late: usize,
}

impl Score {
    pub fn total(&self) -> i64 {
        self.distance_points + self.bonus_points
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    UnknownRide { vehicle: usize, ride: RideId },
    DuplicateRide { vehicle: usize, ride: RideId },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::UnknownRide { vehicle, ride } => {
                write!(f, "vehicle {vehicle} references unknown ride {ride}")
            }
            ScoreError::DuplicateRide { vehicle, ride } => {
                write!(f, "vehicle {vehicle} repeats ride {ride}")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Replays every route from the origin at step 0 and totals the points.
pub fn score<'a, I>(problem: &Problem, routes: I) -> Result<Score, ScoreError>
where
    I: IntoIterator<Item = &'a [RideId]>,
{
    let mut score = Score::default();
    let mut seen = HashSet::new();

    for (vehicle, route) in routes.into_iter().enumerate() {
        let mut position = Point::ORIGIN;
        let mut clock = 0;

        for &ride_id in route {
            let ride = problem
                .rides
                .get(ride_id.index())
                .ok_or(ScoreError::UnknownRide { vehicle, ride: ride_id })?;
            if !seen.insert(ride_id) {
                return Err(ScoreError::DuplicateRide { vehicle, ride: ride_id });
            }

            let begin = (clock + distance(position, ride.start)).max(ride.earliest_start);
            let finish = begin + ride.ride_time();

            if finish <= ride.latest_finish {
                score.on_time += 1;
                score.distance_points += ride.ride_time();
                if begin == ride.earliest_start {
                    score.bonus_rides += 1;
                    score.bonus_points += problem.bonus;
                }
            } else {
                score.late += 1;
            }

            clock = finish;
            position = ride.end;
        }
    }

    Ok(score)
}

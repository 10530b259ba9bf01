//! Test fixtures for ride-planner.
//!
//! Provides:
//! - A builder for small hand-written problems
//! - Seeded random problems for property checks
//! - An invariant checker that replays a planner result

#![allow(dead_code)]

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ride_planner::geometry::{Point, distance};
use ride_planner::output::{render_assignment, validate_output};
use ride_planner::problem::Problem;
use ride_planner::ride::RideRequest;
use ride_planner::solver::PlannerResult;

/// Builder for test problems with sensible defaults.
pub struct ProblemBuilder {
    problem: Problem,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self {
            problem: Problem {
                rows: 100,
                columns: 100,
                vehicles: 1,
                bonus: 0,
                steps: 1_000,
                rides: Vec::new(),
            },
        }
    }

    pub fn vehicles(mut self, vehicles: usize) -> Self {
        self.problem.vehicles = vehicles;
        self
    }

    pub fn steps(mut self, steps: i64) -> Self {
        self.problem.steps = steps;
        self
    }

    pub fn bonus(mut self, bonus: i64) -> Self {
        self.problem.bonus = bonus;
        self
    }

    pub fn ride(mut self, start: (i64, i64), end: (i64, i64), earliest: i64, latest: i64) -> Self {
        self.problem
            .rides
            .push(RideRequest::new(start.into(), end.into(), earliest, latest));
        self
    }

    pub fn build(self) -> Problem {
        self.problem
    }
}

/// A reproducible problem with rides scattered over the grid. Windows range
/// from generous to impossible so every search branch gets exercised.
pub fn random_problem(seed: u64, vehicles: usize, rides: usize, size: i64, steps: i64) -> Problem {
    let mut rng = StdRng::seed_from_u64(seed);
    let rides = (0..rides)
        .map(|_| {
            let start = Point::new(rng.gen_range(0..size), rng.gen_range(0..size));
            let end = Point::new(rng.gen_range(0..size), rng.gen_range(0..size));
            let earliest = rng.gen_range(0..steps);
            let slack = rng.gen_range(-size..3 * size);
            let latest = earliest + distance(start, end) + slack;
            RideRequest::new(start, end, earliest, latest)
        })
        .collect();

    Problem {
        rows: size,
        columns: size,
        vehicles,
        bonus: 10,
        steps,
        rides,
    }
}

/// Replays every route from the origin and asserts the planner's promises:
/// each ride at most once, every ride finished in its window, clocks never
/// go backwards, and the rendered output passes validation.
pub fn assert_plan_invariants(problem: &Problem, result: &PlannerResult) {
    assert_eq!(result.routes.len(), problem.vehicles);

    let mut seen = HashSet::new();
    for (i, route) in result.routes.iter().enumerate() {
        assert_eq!(route.vehicle_id.0, i, "routes must be ordered by vehicle id");

        let mut position = Point::ORIGIN;
        let mut clock = 0;
        for ride_id in &route.ride_ids {
            assert!(seen.insert(*ride_id), "ride {ride_id} assigned twice");
            let ride = &problem.rides[ride_id.index()];

            let begin = (clock + distance(position, ride.start)).max(ride.earliest_start);
            let finish = begin + ride.ride_time();
            assert!(
                finish <= ride.latest_finish,
                "ride {ride_id} finishes at {finish}, after {}",
                ride.latest_finish
            );
            assert!(finish >= clock, "clock went backwards on vehicle {i}");

            clock = finish;
            position = ride.end;
        }
        assert_eq!(route.finish_time, clock);
    }

    for ride_id in &result.unassigned {
        assert!(!seen.contains(ride_id), "ride {ride_id} both assigned and unassigned");
    }
    assert_eq!(seen.len() + result.unassigned.len(), problem.rides.len());

    let text = render_assignment(result);
    let summary = validate_output(&text).expect("rendered assignment must validate");
    assert_eq!(summary.rides, seen.len());
    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let count: usize = fields.next().unwrap().parse().unwrap();
        assert_eq!(count, fields.count());
    }
}

//! Property checks over seeded random problems.

mod fixtures;

use ride_planner::index::IndexKey;
use ride_planner::queue::TieBreak;
use ride_planner::ride::{RideCatalog, RideId};
use ride_planner::score::score;
use ride_planner::solver::{SolveOptions, solve};
use ride_planner::vehicle::{Vehicle, VehicleId};

use fixtures::{assert_plan_invariants, random_problem};

fn option_grid() -> Vec<SolveOptions> {
    let mut grid = Vec::new();
    for index_key in [IndexKey::Plane, IndexKey::SpaceTime] {
        for tie_break in [TieBreak::VehicleId, TieBreak::Jitter { seed: 5 }] {
            for probe_budget in [1, 20] {
                grid.push(SolveOptions {
                    probe_budget,
                    index_key,
                    tie_break,
                });
            }
        }
    }
    grid
}

#[test]
fn invariants_hold_on_random_problems() {
    for seed in 0..6 {
        let problem = random_problem(seed, 1 + seed as usize * 3, 250, 80, 500);
        for options in option_grid() {
            let result = solve(&problem, &options);
            assert_plan_invariants(&problem, &result);
        }
    }
}

#[test]
fn every_assigned_ride_scores() {
    let problem = random_problem(21, 10, 400, 100, 800);
    let result = solve(&problem, &SolveOptions::default());

    let score = score(&problem, result.routes.iter().map(|r| r.ride_ids.as_slice())).unwrap();

    assert_eq!(score.late, 0);
    assert_eq!(score.on_time, result.assigned_count());
    assert!(score.total() > 0);
}

#[test]
fn stats_account_for_every_turn() {
    let problem = random_problem(33, 6, 300, 50, 300);
    let result = solve(&problem, &SolveOptions::default());
    let stats = &result.stats;

    assert_eq!(stats.commits, result.assigned_count());
    // Each vehicle is exhausted exactly once.
    assert_eq!(
        stats.index_empty + stats.beyond_horizon + stats.probe_budget_exceeded,
        problem.vehicles
    );
    assert!(stats.probes >= stats.commits + stats.discarded);
}

#[test]
fn large_instance_finishes() {
    let problem = random_problem(99, 100, 10_000, 1_000, 20_000);
    let result = solve(&problem, &SolveOptions::default());
    assert_plan_invariants(&problem, &result);
    assert!(result.assigned_count() > 0);
}

#[test]
fn feasibility_is_idempotent_on_random_rides() {
    let problem = random_problem(7, 1, 200, 40, 200);
    let catalog = RideCatalog::new(&problem.rides);
    let vehicle = Vehicle::new(VehicleId(0));

    for ride in catalog.iter() {
        let first = ride.can_be_claimed_by(&vehicle);
        assert_eq!(first, ride.can_be_claimed_by(&vehicle));
    }
    assert!(catalog.get(RideId(0)).is_some());
}

//! Greedy nearest-ride planner.
//!
//! The vehicle that is free earliest takes the nearest open ride it can
//! still finish in time. Assignments are never revisited.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::PlannerError;
use crate::index::{IndexKey, RideIndex};
use crate::problem::Problem;
use crate::queue::{SchedulingQueue, TieBreak};
use crate::ride::{RideCatalog, RideId};
use crate::vehicle::{Vehicle, VehicleId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Maximum index candidates examined per vehicle turn.
    pub probe_budget: usize,
    /// Attributes the ride index is keyed on.
    pub index_key: IndexKey,
    /// Ordering among vehicles that are free at the same step.
    pub tie_break: TieBreak,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            probe_budget: 20,
            index_key: IndexKey::Plane,
            tie_break: TieBreak::VehicleId,
        }
    }
}

impl SolveOptions {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.probe_budget == 0 {
            return Err(PlannerError::Config(
                "probe_budget must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Why a vehicle stopped taking rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exhaustion {
    /// No open rides are left in the index.
    IndexEmpty,
    /// The nearest open ride cannot be reached before the horizon.
    BeyondHorizon,
    /// Every candidate within the probe budget was infeasible.
    ProbeBudgetExceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(RideId),
    Exhausted(Exhaustion),
}

/// Result of one vehicle's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Candidates examined.
    pub probes: usize,
    /// Candidates dropped from the index as unusable.
    pub discarded: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    pub commits: usize,
    pub probes: usize,
    pub discarded: usize,
    pub index_empty: usize,
    pub beyond_horizon: usize,
    pub probe_budget_exceeded: usize,
}

impl SolveStats {
    fn record(&mut self, report: &SearchReport) {
        self.probes += report.probes;
        self.discarded += report.discarded;
        match report.outcome {
            SearchOutcome::Found(_) => self.commits += 1,
            SearchOutcome::Exhausted(Exhaustion::IndexEmpty) => self.index_empty += 1,
            SearchOutcome::Exhausted(Exhaustion::BeyondHorizon) => self.beyond_horizon += 1,
            SearchOutcome::Exhausted(Exhaustion::ProbeBudgetExceeded) => {
                self.probe_budget_exceeded += 1
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteResult {
    pub vehicle_id: VehicleId,
    pub ride_ids: Vec<RideId>,
    /// Step at which the last ride is dropped off.
    pub finish_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerResult {
    /// One route per vehicle, ordered by vehicle id.
    pub routes: Vec<RouteResult>,
    /// Rides no vehicle took, in id order.
    pub unassigned: Vec<RideId>,
    pub stats: SolveStats,
}

impl PlannerResult {
    pub fn assigned_count(&self) -> usize {
        self.routes.iter().map(|route| route.ride_ids.len()).sum()
    }
}

/// Runs the planner over `problem` until every vehicle is out of work.
///
/// `options` should pass [`SolveOptions::validate`]. A probe budget of zero
/// is logged and treated as one.
pub fn solve(problem: &Problem, options: &SolveOptions) -> PlannerResult {
    let probe_budget = if options.probe_budget == 0 {
        warn!("probe_budget of 0 would stop every vehicle; using 1");
        1
    } else {
        options.probe_budget
    };

    let mut catalog = RideCatalog::new(&problem.rides);
    let mut index = RideIndex::build(&catalog, options.index_key);

    let mut queue = SchedulingQueue::new(options.tie_break);
    queue.extend((0..problem.vehicles).map(|id| Vehicle::new(VehicleId(id))));

    let mut stats = SolveStats::default();
    let mut exhausted = Vec::with_capacity(problem.vehicles);

    while let Some(mut vehicle) = queue.pop() {
        let report = find_closest_ride(
            &vehicle,
            &catalog,
            &mut index,
            problem.steps,
            probe_budget,
        );
        stats.record(&report);

        match report.outcome {
            SearchOutcome::Found(ride_id) => {
                let ride = &mut catalog[ride_id];
                vehicle.commit(ride);
                trace!(
                    vehicle = %vehicle.id(),
                    ride = %ride,
                    clock = vehicle.clock(),
                    "ride committed"
                );
                queue.push(vehicle);
            }
            SearchOutcome::Exhausted(reason) => {
                trace!(vehicle = %vehicle.id(), ?reason, "vehicle exhausted");
                exhausted.push(vehicle);
            }
        }
    }

    exhausted.sort_by_key(Vehicle::id);
    let routes: Vec<RouteResult> = exhausted
        .into_iter()
        .map(|vehicle| RouteResult {
            vehicle_id: vehicle.id(),
            ride_ids: vehicle.route().to_vec(),
            finish_time: vehicle.clock(),
        })
        .collect();

    let unassigned: Vec<RideId> = catalog
        .iter()
        .filter(|ride| !ride.is_claimed())
        .map(|ride| ride.id())
        .collect();

    info!(
        vehicles = problem.vehicles,
        rides = catalog.len(),
        assigned = catalog.claimed_count(),
        unassigned = unassigned.len(),
        probes = stats.probes,
        budget_exceeded = stats.probe_budget_exceeded,
        "planning finished"
    );

    PlannerResult {
        routes,
        unassigned,
        stats,
    }
}

/// Finds the ride `vehicle` should take next and removes it from `index`.
///
/// Candidates come nearest-first. A candidate the vehicle cannot finish in
/// time is dropped from the index, unless the vehicle cannot even reach it
/// before `num_steps`, in which case the vehicle is done and the candidate
/// stays for others.
pub fn find_closest_ride(
    vehicle: &Vehicle,
    catalog: &RideCatalog,
    index: &mut RideIndex,
    num_steps: i64,
    probe_budget: usize,
) -> SearchReport {
    let mut probes = 0;
    let mut discarded = 0;
    let report = |outcome, probes, discarded| SearchReport {
        outcome,
        probes,
        discarded,
    };

    while probes < probe_budget {
        let Some(ride_id) = index.nearest(vehicle) else {
            return report(SearchOutcome::Exhausted(Exhaustion::IndexEmpty), probes, discarded);
        };
        probes += 1;
        let candidate = &catalog[ride_id];

        if candidate.can_be_claimed_by(vehicle) {
            index.remove(ride_id);
            return report(SearchOutcome::Found(ride_id), probes, discarded);
        }

        if vehicle.time_to_arrival(candidate) > num_steps {
            debug!(
                vehicle = %vehicle.id(),
                ride = %ride_id,
                num_steps,
                "vehicle reached the horizon"
            );
            return report(
                SearchOutcome::Exhausted(Exhaustion::BeyondHorizon),
                probes,
                discarded,
            );
        }

        index.remove(ride_id);
        discarded += 1;
    }

    warn!(
        vehicle = %vehicle.id(),
        probe_budget,
        clock = vehicle.clock(),
        "probe budget exceeded"
    );
    report(
        SearchOutcome::Exhausted(Exhaustion::ProbeBudgetExceeded),
        probes,
        discarded,
    )
}

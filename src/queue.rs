//! Vehicles waiting for their next turn, earliest clock first.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::vehicle::Vehicle;

/// How vehicles with equal clocks are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum TieBreak {
    /// Lowest vehicle id first.
    #[default]
    VehicleId,
    /// Seeded random order, redrawn on every insert.
    Jitter { seed: u64 },
}

struct Entry {
    clock: i64,
    tie: u64,
    vehicle: Vehicle,
}

impl Entry {
    fn rank(&self) -> (i64, u64) {
        (self.clock, self.tie)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Min-heap of vehicles keyed on their clock.
///
/// The queue owns the vehicles it holds, so a vehicle can only be in it once.
pub struct SchedulingQueue {
    heap: BinaryHeap<Reverse<Entry>>,
    jitter: Option<StdRng>,
}

impl SchedulingQueue {
    pub fn new(tie_break: TieBreak) -> Self {
        let jitter = match tie_break {
            TieBreak::VehicleId => None,
            TieBreak::Jitter { seed } => Some(StdRng::seed_from_u64(seed)),
        };
        Self {
            heap: BinaryHeap::new(),
            jitter,
        }
    }

    pub fn push(&mut self, vehicle: Vehicle) {
        let tie = match self.jitter.as_mut() {
            Some(rng) => rng.r#gen(),
            None => vehicle.id().0 as u64,
        };
        self.heap.push(Reverse(Entry {
            clock: vehicle.clock(),
            tie,
            vehicle,
        }));
    }

    /// Removes the vehicle with the smallest clock.
    pub fn pop(&mut self) -> Option<Vehicle> {
        self.heap.pop().map(|Reverse(entry)| entry.vehicle)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl Extend<Vehicle> for SchedulingQueue {
    fn extend<I: IntoIterator<Item = Vehicle>>(&mut self, vehicles: I) {
        for vehicle in vehicles {
            self.push(vehicle);
        }
    }
}

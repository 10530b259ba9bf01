//! Per-vehicle state: where it is, what time it is there, and what it has done.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, distance};
use crate::ride::{Ride, RideId};

/// Vehicle identifier, `0..vehicle_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    id: VehicleId,
    position: Point,
    clock: i64,
    route: Vec<RideId>,
}

impl Vehicle {
    /// A fresh vehicle parked at the origin at step 0.
    pub fn new(id: VehicleId) -> Self {
        Self {
            id,
            position: Point::ORIGIN,
            clock: 0,
            route: Vec::new(),
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn clock(&self) -> i64 {
        self.clock
    }

    pub fn route(&self) -> &[RideId] {
        &self.route
    }

    /// Step at which the vehicle would reach the ride's start.
    pub fn time_to_arrival(&self, ride: &Ride) -> i64 {
        self.clock + distance(self.position, ride.start())
    }

    /// Step at which the vehicle could begin the ride, waiting for
    /// `earliest_start` if it arrives early.
    pub fn time_to_route_begin(&self, ride: &Ride) -> i64 {
        self.time_to_arrival(ride).max(ride.earliest_start())
    }

    /// Drives `ride`: appends it to the route, moves the vehicle to the
    /// ride's end and advances the clock past the drop-off.
    ///
    /// Callers must have checked [`Ride::can_be_claimed_by`]. Committing a
    /// ride that is already claimed panics.
    pub fn commit(&mut self, ride: &mut Ride) {
        debug_assert!(
            ride.is_claimed() || ride.can_be_claimed_by(self),
            "vehicle {} cannot finish {} in time",
            self.id,
            ride
        );
        let begin = self.time_to_route_begin(ride);
        ride.claim();
        self.route.push(ride.id());
        self.clock = begin + ride.ride_time();
        self.position = ride.end();
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle #{}", self.id)
    }
}

//! Ride requests and the catalog that owns them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, distance};
use crate::traits::SpatialKey;
use crate::vehicle::Vehicle;

/// Ride identifier: the zero-based position of the ride in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RideId(pub usize);

impl RideId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A ride as described by the problem file, before any assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideRequest {
    pub start: Point,
    pub end: Point,
    /// Earliest step at which the ride may begin.
    pub earliest_start: i64,
    /// Latest step by which the ride must be finished.
    pub latest_finish: i64,
}

impl RideRequest {
    pub fn new(start: Point, end: Point, earliest_start: i64, latest_finish: i64) -> Self {
        Self {
            start,
            end,
            earliest_start,
            latest_finish,
        }
    }

    /// Steps needed to drive from start to end.
    pub fn ride_time(&self) -> i64 {
        distance(self.start, self.end)
    }
}

/// A ride in the catalog. Everything but the claim flag is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ride {
    id: RideId,
    request: RideRequest,
    claimed: bool,
}

impl Ride {
    pub fn new(id: RideId, request: RideRequest) -> Self {
        Self {
            id,
            request,
            claimed: false,
        }
    }

    pub fn id(&self) -> RideId {
        self.id
    }

    pub fn request(&self) -> &RideRequest {
        &self.request
    }

    pub fn start(&self) -> Point {
        self.request.start
    }

    pub fn end(&self) -> Point {
        self.request.end
    }

    pub fn earliest_start(&self) -> i64 {
        self.request.earliest_start
    }

    pub fn latest_finish(&self) -> i64 {
        self.request.latest_finish
    }

    pub fn ride_time(&self) -> i64 {
        self.request.ride_time()
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed
    }

    /// True when the ride is still open and `vehicle`, from its current
    /// position and clock, can finish it by `latest_finish`.
    pub fn can_be_claimed_by(&self, vehicle: &Vehicle) -> bool {
        !self.claimed
            && vehicle.time_to_route_begin(self) + self.ride_time() <= self.latest_finish()
    }

    /// Flips the claim flag. Only `Vehicle::commit` calls this.
    pub(crate) fn claim(&mut self) {
        assert!(!self.claimed, "ride {} claimed twice", self.id);
        self.claimed = true;
    }
}

impl fmt::Display for Ride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ride #{} ({}, {}) -> ({}, {}) [{}, {}]",
            self.id,
            self.start().row,
            self.start().col,
            self.end().row,
            self.end().col,
            self.earliest_start(),
            self.latest_finish()
        )
    }
}

/// Start location only.
impl SpatialKey<2> for Ride {
    fn spatial_key(&self) -> [i64; 2] {
        [self.start().row, self.start().col]
    }
}

/// Start location plus earliest start.
impl SpatialKey<3> for Ride {
    fn spatial_key(&self) -> [i64; 3] {
        [self.start().row, self.start().col, self.earliest_start()]
    }
}

/// Every ride of a problem, indexed by `RideId`.
#[derive(Debug, Clone, Default)]
pub struct RideCatalog {
    rides: Vec<Ride>,
}

impl RideCatalog {
    pub fn new(requests: &[RideRequest]) -> Self {
        let rides = requests
            .iter()
            .enumerate()
            .map(|(i, request)| Ride::new(RideId(i), *request))
            .collect();
        Self { rides }
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    pub fn get(&self, id: RideId) -> Option<&Ride> {
        self.rides.get(id.index())
    }

    pub fn get_mut(&mut self, id: RideId) -> Option<&mut Ride> {
        self.rides.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ride> {
        self.rides.iter()
    }

    pub fn claimed_count(&self) -> usize {
        self.rides.iter().filter(|ride| ride.is_claimed()).count()
    }
}

impl std::ops::Index<RideId> for RideCatalog {
    type Output = Ride;

    fn index(&self, id: RideId) -> &Ride {
        &self.rides[id.index()]
    }
}

impl std::ops::IndexMut<RideId> for RideCatalog {
    fn index_mut(&mut self, id: RideId) -> &mut Ride {
        &mut self.rides[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: (i64, i64), end: (i64, i64), earliest: i64, latest: i64) -> RideRequest {
        RideRequest::new(start.into(), end.into(), earliest, latest)
    }

    #[test]
    fn test_ride_time_is_manhattan() {
        assert_eq!(request((0, 0), (2, 3), 0, 10).ride_time(), 5);
    }

    #[test]
    fn test_catalog_assigns_ids_in_input_order() {
        let catalog = RideCatalog::new(&[
            request((0, 0), (1, 0), 0, 10),
            request((5, 5), (6, 6), 0, 10),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[RideId(1)].start(), Point::new(5, 5));
        assert_eq!(catalog[RideId(0)].id(), RideId(0));
        assert!(catalog.get(RideId(2)).is_none());
    }

    #[test]
    fn test_claim_sets_flag_once() {
        let mut ride = Ride::new(RideId(0), request((0, 0), (0, 1), 0, 5));
        assert!(!ride.is_claimed());
        ride.claim();
        assert!(ride.is_claimed());
    }

    #[test]
    #[should_panic(expected = "claimed twice")]
    fn test_double_claim_panics() {
        let mut ride = Ride::new(RideId(3), request((0, 0), (0, 1), 0, 5));
        ride.claim();
        ride.claim();
    }

    #[test]
    fn test_spatial_keys() {
        let ride = Ride::new(RideId(0), request((4, 7), (0, 0), 12, 30));
        assert_eq!(SpatialKey::<2>::spatial_key(&ride), [4, 7]);
        assert_eq!(SpatialKey::<3>::spatial_key(&ride), [4, 7, 12]);
    }

    #[test]
    fn test_claimed_count() {
        let mut catalog = RideCatalog::new(&[
            request((0, 0), (1, 0), 0, 10),
            request((1, 1), (2, 2), 0, 10),
        ]);
        assert_eq!(catalog.claimed_count(), 0);
        if let Some(ride) = catalog.get_mut(RideId(1)) {
            ride.claim();
        }
        assert_eq!(catalog.claimed_count(), 1);
    }
}

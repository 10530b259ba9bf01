//! Spatial index over the rides nobody has claimed yet.

use serde::{Deserialize, Serialize};

use crate::kdtree::KdTree;
use crate::ride::{RideCatalog, RideId};
use crate::traits::SpatialKey;
use crate::vehicle::Vehicle;

/// Which ride attributes the index is keyed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexKey {
    /// Ride start location; queried with the vehicle position.
    #[default]
    Plane,
    /// Ride start location and earliest start; queried with the vehicle
    /// position and clock.
    SpaceTime,
}

#[derive(Debug, Clone)]
enum Tree {
    Plane(KdTree<RideId, 2>),
    SpaceTime(KdTree<RideId, 3>),
}

/// Unclaimed rides, nearest-first.
///
/// The index only tracks membership; ride state lives in the catalog.
#[derive(Debug, Clone)]
pub struct RideIndex {
    tree: Tree,
}

impl RideIndex {
    /// Indexes every ride in `catalog` that is not yet claimed.
    pub fn build(catalog: &RideCatalog, key: IndexKey) -> Self {
        let open = catalog.iter().filter(|ride| !ride.is_claimed());
        let tree = match key {
            IndexKey::Plane => Tree::Plane(KdTree::build(
                open.map(|ride| (ride.id(), SpatialKey::<2>::spatial_key(ride))),
            )),
            IndexKey::SpaceTime => Tree::SpaceTime(KdTree::build(
                open.map(|ride| (ride.id(), SpatialKey::<3>::spatial_key(ride))),
            )),
        };
        Self { tree }
    }

    pub fn key(&self) -> IndexKey {
        match self.tree {
            Tree::Plane(_) => IndexKey::Plane,
            Tree::SpaceTime(_) => IndexKey::SpaceTime,
        }
    }

    pub fn len(&self) -> usize {
        match &self.tree {
            Tree::Plane(tree) => tree.len(),
            Tree::SpaceTime(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, ride: RideId) -> bool {
        match &self.tree {
            Tree::Plane(tree) => tree.contains(&ride),
            Tree::SpaceTime(tree) => tree.contains(&ride),
        }
    }

    /// Indexed ride nearest to where `vehicle` currently stands.
    pub fn nearest(&self, vehicle: &Vehicle) -> Option<RideId> {
        match &self.tree {
            Tree::Plane(tree) => tree.nearest(&SpatialKey::<2>::spatial_key(vehicle)),
            Tree::SpaceTime(tree) => tree.nearest(&SpatialKey::<3>::spatial_key(vehicle)),
        }
    }

    /// Drops `ride` from the index. Returns false if it was already gone.
    pub fn remove(&mut self, ride: RideId) -> bool {
        match &mut self.tree {
            Tree::Plane(tree) => tree.remove(&ride),
            Tree::SpaceTime(tree) => tree.remove(&ride),
        }
    }
}

/// Vehicle position.
impl SpatialKey<2> for Vehicle {
    fn spatial_key(&self) -> [i64; 2] {
        [self.position().row, self.position().col]
    }
}

/// Vehicle position and clock.
impl SpatialKey<3> for Vehicle {
    fn spatial_key(&self) -> [i64; 3] {
        [self.position().row, self.position().col, self.clock()]
    }
}

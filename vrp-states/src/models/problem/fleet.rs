#[cfg(test)]
#[path = "../../../tests/unit/models/problem/fleet_test.rs"]
mod fleet_test;

use crate::models::common::{Capacity, Float, Location, TimeWindow};
use rustc_hash::FxHashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Represents operating costs for driver and vehicle.
#[derive(Clone, Debug)]
pub struct Costs {
    /// A fixed cost to use an actor.
    pub fixed: Float,
    /// Cost per distance unit.
    pub per_distance: Float,
    /// Cost per driving time unit. Setup time is charged with the same rate.
    pub per_driving_time: Float,
    /// Cost per waiting time unit.
    pub per_waiting_time: Float,
    /// Cost per service time unit.
    pub per_service_time: Float,
    /// Cost per time unit when operation starts before soft time window.
    pub per_early_time: Float,
    /// Cost per time unit when operation starts after soft time window.
    pub per_late_time: Float,
}

/// Represents a driver, person who drives Vehicle.
pub struct Driver {
    /// Driver id.
    pub id: String,
    /// Specifies operating costs for driver.
    pub costs: Costs,
}

/// Specifies how vehicle gets its load at the start of the route.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum LoadingRegime {
    /// Vehicle leaves the depot with exactly this load. Deliveries have to be covered by it
    /// or by preceding pickups.
    FixedInitialLoad(Capacity),
    /// Vehicle is loaded at the depot with whatever its deliveries need: starting load is
    /// inferred backward from deliveries which are not preceded by a matching pickup.
    DepotBalanced,
}

impl LoadingRegime {
    /// Returns load at the beginning of the route assumed when nothing is known about the route.
    pub fn initial_load(&self) -> Capacity {
        match self {
            LoadingRegime::FixedInitialLoad(initial) => *initial,
            LoadingRegime::DepotBalanced => Capacity::default(),
        }
    }
}

/// Represents a vehicle detail: a shift.
#[derive(Clone, Debug)]
pub struct VehicleDetail {
    /// Location where vehicle starts.
    pub start: Location,
    /// Location where vehicle ends. None means the vehicle does not return to depot.
    pub end: Option<Location>,
    /// Earliest start and latest arrival.
    pub time: TimeWindow,
}

/// Represents a vehicle.
pub struct Vehicle {
    /// Vehicle id.
    pub id: String,
    /// Vehicle type id.
    pub type_id: String,
    /// Capacity ceiling.
    pub capacity: Capacity,
    /// Specifies operating costs for vehicle.
    pub costs: Costs,
    /// Specifies how vehicle is loaded.
    pub loading: LoadingRegime,
    /// A coefficient applied to activities' setup time.
    pub setup_coef: Float,
    /// Specifies vehicle details.
    pub details: Vec<VehicleDetail>,
}

/// Represents actor detail.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ActorDetail {
    /// Location where actor starts.
    pub start: Location,
    /// Location where actor ends. None if it doesn't return to depot.
    pub end: Option<Location>,
    /// Time windows when actor can work.
    pub time: TimeWindow,
}

/// Represents an actor: a vehicle with a driver within one specific shift.
pub struct Actor {
    /// A vehicle associated within actor.
    pub vehicle: Arc<Vehicle>,
    /// A driver associated within actor.
    pub driver: Arc<Driver>,
    /// Specifies actor detail.
    pub detail: ActorDetail,
    /// A dense index of actor's vehicle type, see [`Fleet::type_count`].
    pub type_index: usize,
}

impl Actor {
    /// Returns true if actor has to return to the depot.
    pub fn returns_to_depot(&self) -> bool {
        self.detail.end.is_some()
    }
}

/// Identifies vehicles which behave the same way for state propagation purpose.
#[derive(Hash, Eq, PartialEq)]
struct VehicleTypeKey {
    type_id: String,
    detail: ActorDetail,
    loading: LoadingRegime,
    setup_coef: u64,
}

/// Represents available resources to serve jobs.
pub struct Fleet {
    /// All fleet drivers.
    pub drivers: Vec<Arc<Driver>>,
    /// All fleet vehicles.
    pub vehicles: Vec<Arc<Vehicle>>,
    /// All fleet actors.
    pub actors: Vec<Arc<Actor>>,
    type_count: usize,
}

impl Fleet {
    /// Creates a new instance of `Fleet`. Actors get a dense vehicle type index which is shared
    /// by actors with the same vehicle type, shift and loading parameters.
    pub fn new(drivers: Vec<Arc<Driver>>, vehicles: Vec<Arc<Vehicle>>) -> Fleet {
        assert!(!drivers.is_empty(), "fleet should have at least one driver");

        let mut type_indices = FxHashMap::<VehicleTypeKey, usize>::default();
        let driver = drivers[0].clone();

        let actors = vehicles
            .iter()
            .flat_map(|vehicle| vehicle.details.iter().map(move |detail| (vehicle, detail)))
            .map(|(vehicle, detail)| {
                let detail = ActorDetail { start: detail.start, end: detail.end, time: detail.time.clone() };
                let key = VehicleTypeKey {
                    type_id: vehicle.type_id.clone(),
                    detail: detail.clone(),
                    loading: vehicle.loading.clone(),
                    setup_coef: vehicle.setup_coef.to_bits(),
                };
                let next_index = type_indices.len();
                let type_index = *type_indices.entry(key).or_insert(next_index);

                Arc::new(Actor { vehicle: vehicle.clone(), driver: driver.clone(), detail, type_index })
            })
            .collect();

        Fleet { drivers, vehicles, actors, type_count: type_indices.len() }
    }

    /// Returns amount of distinct vehicle types: any actor's `type_index` is less than it.
    pub fn type_count(&self) -> usize {
        self.type_count
    }

    /// Finds the first actor of the vehicle with given id.
    pub fn find_actor(&self, vehicle_id: &str) -> Option<Arc<Actor>> {
        self.actors.iter().find(|actor| actor.vehicle.id == vehicle_id).cloned()
    }
}

impl PartialEq<Actor> for Actor {
    fn eq(&self, other: &Actor) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Actor {}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let address = self as *const Actor;
        address.hash(state);
    }
}

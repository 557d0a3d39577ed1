#[cfg(test)]
#[path = "../../../tests/unit/models/problem/costs_test.rs"]
mod costs_test;

use crate::models::common::*;
use crate::models::problem::Actor;
use crate::models::solution::Activity;

/// Specifies travel time type.
#[derive(Copy, Clone, Debug)]
pub enum TravelTime {
    /// Arrival time type: travel is evaluated backward from the given arrival time.
    Arrival(Timestamp),
    /// Departure time type: travel is evaluated forward from the given departure time.
    Departure(Timestamp),
}

/// Provides the way to get routing information for specific locations and actor.
/// Both forward and backward forms are requested via [`TravelTime`].
pub trait TransportCost: Send + Sync {
    /// Returns transport cost between two locations considering arrival or departure time.
    fn cost(&self, actor: &Actor, from: Location, to: Location, travel_time: TravelTime) -> Cost {
        let distance = self.distance(actor, from, to, travel_time);
        let duration = self.duration(actor, from, to, travel_time);

        distance * (actor.driver.costs.per_distance + actor.vehicle.costs.per_distance)
            + duration * (actor.driver.costs.per_driving_time + actor.vehicle.costs.per_driving_time)
    }

    /// Returns transport time between two locations considering arrival or departure time.
    fn duration(&self, actor: &Actor, from: Location, to: Location, travel_time: TravelTime) -> Duration;

    /// Returns transport distance between two locations considering arrival or departure time.
    fn distance(&self, actor: &Actor, from: Location, to: Location, travel_time: TravelTime) -> Distance;
}

/// Provides the way to get cost information for specific activities done by specific actor.
pub trait ActivityCost: Send + Sync {
    /// Returns cost to perform activity.
    fn cost(&self, actor: &Actor, activity: &Activity, arrival: Timestamp) -> Cost {
        let waiting = if activity.place.time.start > arrival { activity.place.time.start - arrival } else { 0. };
        let service = self.duration(actor, activity, arrival);

        waiting * (actor.driver.costs.per_waiting_time + actor.vehicle.costs.per_waiting_time)
            + service * (actor.driver.costs.per_service_time + actor.vehicle.costs.per_service_time)
    }

    /// Returns operation duration of the activity when it is started around given time.
    fn duration(&self, _actor: &Actor, activity: &Activity, _time: Timestamp) -> Duration {
        activity.place.duration
    }
}

/// Provides the way to get setup time needed before activity can be started.
pub trait SetupTime: Send + Sync {
    /// Returns setup time needed when arriving to `to` from `from` for activity with given
    /// nominal `setup` duration.
    fn setup_time(&self, actor: &Actor, from: Location, to: Location, setup: Duration) -> Duration;
}

/// A setup time which is applied only when location changes. The nominal setup duration is
/// scaled by vehicle's setup coefficient.
#[derive(Default)]
pub struct LocationSetupTime {}

impl SetupTime for LocationSetupTime {
    fn setup_time(&self, actor: &Actor, from: Location, to: Location, setup: Duration) -> Duration {
        if from == to { 0. } else { setup * actor.vehicle.setup_coef }
    }
}

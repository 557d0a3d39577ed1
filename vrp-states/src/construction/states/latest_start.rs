#[cfg(test)]
#[path = "../../../tests/unit/construction/states/latest_start_test.rs"]
mod latest_start_test;

use super::*;
use crate::construction::heuristics::RouteState;
use crate::models::common::Timestamp;
use crate::models::problem::{ActivityCost, SetupTime, TransportCost, TravelTime};

custom_vehicle_activity_state!(LatestOperationStartTime typeof Timestamp);

/// Computes the latest operation start time of every activity for every vehicle type returned by
/// [`VehiclesToUpdate`]. Each vehicle is walked backward from its own latest arrival at its own
/// end location, so the result does not depend on the vehicle currently serving the route.
pub struct LatestStartPropagator {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    setup: Arc<dyn SetupTime>,
    vehicles: VehiclesToUpdate,
}

impl LatestStartPropagator {
    /// Creates a new instance of `LatestStartPropagator`.
    pub fn new(
        transport: Arc<dyn TransportCost>,
        activity: Arc<dyn ActivityCost>,
        setup: Arc<dyn SetupTime>,
        vehicles: VehiclesToUpdate,
    ) -> Self {
        Self { transport, activity, setup, vehicles }
    }

    fn calculate(&self, route: &Route, actor: &Actor) -> Vec<Timestamp> {
        let tour = &route.tour;
        let end_idx = tour.total() - 1;
        let mut latest_times = vec![actor.detail.time.end; tour.total()];

        let init = (actor.detail.time.end, actor.detail.end.unwrap_or_else(|| tour.last_location()), 0.);
        (1..end_idx).rev().fold(init, |(latest_at_next, next_location, next_setup), idx| {
            let Some(activity) = tour.get(idx) else { return (latest_at_next, next_location, next_setup) };
            let location = activity.place.location;

            let latest_arrival_at_next =
                latest_at_next - self.setup.setup_time(actor, location, next_location, next_setup);
            let transport =
                self.transport.duration(actor, location, next_location, TravelTime::Arrival(latest_arrival_at_next));
            let duration = self.activity.duration(actor, activity, latest_arrival_at_next);
            let potential = latest_arrival_at_next - transport - duration;
            let latest = activity.place.time.end.min(potential);

            latest_times[idx] = latest;

            (latest, location, activity.setup)
        });

        latest_times
    }
}

impl StatePropagator for LatestStartPropagator {
    fn name(&self) -> &str {
        "latest start"
    }

    fn provides(&self) -> &[StateKey] {
        &[StateKey::LatestOperationStartTime]
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let results = (self.vehicles)(route_ctx.route())
            .into_iter()
            .map(|actor| (actor.type_index, self.calculate(route_ctx.route(), actor.as_ref())))
            .collect::<Vec<_>>();

        let state = route_ctx.state_mut();
        results.into_iter().for_each(|(type_idx, values)| {
            state.set_latest_operation_start_time_states(type_idx, values);
        });
    }
}

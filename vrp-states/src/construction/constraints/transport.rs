#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/transport_test.rs"]
mod transport_test;

use super::*;
use crate::construction::states::{LateActivitiesAheadActivityState, ScheduleActivityState};
use crate::models::common::{Duration, Float, Location, TimeWindow, Timestamp};
use crate::models::problem::{ActivityCost, Actor, SetupTime, TransportCost, TravelTime};
use std::sync::Arc;

/// Estimates marginal routing cost of activity insertion: cost of the detour through the target
/// activity, setup time included, plus a penalty for starting outside of its soft time window.
///
/// When activities after insertion point are already late, the delay of arrival at the next
/// activity is charged once per such activity with the late time rate.
pub struct TransportCostConstraint {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    setup: Arc<dyn SetupTime>,
}

impl TransportCostConstraint {
    /// Creates a new instance of `TransportCostConstraint`.
    pub fn new(transport: Arc<dyn TransportCost>, activity: Arc<dyn ActivityCost>, setup: Arc<dyn SetupTime>) -> Self {
        Self { transport, activity, setup }
    }

    /// Returns cost of the leg and the time when vehicle is ready to operate at its end.
    fn leg(
        &self,
        actor: &Actor,
        from: Location,
        to: Location,
        setup: Duration,
        departure: Timestamp,
    ) -> (Cost, Timestamp) {
        let travel_time = TravelTime::Departure(departure);
        let setup = self.setup.setup_time(actor, from, to, setup);
        let cost = self.transport.cost(actor, from, to, travel_time)
            + setup * (actor.driver.costs.per_driving_time + actor.vehicle.costs.per_driving_time);

        (cost, departure + self.transport.duration(actor, from, to, travel_time) + setup)
    }
}

impl SoftActivityConstraint for TransportCostConstraint {
    fn estimate_activity(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> Cost {
        let actor = insertion_ctx.actor.as_ref();
        let ActivityContext { index, prev, target, next, departure } = *activity_ctx;
        let prev_location = prev.place.location;
        let target_location = target.place.location;

        let (left_cost, ready) = self.leg(actor, prev_location, target_location, target.setup, departure);
        let start = ready.max(target.place.time.start);
        let penalty = soft_time_window_penalty(actor, &target.soft_time, start);

        let next_location = match (next.is_end(), actor.detail.end) {
            (true, Some(end)) => end,
            (true, None) => return left_cost + penalty,
            (false, _) => next.place.location,
        };

        let target_departure = start + self.activity.duration(actor, target, ready);
        let (right_cost, next_ready) = self.leg(actor, target_location, next_location, next.setup, target_departure);

        let late_ahead = if next.is_end() {
            0
        } else {
            insertion_ctx.route_ctx.state().get_late_activities_ahead_at(index + 1).copied().unwrap_or(0)
        };
        let delay_penalty = if late_ahead > 0 {
            let (_, direct_ready) = self.leg(actor, prev_location, next_location, next.setup, departure);
            let delay = (next_ready - direct_ready).max(0.);

            delay * late_ahead as Float * (actor.driver.costs.per_late_time + actor.vehicle.costs.per_late_time)
        } else {
            0.
        };

        let route = insertion_ctx.route_ctx.route();
        let old_cost = if route.tour.has_jobs() {
            let route_actor = route.actor.as_ref();
            let prev_departure = insertion_ctx
                .route_ctx
                .state()
                .get_schedule_at(index)
                .map(|schedule| schedule.departure)
                .unwrap_or(departure);
            let old_next_location = if next.is_end() { route.end_location() } else { next.place.location };

            self.leg(route_actor, prev_location, old_next_location, next.setup, prev_departure).0
        } else {
            self.leg(actor, prev_location, next_location, next.setup, departure).0
        };

        left_cost + penalty + delay_penalty + right_cost - old_cost
    }
}

/// Returns cost of starting operation at `start` outside of the soft time window.
pub fn soft_time_window_penalty(actor: &Actor, soft_time: &TimeWindow, start: Timestamp) -> Cost {
    let early = (soft_time.start - start).max(0.);
    let late = (start - soft_time.end).max(0.);

    early * (actor.driver.costs.per_early_time + actor.vehicle.costs.per_early_time)
        + late * (actor.driver.costs.per_late_time + actor.vehicle.costs.per_late_time)
}

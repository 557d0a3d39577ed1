#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/time_window_test.rs"]
mod time_window_test;

use super::*;
use crate::construction::states::LatestOperationStartTimeVehicleActivityState;
use crate::models::problem::{ActivityCost, SetupTime, TransportCost, TravelTime};
use crate::utils::compare_floats;
use std::cmp::Ordering;
use std::sync::Arc;

/// Checks that activity can be inserted without violating time windows of the activity itself
/// and of the rest of the route. Latest start times of the route are read for the actor from
/// insertion context, so they have to be computed for it.
pub struct TimeWindowConstraint {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    setup: Arc<dyn SetupTime>,
}

impl TimeWindowConstraint {
    /// Creates a new instance of `TimeWindowConstraint`.
    pub fn new(transport: Arc<dyn TransportCost>, activity: Arc<dyn ActivityCost>, setup: Arc<dyn SetupTime>) -> Self {
        Self { transport, activity, setup }
    }
}

impl HardActivityConstraint for TimeWindowConstraint {
    fn evaluate_activity(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        let actor = insertion_ctx.actor.as_ref();
        let ActivityContext { index, prev, target, next, departure } = *activity_ctx;

        let is_open_end = next.is_end() && !actor.returns_to_depot();
        let next_location = match (next.is_end(), actor.detail.end) {
            (true, Some(end)) => end,
            (true, None) => target.place.location,
            (false, _) => next.place.location,
        };
        let latest_arrival = actor.detail.time.end;
        let latest_at_next = if next.is_end() {
            latest_arrival
        } else {
            insertion_ctx
                .route_ctx
                .state()
                .get_latest_operation_start_time_at(actor.type_index, index + 1)
                .copied()
                .unwrap_or(next.place.time.end)
        };

        let is_late = |left: f64, right: f64| compare_floats(left, right) == Ordering::Greater;

        if !target.place.time.intersects(&actor.detail.time)
            || is_late(prev.place.time.start, latest_arrival)
            || is_late(next.place.time.start, latest_arrival)
        {
            return ConstraintStatus::NotFulfilledBreak;
        }

        if !is_open_end && is_late(target.place.time.start, latest_at_next) {
            return ConstraintStatus::NotFulfilled;
        }

        let prev_location = prev.place.location;
        let target_location = target.place.location;
        let travel_time = TravelTime::Departure(departure);

        if !is_open_end {
            let direct_arrival = departure + self.transport.duration(actor, prev_location, next_location, travel_time);
            if is_late(direct_arrival, latest_at_next) {
                return ConstraintStatus::NotFulfilledBreak;
            }
        }

        let arrival = departure + self.transport.duration(actor, prev_location, target_location, travel_time);
        let ready = arrival + self.setup.setup_time(actor, prev_location, target_location, target.setup);

        let latest_at_target = if is_open_end {
            target.place.time.end.min(latest_arrival - self.activity.duration(actor, target, ready))
        } else {
            let latest_arrival_at_next =
                latest_at_next - self.setup.setup_time(actor, target_location, next_location, next.setup);
            let transport = self.transport.duration(
                actor,
                target_location,
                next_location,
                TravelTime::Arrival(latest_arrival_at_next),
            );
            let duration = self.activity.duration(actor, target, latest_arrival_at_next);

            target.place.time.end.min(latest_arrival_at_next - transport - duration)
        };

        if is_late(ready, latest_at_target) {
            return ConstraintStatus::NotFulfilled;
        }

        if is_open_end {
            return ConstraintStatus::Fulfilled;
        }

        let target_departure = ready.max(target.place.time.start) + self.activity.duration(actor, target, ready);
        let next_arrival = target_departure
            + self.transport.duration(actor, target_location, next_location, TravelTime::Departure(target_departure));
        let next_ready = next_arrival + self.setup.setup_time(actor, target_location, next_location, next.setup);

        if is_late(next_ready, latest_at_next) { ConstraintStatus::NotFulfilled } else { ConstraintStatus::Fulfilled }
    }
}

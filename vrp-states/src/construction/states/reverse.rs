#[cfg(test)]
#[path = "../../../tests/unit/construction/states/reverse_test.rs"]
mod reverse_test;

use super::*;
use crate::construction::heuristics::RouteState;
use crate::models::common::{Location, Timestamp};
use crate::models::problem::{ActivityCost, TransportCost, TravelTime};
use crate::models::solution::Activity;

/// Latest time bounds of an activity computed by walking the route backward.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReverseSchedule {
    /// Latest operation start.
    pub start: Timestamp,
    /// Latest operation end.
    pub end: Timestamp,
}

custom_activity_state!(ReverseSchedule typeof ReverseSchedule);
custom_tour_state!(ReverseDepartureTime typeof Timestamp);

/// Tracks activity times walking the route from end to start using backward transport time.
pub struct ReverseActivityTimeTracker {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    policy: ActivityPolicy,
    state: Option<ReverseTrackerState>,
}

struct ReverseTrackerState {
    actor: Arc<Actor>,
    prev_location: Location,
    start_at_prev: Timestamp,
}

impl ReverseActivityTimeTracker {
    /// Creates a new instance of `ReverseActivityTimeTracker`.
    pub fn new(transport: Arc<dyn TransportCost>, activity: Arc<dyn ActivityCost>, policy: ActivityPolicy) -> Self {
        Self { transport, activity, policy, state: None }
    }

    /// Starts tracking from the route end which is reached at given time.
    pub fn begin(&mut self, route: &Route, end_arrival: Timestamp) {
        self.state = Some(ReverseTrackerState {
            actor: route.actor.clone(),
            prev_location: route.end_location(),
            start_at_prev: end_arrival,
        });
    }

    /// Visits previous activity and returns its latest bounds.
    ///
    /// # Panics
    ///
    /// Panics if called before `begin`.
    pub fn visit(&mut self, activity: &Activity) -> ReverseSchedule {
        let state = self.state.as_mut().unwrap_or_else(|| panic!("activity is visited before route end is set"));
        let actor = state.actor.as_ref();
        let location = activity.place.location;

        let transport =
            self.transport.duration(actor, location, state.prev_location, TravelTime::Arrival(state.start_at_prev));

        let end = state.start_at_prev - transport;
        let start = end - self.activity.duration(actor, activity, end);
        let latest = match self.policy {
            ActivityPolicy::AsSoonAsTimeWindowOpens => start.min(activity.place.time.end),
            ActivityPolicy::AsSoonAsArrived => start,
        };

        state.prev_location = location;
        state.start_at_prev = latest;

        ReverseSchedule { start: latest, end }
    }

    /// Propagates the leg to the route start and returns the latest departure time from it.
    ///
    /// # Panics
    ///
    /// Panics if called before `begin`.
    pub fn finish(&mut self, start: &Activity) -> Timestamp {
        let state = self.state.take().unwrap_or_else(|| panic!("route start is reached before route end is set"));

        state.start_at_prev
            - self.transport.duration(
                state.actor.as_ref(),
                start.place.location,
                state.prev_location,
                TravelTime::Arrival(state.start_at_prev),
            )
    }
}

/// Computes reverse schedules starting from the route end arrival computed by forward pass.
pub struct ReverseSchedulePropagator {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    policy: ActivityPolicy,
}

impl ReverseSchedulePropagator {
    /// Creates a new instance of `ReverseSchedulePropagator`.
    pub fn new(transport: Arc<dyn TransportCost>, activity: Arc<dyn ActivityCost>, policy: ActivityPolicy) -> Self {
        Self { transport, activity, policy }
    }
}

impl StatePropagator for ReverseSchedulePropagator {
    fn name(&self) -> &str {
        "reverse schedule"
    }

    fn provides(&self) -> &[StateKey] {
        &[StateKey::ReverseSchedules, StateKey::ReverseDepartureTime]
    }

    fn requires(&self) -> &[StateKey] {
        &[StateKey::Schedules]
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let route = route_ctx.route();
        let end_idx = route.tour.total() - 1;
        let end_arrival = route_ctx
            .state()
            .get_schedule_at(end_idx)
            .map(|schedule| schedule.arrival)
            .unwrap_or(route.actor.detail.time.end);

        let mut tracker = ReverseActivityTimeTracker::new(self.transport.clone(), self.activity.clone(), self.policy);
        tracker.begin(route, end_arrival);

        let mut schedules = vec![ReverseSchedule::default(); route.tour.total()];
        schedules[end_idx] = ReverseSchedule { start: end_arrival, end: end_arrival };
        route.tour.job_activities().enumerate().rev().for_each(|(idx, activity)| {
            schedules[idx + 1] = tracker.visit(activity);
        });

        let departure = tracker.finish(route.tour.start());
        schedules[0] = ReverseSchedule { start: departure, end: departure };

        let state = route_ctx.state_mut();
        state.set_reverse_schedule_states(schedules);
        state.set_reverse_departure_time(departure);
    }
}

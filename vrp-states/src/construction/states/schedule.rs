#[cfg(test)]
#[path = "../../../tests/unit/construction/states/schedule_test.rs"]
mod schedule_test;

use super::*;
use crate::construction::heuristics::RouteState;
use crate::models::common::{Location, Schedule, Timestamp};
use crate::models::problem::{ActivityCost, SetupTime, TransportCost, TravelTime};
use crate::models::solution::Activity;

custom_activity_state!(Schedule typeof Schedule);

/// Tracks activity times walking the route from start to end.
///
/// Usage: call `begin` once for the route, then `visit` for every job activity in tour order and
/// `finish` to get the end activity schedule.
pub struct ActivityTimeTracker {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    setup: Arc<dyn SetupTime>,
    policy: ActivityPolicy,
    state: Option<TrackerState>,
}

struct TrackerState {
    actor: Arc<Actor>,
    prev_location: Location,
    start_at_prev: Timestamp,
}

impl ActivityTimeTracker {
    /// Creates a new instance of `ActivityTimeTracker`.
    pub fn new(
        transport: Arc<dyn TransportCost>,
        activity: Arc<dyn ActivityCost>,
        setup: Arc<dyn SetupTime>,
        policy: ActivityPolicy,
    ) -> Self {
        Self { transport, activity, setup, policy, state: None }
    }

    /// Starts tracking of the route. Returns schedule of the start activity.
    pub fn begin(&mut self, route: &Route) -> Schedule {
        let departure = route.actor.detail.time.start;
        self.state = Some(TrackerState {
            actor: route.actor.clone(),
            prev_location: route.tour.start().place.location,
            start_at_prev: departure,
        });

        Schedule::at(departure)
    }

    /// Visits next activity and returns its schedule.
    ///
    /// # Panics
    ///
    /// Panics if called before `begin`: such traversal would produce meaningless times.
    pub fn visit(&mut self, activity: &Activity) -> Schedule {
        let state = self.state.as_mut().unwrap_or_else(|| panic!("activity is visited before route is started"));
        let actor = state.actor.as_ref();
        let location = activity.place.location;

        let setup = self.setup.setup_time(actor, state.prev_location, location, activity.setup);
        let transport =
            self.transport.duration(actor, state.prev_location, location, TravelTime::Departure(state.start_at_prev));

        let arrival = state.start_at_prev + transport;
        let ready = arrival + setup;
        let start = match self.policy {
            ActivityPolicy::AsSoonAsTimeWindowOpens => ready.max(activity.place.time.start),
            ActivityPolicy::AsSoonAsArrived => ready,
        };
        let departure = start + self.activity.duration(actor, activity, ready);

        state.prev_location = location;
        state.start_at_prev = departure;

        Schedule::new(arrival, ready, start, departure)
    }

    /// Propagates the final leg to the route end and stops tracking. If actor doesn't return to
    /// the depot, the route ends where the last activity is done.
    ///
    /// # Panics
    ///
    /// Panics if called before `begin`.
    pub fn finish(&mut self) -> Schedule {
        let state = self.state.take().unwrap_or_else(|| panic!("route is finished before it is started"));
        let actor = state.actor.as_ref();

        let arrival = match actor.detail.end {
            Some(end) => {
                let travel_time = TravelTime::Departure(state.start_at_prev);
                state.start_at_prev + self.transport.duration(actor, state.prev_location, end, travel_time)
            }
            None => state.start_at_prev,
        };

        Schedule::at(arrival)
    }
}

/// Computes forward schedules of route activities.
pub struct SchedulePropagator {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    setup: Arc<dyn SetupTime>,
    policy: ActivityPolicy,
}

impl SchedulePropagator {
    /// Creates a new instance of `SchedulePropagator`.
    pub fn new(
        transport: Arc<dyn TransportCost>,
        activity: Arc<dyn ActivityCost>,
        setup: Arc<dyn SetupTime>,
        policy: ActivityPolicy,
    ) -> Self {
        Self { transport, activity, setup, policy }
    }
}

impl StatePropagator for SchedulePropagator {
    fn name(&self) -> &str {
        "schedule"
    }

    fn provides(&self) -> &[StateKey] {
        &[StateKey::Schedules]
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let mut tracker =
            ActivityTimeTracker::new(self.transport.clone(), self.activity.clone(), self.setup.clone(), self.policy);

        let route = route_ctx.route();
        let mut schedules = Vec::with_capacity(route.tour.total());

        schedules.push(tracker.begin(route));
        schedules.extend(route.tour.job_activities().map(|activity| tracker.visit(activity)));
        schedules.push(tracker.finish());

        route_ctx.state_mut().set_schedule_states(schedules);
    }
}

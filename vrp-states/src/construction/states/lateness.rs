#[cfg(test)]
#[path = "../../../tests/unit/construction/states/lateness_test.rs"]
mod lateness_test;

use super::*;
use crate::construction::heuristics::RouteState;
use crate::utils::compare_floats;
use std::cmp::Ordering;

custom_tour_state!(Lateness typeof usize);
custom_activity_state!(LateActivitiesAhead typeof usize);

/// Counts activities which operation starts outside of their soft time window.
///
/// For every activity, it also keeps the amount of activities at or after it which start later
/// than their soft time window allows: a delay introduced before such an activity makes all of
/// them later.
#[derive(Default)]
pub struct LatenessPropagator {}

impl StatePropagator for LatenessPropagator {
    fn name(&self) -> &str {
        "lateness"
    }

    fn provides(&self) -> &[StateKey] {
        &[StateKey::Lateness, StateKey::LateActivitiesAhead]
    }

    fn requires(&self) -> &[StateKey] {
        &[StateKey::Schedules]
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let state = route_ctx.state();
        let (outside, late): (Vec<_>, Vec<_>) = route_ctx
            .route()
            .tour
            .all_activities()
            .enumerate()
            .map(|(idx, activity)| match (activity.job.is_some(), state.get_schedule_at(idx)) {
                (true, Some(schedule)) => {
                    let is_late = compare_floats(schedule.start, activity.soft_time.end) == Ordering::Greater;
                    (!activity.soft_time.contains(schedule.start), is_late)
                }
                _ => (false, false),
            })
            .unzip();

        let lateness = outside.into_iter().filter(|is_outside| *is_outside).count();
        let mut late_ahead = late.into_iter().map(usize::from).collect::<Vec<_>>();
        (0..late_ahead.len().saturating_sub(1)).rev().for_each(|idx| late_ahead[idx] += late_ahead[idx + 1]);

        let state = route_ctx.state_mut();
        state.set_lateness(lateness);
        state.set_late_activities_ahead_states(late_ahead);
    }
}

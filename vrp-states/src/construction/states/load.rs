#[cfg(test)]
#[path = "../../../tests/unit/construction/states/load_test.rs"]
mod load_test;

use super::*;
use crate::construction::heuristics::RouteState;
use crate::models::common::Capacity;
use crate::models::problem::LoadingRegime;
use crate::models::solution::ActivityKind;

custom_tour_state!(LoadAtBeginning typeof Capacity);
custom_tour_state!(LoadAtEnd typeof Capacity);
custom_tour_state!(MaxLoad typeof Capacity);
custom_activity_state!(CurrentLoad typeof Capacity);
custom_activity_state!(PastMaxLoad typeof Capacity);
custom_activity_state!(PastMinLoad typeof Capacity);
custom_activity_state!(FutureMaxLoad typeof Capacity);
custom_activity_state!(FutureMinLoad typeof Capacity);
custom_activity_state!(CumulativeShipmentLoad typeof Capacity);
custom_activity_state!(FutureMaxShipmentLoad typeof Capacity);

/// Keeps track of loads carried along the route.
///
/// Route aggregates (load at beginning and end) are computed from scratch when insertion starts
/// and updated incrementally on job insertion. When the vehicle is loaded at the depot on demand,
/// the incremental update changes the depot load by the smallest amount which keeps the rest of
/// the route within bounds, the same way [`crate::construction::constraints::LoadConstraint`]
/// accepts the insertion.
///
/// Activity loads are then produced by walking the route from the load at beginning, together
/// with past and future extremal values which let constraints reason about the whole route from
/// a single activity.
#[derive(Default)]
pub struct LoadPropagator {}

impl StatePropagator for LoadPropagator {
    fn name(&self) -> &str {
        "load"
    }

    fn provides(&self) -> &[StateKey] {
        &[
            StateKey::LoadAtBeginning,
            StateKey::LoadAtEnd,
            StateKey::MaxLoad,
            StateKey::CurrentLoad,
            StateKey::PastMaxLoad,
            StateKey::PastMinLoad,
            StateKey::FutureMaxLoad,
            StateKey::FutureMinLoad,
            StateKey::CumulativeShipmentLoad,
            StateKey::FutureMaxShipmentLoad,
        ]
    }

    fn accept_insertion_start(&self, route_ctx: &mut RouteContext) {
        let route = route_ctx.route();
        let sizes = route.tour.job_activities().map(|activity| activity.size);

        let (at_beginning, at_end) = match &route.actor.vehicle.loading {
            LoadingRegime::FixedInitialLoad(initial) => (*initial, *initial + sizes.sum::<Capacity>()),
            LoadingRegime::DepotBalanced => {
                sizes.fold((Capacity::default(), Capacity::default()), |(depot, running), size| {
                    let running = running + size;
                    let deficit = get_deficit(running);

                    (depot + deficit, running + deficit)
                })
            }
        };

        let state = route_ctx.state_mut();
        state.set_load_at_beginning(at_beginning);
        state.set_load_at_end(at_end);
    }

    fn accept_insertion(&self, route_ctx: &mut RouteContext, job: &Arc<Job>) {
        let route = route_ctx.route();
        let state = route_ctx.state();
        let vehicle = route.actor.vehicle.as_ref();
        let (at_beginning, at_end) = get_load_aggregates(state, &vehicle.loading);

        // activity states are not refreshed yet: the prefix up to the previous activity keeps its indices
        let prev_idx = route.tour.index_of(job).map_or(0, |idx| idx - 1);
        let is_depot_balanced = vehicle.loading == LoadingRegime::DepotBalanced;

        let (at_beginning, at_end) = if job.is_delivery() {
            let future_min = state.get_future_min_load_at(prev_idx).copied().unwrap_or(at_end);
            let deficit = if is_depot_balanced { get_deficit(future_min - job.size) } else { Capacity::default() };

            (at_beginning + deficit, at_end - job.size + deficit)
        } else if job.is_pickup_like() {
            let future_max = state.get_future_max_load_at(prev_idx).copied().unwrap_or(at_end);
            let excess = if is_depot_balanced {
                get_excess(future_max + job.size, &vehicle.capacity)
            } else {
                Capacity::default()
            };

            (at_beginning - excess, at_end + job.size - excess)
        } else {
            (at_beginning, at_end)
        };

        let state = route_ctx.state_mut();
        state.set_load_at_beginning(at_beginning);
        state.set_load_at_end(at_end);
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let route = route_ctx.route();
        let (at_beginning, _) = get_load_aggregates(route_ctx.state(), &route.actor.vehicle.loading);

        let mut current_loads = Vec::with_capacity(route.tour.total());
        current_loads.push(at_beginning);
        route.tour.job_activities().for_each(|activity| {
            let prev = current_loads[current_loads.len() - 1];
            current_loads.push(prev + activity.size);
        });
        current_loads.push(current_loads[current_loads.len() - 1]);

        let shipment_loads = route
            .tour
            .all_activities()
            .scan(Capacity::default(), |pending, activity| {
                if matches!(activity.kind, ActivityKind::PickupShipment | ActivityKind::DeliverShipment) {
                    *pending = (*pending + activity.size).max_load(Capacity::default());
                }
                Some(*pending)
            })
            .collect::<Vec<_>>();

        let past_max = running_fold(current_loads.iter(), Capacity::max_load);
        let past_min = running_fold(current_loads.iter(), Capacity::min_load);
        let future_max = reversed(running_fold(current_loads.iter().rev(), Capacity::max_load));
        let future_min = reversed(running_fold(current_loads.iter().rev(), Capacity::min_load));
        let future_max_shipment = reversed(running_fold(shipment_loads.iter().rev(), Capacity::max_load));

        let max_load = future_max.first().copied().unwrap_or(at_beginning);
        let at_end = current_loads.last().copied().unwrap_or(at_beginning);

        let state = route_ctx.state_mut();
        state.set_load_at_end(at_end);
        state.set_max_load(max_load);
        state.set_current_load_states(current_loads);
        state.set_past_max_load_states(past_max);
        state.set_past_min_load_states(past_min);
        state.set_future_max_load_states(future_max);
        state.set_future_min_load_states(future_min);
        state.set_cumulative_shipment_load_states(shipment_loads);
        state.set_future_max_shipment_load_states(future_max_shipment);
    }
}

/// Returns load at beginning and at end of the route falling back to the regime's initial load.
pub fn get_load_aggregates(state: &RouteState, loading: &LoadingRegime) -> (Capacity, Capacity) {
    let initial = loading.initial_load();
    let at_beginning = state.get_load_at_beginning().copied().unwrap_or(initial);
    let at_end = state.get_load_at_end().copied().unwrap_or(at_beginning);

    (at_beginning, at_end)
}

/// Returns how much has to be added to every load of the route to keep `load` non negative.
pub(crate) fn get_deficit(load: Capacity) -> Capacity {
    -load.min_load(Capacity::default())
}

/// Returns how much has to be taken from every load of the route to keep `load` within capacity.
pub(crate) fn get_excess(load: Capacity, capacity: &Capacity) -> Capacity {
    (load - *capacity).max_load(Capacity::default())
}

fn running_fold<'a, I>(loads: I, op: fn(Capacity, Capacity) -> Capacity) -> Vec<Capacity>
where
    I: Iterator<Item = &'a Capacity>,
{
    loads
        .scan(None, |acc: &mut Option<Capacity>, load| {
            let next = acc.map_or(*load, |acc| op(acc, *load));
            *acc = Some(next);
            Some(next)
        })
        .collect()
}

fn reversed(mut values: Vec<Capacity>) -> Vec<Capacity> {
    values.reverse();
    values
}

#[cfg(test)]
#[path = "../../../tests/unit/construction/states/switch_test.rs"]
mod switch_test;

use super::*;
use crate::construction::heuristics::RouteState;
use crate::models::common::{Capacity, Duration, Location, Timestamp};
use crate::models::problem::{ActivityCost, LoadingRegime, SetupTime, TransportCost, TravelTime};

custom_vehicle_state!(SwitchNotFeasible typeof bool);

/// Precomputes whether the route can be served by other vehicles without re-optimization.
///
/// All candidate vehicles are evaluated within a single backward walk: per vehicle scratch
/// values are kept in arrays indexed by vehicle type index which is dense and small.
pub struct SwitchFeasibilityPropagator {
    transport: Arc<dyn TransportCost>,
    activity: Arc<dyn ActivityCost>,
    setup: Arc<dyn SetupTime>,
    vehicles: VehiclesToUpdate,
    type_count: usize,
}

#[derive(Clone, Default)]
struct VehicleScratch {
    latest_ready_at_prev: Timestamp,
    location_of_prev: Location,
    setup_of_prev: Duration,
}

impl SwitchFeasibilityPropagator {
    /// Creates a new instance of `SwitchFeasibilityPropagator`. `type_count` is the amount of
    /// vehicle types in the fleet.
    pub fn new(
        transport: Arc<dyn TransportCost>,
        activity: Arc<dyn ActivityCost>,
        setup: Arc<dyn SetupTime>,
        vehicles: VehiclesToUpdate,
        type_count: usize,
    ) -> Self {
        Self { transport, activity, setup, vehicles, type_count }
    }
}

impl StatePropagator for SwitchFeasibilityPropagator {
    fn name(&self) -> &str {
        "switch feasibility"
    }

    fn provides(&self) -> &[StateKey] {
        &[StateKey::SwitchNotFeasible]
    }

    fn requires(&self) -> &[StateKey] {
        &[StateKey::LoadAtBeginning, StateKey::MaxLoad]
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let route = route_ctx.route();
        let state = route_ctx.state();

        let load_at_beginning = state.get_load_at_beginning().copied().unwrap_or_default();
        let max_load = state.get_max_load().copied().unwrap_or(load_at_beginning);

        let mut not_feasible = vec![None; self.type_count];
        let mut scratch = vec![VehicleScratch::default(); self.type_count];

        let mut candidates = (self.vehicles)(route)
            .into_iter()
            .filter(|actor| {
                let is_load_feasible = is_load_feasible(actor, &load_at_beginning, &max_load);
                not_feasible[actor.type_index] = Some(!is_load_feasible);

                is_load_feasible
            })
            .inspect(|actor| {
                scratch[actor.type_index] = VehicleScratch {
                    latest_ready_at_prev: actor.detail.time.end,
                    location_of_prev: actor.detail.end.unwrap_or_else(|| route.tour.last_location()),
                    setup_of_prev: 0.,
                }
            })
            .collect::<Vec<_>>();

        for activity in route.tour.job_activities().rev() {
            if candidates.is_empty() {
                break;
            }

            candidates.retain(|actor| {
                let actor_ref = actor.as_ref();
                let prev = &mut scratch[actor.type_index];
                let location = activity.place.location;

                let setup = self.setup.setup_time(actor_ref, location, prev.location_of_prev, prev.setup_of_prev);
                let latest_arrival_at_prev = prev.latest_ready_at_prev - setup;
                let transport = self.transport.duration(
                    actor_ref,
                    location,
                    prev.location_of_prev,
                    TravelTime::Arrival(latest_arrival_at_prev),
                );
                let duration = self.activity.duration(actor_ref, activity, latest_arrival_at_prev);
                let latest = activity.place.time.end.min(latest_arrival_at_prev - transport - duration);

                if latest < activity.place.time.start {
                    not_feasible[actor.type_index] = Some(true);
                    return false;
                }

                *prev = VehicleScratch {
                    latest_ready_at_prev: latest,
                    location_of_prev: location,
                    setup_of_prev: activity.setup,
                };

                true
            });
        }

        let state = route_ctx.state_mut();
        not_feasible
            .into_iter()
            .enumerate()
            .filter_map(|(type_idx, value)| value.map(|value| (type_idx, value)))
            .for_each(|(type_idx, value)| state.set_switch_not_feasible(type_idx, value));
    }
}

fn is_load_feasible(actor: &Actor, load_at_beginning: &Capacity, max_load: &Capacity) -> bool {
    let vehicle = actor.vehicle.as_ref();
    let is_initial_load_fit = match &vehicle.loading {
        LoadingRegime::FixedInitialLoad(initial) => load_at_beginning.is_less_or_equal(initial),
        LoadingRegime::DepotBalanced => true,
    };

    is_initial_load_fit && max_load.is_less_or_equal(&vehicle.capacity)
}

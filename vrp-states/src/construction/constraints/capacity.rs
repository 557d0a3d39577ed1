#[cfg(test)]
#[path = "../../../tests/unit/construction/constraints/capacity_test.rs"]
mod capacity_test;

use super::*;
use crate::construction::states::*;
use crate::models::common::Capacity;
use crate::models::problem::LoadingRegime;
use crate::models::solution::ActivityKind;

/// Checks that vehicle capacity is not exceeded and load never becomes negative when activity
/// is inserted. Uses load states at previous activity, so the check does not depend on route length.
///
/// When the vehicle is loaded at the depot on demand, a violation can be absorbed by changing the
/// depot load. While shipment cargo is on board at insertion point, the inserted activity is also
/// checked against the shipment load: a fixed load has to keep room for it (pickup) or keep
/// covering it (delivery), a depot load is first shifted within the slack left by the route before
/// insertion point.
#[derive(Default)]
pub struct LoadConstraint {}

/// Load states observed at insertion point.
struct LoadSnapshot {
    load_at_depot: Capacity,
    current: Capacity,
    past_max: Capacity,
    past_min: Capacity,
    future_max: Capacity,
    future_min: Capacity,
    shipment: Capacity,
}

impl HardActivityConstraint for LoadConstraint {
    fn evaluate_activity(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        let vehicle = insertion_ctx.actor.vehicle.as_ref();
        let capacity = &vehicle.capacity;
        let size = activity_ctx.target.size;
        let zero = Capacity::default();

        let loads = get_load_snapshot(insertion_ctx, activity_ctx.index, &vehicle.loading);
        let is_depot_balanced = vehicle.loading == LoadingRegime::DepotBalanced;

        match activity_ctx.target.kind {
            ActivityKind::Pickup | ActivityKind::Service => {
                let excess = get_excess(loads.future_max + size, capacity);
                if excess.is_not_empty() {
                    let can_absorb = is_depot_balanced
                        && (loads.load_at_depot - excess).is_greater_or_equal(&zero)
                        && (loads.past_min - excess).is_greater_or_equal(&zero);

                    if !can_absorb {
                        return ConstraintStatus::NotFulfilled;
                    }
                }

                let is_shipment_violated = if is_depot_balanced {
                    let depot_slack = loads.load_at_depot - loads.past_min;
                    !(loads.current + size - depot_slack).is_less_or_equal(&loads.shipment)
                } else {
                    !capacity.can_fit(&(loads.current + size))
                };

                if loads.shipment.has_positive() && is_shipment_violated {
                    return ConstraintStatus::NotFulfilled;
                }

                ConstraintStatus::Fulfilled
            }
            ActivityKind::Delivery => {
                let deficit = get_deficit(loads.future_min + size);
                if deficit.is_not_empty() {
                    let can_absorb = is_depot_balanced
                        && (loads.load_at_depot + deficit).is_less_or_equal(capacity)
                        && (loads.past_max + deficit).is_less_or_equal(capacity);

                    if !can_absorb {
                        return ConstraintStatus::NotFulfilled;
                    }
                }

                let is_shipment_violated = if is_depot_balanced {
                    let depot_slack = loads.past_max - loads.load_at_depot;
                    !(loads.current + size + depot_slack).is_greater_or_equal(&loads.shipment)
                } else {
                    !(loads.current + size).is_greater_or_equal(&loads.shipment)
                };

                if loads.shipment.has_positive() && is_shipment_violated {
                    return ConstraintStatus::NotFulfilled;
                }

                ConstraintStatus::Fulfilled
            }
            ActivityKind::PickupShipment => {
                if capacity.can_fit(&(loads.current + size)) {
                    ConstraintStatus::Fulfilled
                } else {
                    ConstraintStatus::NotFulfilled
                }
            }
            ActivityKind::DeliverShipment => {
                if (loads.current - size).is_less_or_equal(capacity) {
                    ConstraintStatus::Fulfilled
                } else {
                    ConstraintStatus::NotFulfilledBreak
                }
            }
            ActivityKind::Start | ActivityKind::End => ConstraintStatus::Fulfilled,
        }
    }
}

fn get_load_snapshot(insertion_ctx: &InsertionContext, index: usize, loading: &LoadingRegime) -> LoadSnapshot {
    let state = insertion_ctx.route_ctx.state();
    let (load_at_depot, _) = get_load_aggregates(state, loading);

    let current = state.get_current_load_at(index).copied().unwrap_or(load_at_depot);
    let get_or_current = |value: Option<&Capacity>| value.copied().unwrap_or(current);

    LoadSnapshot {
        load_at_depot,
        current,
        past_max: get_or_current(state.get_past_max_load_at(index)),
        past_min: get_or_current(state.get_past_min_load_at(index)),
        future_max: get_or_current(state.get_future_max_load_at(index)),
        future_min: get_or_current(state.get_future_min_load_at(index)),
        shipment: state.get_cumulative_shipment_load_at(index).copied().unwrap_or_default(),
    }
}

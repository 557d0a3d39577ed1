#[cfg(test)]
#[path = "../../tests/unit/refinement/ruin_test.rs"]
mod ruin_test;

use crate::construction::heuristics::RouteContext;
use crate::construction::states::*;
use crate::models::common::Capacity;
use crate::models::problem::{Job, Jobs, LoadingRegime};
use std::sync::Arc;

/// Removes the job from the route which contains it if the removal keeps the route feasible.
/// On success, route states are recalculated.
///
/// Returns false when the job is not a part of the problem (such jobs are treated as initial
/// and cannot be ruined), when no route contains it, or when the removal is not feasible.
pub fn check_removal(jobs: &Jobs, pipeline: &StatePipeline, job: &Arc<Job>, routes: &mut [RouteContext]) -> bool {
    if !jobs.contains(job) {
        tracing::trace!(job = %job.id, "job is not removable: not a part of the problem");
        return false;
    }

    let Some(route_ctx) = routes.iter_mut().find(|route_ctx| route_ctx.route().tour.contains(job)) else {
        tracing::trace!(job = %job.id, "job is not removable: no route contains it");
        return false;
    };

    if route_ctx.is_stale() {
        pipeline.recalculate_states(route_ctx);
    }

    if !is_removal_feasible(route_ctx, job) {
        tracing::trace!(job = %job.id, vehicle = %route_ctx.route().actor.vehicle.id, "job removal is not feasible");
        return false;
    }

    route_ctx.route_mut().tour.remove_job(job);
    pipeline.recalculate_states(route_ctx);

    tracing::trace!(job = %job.id, vehicle = %route_ctx.route().actor.vehicle.id, "job is removed");

    true
}

/// Checks whether the job can be removed from the route using load states of the route only.
///
/// Removing a pickup (or a service) lowers the load on the rest of the route, so the future
/// minimum load has to stay non-negative. Removing a delivery raises it, so the future maximum
/// load has to stay within capacity. When the vehicle is loaded at the depot on demand, the
/// violation can be absorbed by changing the depot load.
///
/// A pickup which precedes shipment cargo claimed further down the route has to leave enough load
/// for it: a fixed load must still cover the claim, a depot load cannot be rebalanced around it.
/// Shipments are always removable as they keep load balanced.
pub fn is_removal_feasible(route_ctx: &RouteContext, job: &Arc<Job>) -> bool {
    let route = route_ctx.route();
    let Some(index) = route.tour.index_of(job) else { return false };

    if job.is_shipment() {
        return true;
    }

    let state = route_ctx.state();
    let vehicle = route.actor.vehicle.as_ref();
    let capacity = &vehicle.capacity;
    let is_depot_balanced = vehicle.loading == LoadingRegime::DepotBalanced;
    let zero = Capacity::default();
    let size = job.size;

    let (load_at_depot, _) = get_load_aggregates(state, &vehicle.loading);
    let current = state.get_current_load_at(index).copied().unwrap_or(load_at_depot);
    let get_or = |value: Option<&Capacity>, default: Capacity| value.copied().unwrap_or(default);

    if job.is_delivery() {
        let future_max = get_or(state.get_future_max_load_at(index), current);
        let excess = get_excess(future_max + size, capacity);
        if !excess.is_not_empty() {
            return true;
        }

        let past_min = get_or(state.get_past_min_load_at(index - 1), load_at_depot);

        is_depot_balanced
            && (load_at_depot - excess).is_greater_or_equal(&zero)
            && (past_min - excess).is_greater_or_equal(&zero)
    } else {
        let future_min = get_or(state.get_future_min_load_at(index), current);
        let deficit = get_deficit(future_min - size);
        if deficit.is_not_empty() {
            let past_max = get_or(state.get_past_max_load_at(index - 1), load_at_depot);
            let can_absorb = is_depot_balanced
                && (load_at_depot + deficit).is_less_or_equal(capacity)
                && (past_max + deficit).is_less_or_equal(capacity);

            if !can_absorb {
                return false;
            }
        }

        let shipment_claim = get_or(state.get_future_max_shipment_load_at(index), zero);
        if !shipment_claim.has_positive() {
            return true;
        }

        !is_depot_balanced && (current - size).is_greater_or_equal(&shipment_claim)
    }
}

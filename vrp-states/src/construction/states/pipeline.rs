#[cfg(test)]
#[path = "../../../tests/unit/construction/states/pipeline_test.rs"]
mod pipeline_test;

use super::{StateKey, StatePropagator};
use crate::construction::heuristics::RouteContext;
use crate::models::problem::Job;
use crate::utils::StateError;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// An ordered list of state propagators. Order is validated on construction: a propagator can
/// require only keys provided by propagators placed before it.
pub struct StatePipeline {
    propagators: Vec<Arc<dyn StatePropagator>>,
}

impl StatePipeline {
    /// Creates a new instance of `StatePipeline`.
    pub fn new(propagators: Vec<Arc<dyn StatePropagator>>) -> Result<Self, StateError> {
        let mut provided: FxHashMap<StateKey, &str> = FxHashMap::default();

        for (position, propagator) in propagators.iter().enumerate() {
            let name = propagator.name();
            if name.is_empty() {
                return Err(StateError::EmptyName(position));
            }

            if let Some(key) = propagator.requires().iter().find(|key| !provided.contains_key(*key)) {
                return Err(StateError::MissingDependency { propagator: name.to_string(), key: *key });
            }

            for key in propagator.provides() {
                if let Some(first) = provided.insert(*key, name) {
                    return Err(StateError::DuplicateKey {
                        key: *key,
                        first: first.to_string(),
                        second: name.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            propagators = ?propagators.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "state pipeline is created"
        );

        Ok(Self { propagators })
    }

    /// Recalculates all states of the route from scratch and marks it as fresh.
    pub fn recalculate_states(&self, route_ctx: &mut RouteContext) {
        route_ctx.state_mut().clear();

        self.propagators.iter().for_each(|propagator| propagator.accept_insertion_start(route_ctx));
        self.propagators.iter().for_each(|propagator| propagator.accept_route_state(route_ctx));

        route_ctx.mark_stale(false);

        tracing::trace!(vehicle = %route_ctx.route().actor.vehicle.id, "route states are recalculated");
    }

    /// Accepts insertion of the job into the route: route aggregates are updated incrementally,
    /// then activity states are refreshed by walking the route.
    pub fn accept_insertion(&self, route_ctx: &mut RouteContext, job: &Arc<Job>) {
        self.propagators.iter().for_each(|propagator| propagator.accept_insertion(route_ctx, job));
        self.propagators.iter().for_each(|propagator| propagator.accept_route_state(route_ctx));

        route_ctx.mark_stale(false);

        tracing::trace!(job = %job.id, vehicle = %route_ctx.route().actor.vehicle.id, "job insertion is accepted");
    }

    /// Returns names of propagators in the order they run.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.propagators.iter().map(|propagator| propagator.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/solver/engine_test.rs"]
mod engine_test;

use crate::construction::constraints::*;
use crate::construction::heuristics::{ActivityContext, InsertionContext, RouteContext};
use crate::construction::states::*;
use crate::models::Problem;
use crate::models::common::{Cost, Duration};
use crate::models::problem::{Job, LocationSetupTime, SetupTime};
use crate::refinement::check_removal;
use crate::utils::StateError;
use rayon::prelude::*;
use std::sync::Arc;

/// Keeps route states consistent with route mutations made by the search and evaluates
/// insertion feasibility and cost using them.
pub struct StateEngine {
    problem: Arc<Problem>,
    states: StatePipeline,
    constraints: ConstraintPipeline,
}

impl StateEngine {
    /// Returns the problem which engine is built for.
    pub fn problem(&self) -> &Problem {
        self.problem.as_ref()
    }

    /// Returns the state pipeline.
    pub fn states(&self) -> &StatePipeline {
        &self.states
    }

    /// Recalculates all states of the route.
    pub fn recalculate_states(&self, route_ctx: &mut RouteContext) {
        self.states.recalculate_states(route_ctx);
    }

    /// Recalculates states of all routes when insertion phase starts. Routes are processed in
    /// parallel.
    pub fn inform_insertion_starts(&self, routes: &mut [RouteContext], unassigned: &[Arc<Job>]) {
        tracing::debug!(routes = routes.len(), unassigned = unassigned.len(), "insertion starts");

        routes.par_iter_mut().for_each(|route_ctx| self.states.recalculate_states(route_ctx));
    }

    /// Accepts the job which activities are already inserted into the route.
    pub fn inform_job_inserted(
        &self,
        job: &Arc<Job>,
        route_ctx: &mut RouteContext,
        additional_cost: Cost,
        additional_time: Duration,
    ) {
        self.states.accept_insertion(route_ctx, job);

        tracing::trace!(job = %job.id, additional_cost, additional_time, "job is inserted");
    }

    /// Removes the job from the route which contains it if removal is feasible.
    /// See [`check_removal`].
    pub fn check_removal(&self, job: &Arc<Job>, routes: &mut [RouteContext]) -> bool {
        check_removal(self.problem.jobs.as_ref(), &self.states, job, routes)
    }

    /// Checks hard constraints of activity insertion.
    pub fn fulfilled(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        self.constraints.evaluate_hard_activity(insertion_ctx, activity_ctx)
    }

    /// Estimates cost of activity insertion.
    pub fn get_costs(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> Cost {
        self.constraints.evaluate_soft_activity(insertion_ctx, activity_ctx)
    }
}

/// Provides a way to build [`StateEngine`] with default propagators and constraints.
pub struct StateEngineBuilder {
    problem: Arc<Problem>,
    policy: ActivityPolicy,
    reverse_policy: ActivityPolicy,
    vehicles: Option<VehiclesToUpdate>,
    setup: Arc<dyn SetupTime>,
    propagators: Vec<Arc<dyn StatePropagator>>,
    hard_constraints: Vec<Arc<dyn HardActivityConstraint>>,
    soft_constraints: Vec<Arc<dyn SoftActivityConstraint>>,
}

impl StateEngineBuilder {
    /// Creates a new instance of `StateEngineBuilder`.
    pub fn new(problem: Arc<Problem>) -> Self {
        Self {
            problem,
            policy: ActivityPolicy::default(),
            reverse_policy: ActivityPolicy::default(),
            vehicles: None,
            setup: Arc::new(LocationSetupTime::default()),
            propagators: vec![],
            hard_constraints: vec![],
            soft_constraints: vec![],
        }
    }

    /// Sets activity policy used by forward schedule propagation.
    pub fn set_policy(mut self, policy: ActivityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets activity policy used by reverse schedule propagation.
    pub fn set_reverse_policy(mut self, policy: ActivityPolicy) -> Self {
        self.reverse_policy = policy;
        self
    }

    /// Sets vehicles which vehicle dependent states are computed for.
    /// Default is route's own vehicle only.
    pub fn set_vehicles(mut self, vehicles: VehiclesToUpdate) -> Self {
        self.vehicles = Some(vehicles);
        self
    }

    /// Sets setup time model. Default is [`LocationSetupTime`].
    pub fn set_setup(mut self, setup: Arc<dyn SetupTime>) -> Self {
        self.setup = setup;
        self
    }

    /// Adds a custom propagator which runs after the default ones.
    pub fn add_propagator(mut self, propagator: Arc<dyn StatePropagator>) -> Self {
        self.propagators.push(propagator);
        self
    }

    /// Adds a custom hard constraint which is evaluated after the default ones.
    pub fn add_hard_constraint(mut self, constraint: Arc<dyn HardActivityConstraint>) -> Self {
        self.hard_constraints.push(constraint);
        self
    }

    /// Adds a custom soft constraint.
    pub fn add_soft_constraint(mut self, constraint: Arc<dyn SoftActivityConstraint>) -> Self {
        self.soft_constraints.push(constraint);
        self
    }

    /// Builds the engine. Fails if propagators' dependencies cannot be satisfied.
    pub fn build(self) -> Result<StateEngine, StateError> {
        let transport = self.problem.transport.clone();
        let activity = self.problem.activity.clone();
        let fleet = self.problem.fleet.clone();
        let vehicles = self.vehicles.unwrap_or_else(route_vehicle);

        let defaults: Vec<Arc<dyn StatePropagator>> = vec![
            Arc::new(SchedulePropagator::new(transport.clone(), activity.clone(), self.setup.clone(), self.policy)),
            Arc::new(ReverseSchedulePropagator::new(transport.clone(), activity.clone(), self.reverse_policy)),
            Arc::new(LatenessPropagator::default()),
            Arc::new(LoadPropagator::default()),
            Arc::new(LatestStartPropagator::new(
                transport.clone(),
                activity.clone(),
                self.setup.clone(),
                vehicles.clone(),
            )),
            Arc::new(SwitchFeasibilityPropagator::new(
                transport.clone(),
                activity.clone(),
                self.setup.clone(),
                vehicles,
                fleet.type_count(),
            )),
        ];

        let states = StatePipeline::new(defaults.into_iter().chain(self.propagators).collect())?;

        let mut constraints = ConstraintPipeline::default();
        constraints
            .add_hard(Arc::new(LoadConstraint::default()))
            .add_hard(Arc::new(TimeWindowConstraint::new(transport.clone(), activity.clone(), self.setup.clone())))
            .add_soft(Arc::new(TransportCostConstraint::new(transport, activity, self.setup)));

        self.hard_constraints.into_iter().for_each(|constraint| {
            constraints.add_hard(constraint);
        });
        self.soft_constraints.into_iter().for_each(|constraint| {
            constraints.add_soft(constraint);
        });

        Ok(StateEngine { problem: self.problem, states, constraints })
    }
}

use super::*;
use crate::construction::heuristics::RouteState;
use crate::helpers::construction::*;
use crate::helpers::models::problem::*;
use crate::models::common::{Capacity, Schedule};
use crate::models::problem::Fleet;

struct VisitsKey;

struct VisitsPropagator {
    provides: Vec<StateKey>,
    requires: Vec<StateKey>,
}

impl VisitsPropagator {
    fn new_shared(provides: Vec<StateKey>, requires: Vec<StateKey>) -> Arc<dyn StatePropagator> {
        Arc::new(Self { provides, requires })
    }
}

impl StatePropagator for VisitsPropagator {
    fn name(&self) -> &str {
        "visits"
    }

    fn provides(&self) -> &[StateKey] {
        self.provides.as_slice()
    }

    fn requires(&self) -> &[StateKey] {
        self.requires.as_slice()
    }

    fn accept_route_state(&self, route_ctx: &mut RouteContext) {
        let visits = route_ctx.state().get_schedule_states().map_or(0, |schedules| schedules.len());
        route_ctx.state_mut().set_tour_state::<VisitsKey, _>(visits);
    }
}

struct RejectAllConstraint;

impl HardActivityConstraint for RejectAllConstraint {
    fn evaluate_activity(&self, _: &InsertionContext, _: &ActivityContext) -> ConstraintStatus {
        ConstraintStatus::NotFulfilled
    }
}

struct FixedCostConstraint(Cost);

impl SoftActivityConstraint for FixedCostConstraint {
    fn estimate_activity(&self, _: &InsertionContext, _: &ActivityContext) -> Cost {
        self.0
    }
}

fn insert_job(engine: &StateEngine, route_ctx: &mut RouteContext, job: &Arc<Job>) {
    job.to_activities().into_iter().for_each(|activity| {
        route_ctx.route_mut().tour.insert_last(activity);
    });
    engine.inform_job_inserted(job, route_ctx, 0., 0.);
}

fn create_fleet_with_vehicles(amount: usize) -> Fleet {
    FleetBuilder::default()
        .add_vehicles((0..amount).map(|idx| VehicleBuilder::default().id(&format!("v{}", idx + 1)).build()).collect())
        .build()
}

#[test]
fn can_evaluate_and_accept_insertion() {
    let jobs = vec![JobBuilder::service(10).build(), JobBuilder::delivery(20).size(2).build()];
    let problem = create_test_problem(test_fleet(), jobs.clone());
    let engine = create_test_engine(problem.clone());
    let mut routes = vec![RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"))];

    engine.inform_insertion_starts(routes.as_mut_slice(), jobs.as_slice());
    assert!(!routes[0].is_stale());

    let target = jobs[0].to_activities().remove(0);
    let insertion_ctx = InsertionContext::new(&routes[0], &jobs[0]);
    let activity_ctx = create_activity_ctx(&routes[0], &target, 0);
    assert_eq!(engine.fulfilled(&insertion_ctx, &activity_ctx), ConstraintStatus::Fulfilled);
    assert_float_eq!(engine.get_costs(&insertion_ctx, &activity_ctx), 40.);

    insert_job(&engine, &mut routes[0], &jobs[0]);
    assert!(!routes[0].is_stale());
    assert_eq!(routes[0].state().get_schedule_states().map(|schedules| schedules.len()), Some(3));
    assert_eq!(routes[0].state().get_load_at_beginning().map(|load| load.get(0)), Some(0));

    insert_job(&engine, &mut routes[0], &jobs[1]);
    assert_eq!(routes[0].state().get_load_at_beginning().map(|load| load.get(0)), Some(1));
    assert_eq!(routes[0].state().get_load_at_end().map(|load| load.get(0)), Some(0));
}

#[test]
fn can_remove_inserted_job() {
    let jobs = vec![JobBuilder::service(10).build(), JobBuilder::delivery(20).size(2).build()];
    let problem = create_test_problem(test_fleet(), jobs.clone());
    let engine = create_test_engine(problem.clone());
    let mut routes = vec![RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"))];
    engine.inform_insertion_starts(routes.as_mut_slice(), jobs.as_slice());
    jobs.iter().for_each(|job| insert_job(&engine, &mut routes[0], job));

    assert!(engine.check_removal(&jobs[1], routes.as_mut_slice()));

    assert_eq!(routes[0].route().tour.job_count(), 1);
    assert_eq!(routes[0].state().get_load_at_beginning().map(|load| load.get(0)), Some(0));
    assert!(!engine.check_removal(&jobs[1], routes.as_mut_slice()));
}

fn get_state_snapshot(route_ctx: &RouteContext) -> (Vec<Schedule>, Vec<Capacity>, Option<Capacity>, Vec<Option<f64>>) {
    let state = route_ctx.state();
    let type_idx = route_ctx.route().actor.type_index;

    (
        state.get_schedule_states().cloned().unwrap_or_default(),
        state.get_current_load_states().cloned().unwrap_or_default(),
        state.get_load_at_beginning().copied(),
        (0..route_ctx.route().tour.total())
            .map(|idx| state.get_latest_operation_start_time_at(type_idx, idx).copied())
            .collect(),
    )
}

#[test]
fn can_restore_states_after_insertion_and_removal() {
    let jobs = vec![JobBuilder::service(10).build(), JobBuilder::delivery(30).size(2).build()];
    let pickup = JobBuilder::pickup(20).size(3).build();
    let all_jobs = jobs.iter().cloned().chain(std::iter::once(pickup.clone())).collect();
    let problem = create_test_problem(test_fleet(), all_jobs);
    let engine = create_test_engine(problem.clone());
    let mut routes = vec![RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"))];
    engine.inform_insertion_starts(routes.as_mut_slice(), jobs.as_slice());
    jobs.iter().for_each(|job| insert_job(&engine, &mut routes[0], job));
    let original = get_state_snapshot(&routes[0]);

    routes[0].route_mut().tour.insert_at(pickup.to_activities().remove(0), 2);
    engine.inform_job_inserted(&pickup, &mut routes[0], 0., 0.);
    assert_ne!(get_state_snapshot(&routes[0]), original);
    assert!(engine.check_removal(&pickup, routes.as_mut_slice()));

    assert_eq!(get_state_snapshot(&routes[0]), original);
}

#[test]
fn can_recalculate_many_routes_in_parallel() {
    let fleet = create_fleet_with_vehicles(8);
    let jobs = (0..8).map(|idx| JobBuilder::service(10 * (idx + 1)).build()).collect::<Vec<_>>();
    let problem = create_test_problem(fleet, jobs.clone());
    let engine = create_test_engine(problem.clone());
    let mut routes = problem
        .fleet
        .actors
        .iter()
        .zip(jobs.iter())
        .map(|(actor, job)| {
            let mut route_ctx = RouteContext::new(actor.clone());
            route_ctx.route_mut().tour.insert_last(job.to_activities().remove(0));
            route_ctx
        })
        .collect::<Vec<_>>();
    assert!(routes.iter().all(|route_ctx| route_ctx.is_stale()));

    engine.inform_insertion_starts(routes.as_mut_slice(), &[]);

    routes.iter().enumerate().for_each(|(idx, route_ctx)| {
        assert!(!route_ctx.is_stale());
        assert_eq!(route_ctx.state().get_schedule_at(1).map(|schedule| schedule.arrival), Some(10. * (idx + 1) as f64));
    });
}

#[test]
fn can_run_custom_propagator_after_default_ones() {
    let problem = create_test_problem(test_fleet(), vec![]);
    let engine = StateEngineBuilder::new(problem.clone())
        .add_propagator(VisitsPropagator::new_shared(vec![StateKey::Custom("visits")], vec![StateKey::Schedules]))
        .build()
        .expect("cannot build engine");
    let mut route_ctx = RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"));

    engine.recalculate_states(&mut route_ctx);

    assert_eq!(engine.states().names().last(), Some("visits"));
    assert_eq!(route_ctx.state().get_tour_state::<VisitsKey, usize>(), Some(&2));
}

parameterized_test! {can_fail_to_build_with_inconsistent_propagator, (provides, requires, expected), {
    let problem = create_test_problem(test_fleet(), vec![]);

    let propagator = VisitsPropagator::new_shared(provides, requires);

    let result = StateEngineBuilder::new(problem).add_propagator(propagator).build();

    assert_eq!(result.err(), Some(expected));
}}

can_fail_to_build_with_inconsistent_propagator! {
    case01_duplicate_key: (vec![StateKey::Schedules], vec![], StateError::DuplicateKey {
        key: StateKey::Schedules,
        first: "schedule".to_string(),
        second: "visits".to_string(),
    }),
    case02_missing_dependency: (vec![], vec![StateKey::Custom("unknown")], StateError::MissingDependency {
        propagator: "visits".to_string(),
        key: StateKey::Custom("unknown"),
    }),
}

#[test]
fn can_use_custom_constraints() {
    let job = JobBuilder::service(10).build();
    let problem = create_test_problem(test_fleet(), vec![job.clone()]);
    let engine = StateEngineBuilder::new(problem.clone())
        .add_hard_constraint(Arc::new(RejectAllConstraint))
        .add_soft_constraint(Arc::new(FixedCostConstraint(5.)))
        .build()
        .expect("cannot build engine");
    let mut route_ctx = RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"));
    engine.recalculate_states(&mut route_ctx);

    let target = job.to_activities().remove(0);
    let insertion_ctx = InsertionContext::new(&route_ctx, &job);
    let activity_ctx = create_activity_ctx(&route_ctx, &target, 0);

    assert_eq!(engine.fulfilled(&insertion_ctx, &activity_ctx), ConstraintStatus::NotFulfilled);
    assert_float_eq!(engine.get_costs(&insertion_ctx, &activity_ctx), 45.);
}

parameterized_test! {can_use_activity_policy, (policy, expected_start), {
    let job = JobBuilder::service(20).time(50., 100.).build();
    let problem = create_test_problem(test_fleet(), vec![job.clone()]);
    let engine = StateEngineBuilder::new(problem.clone()).set_policy(policy).build().expect("cannot build engine");
    let mut route_ctx = RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"));
    route_ctx.route_mut().tour.insert_last(job.to_activities().remove(0));

    engine.recalculate_states(&mut route_ctx);

    assert_eq!(route_ctx.state().get_schedule_at(1).map(|schedule| schedule.start), Some(expected_start));
}}

can_use_activity_policy! {
    case01_wait_for_time_window: (ActivityPolicy::AsSoonAsTimeWindowOpens, 50.),
    case02_start_as_arrived: (ActivityPolicy::AsSoonAsArrived, 20.),
}

#[test]
fn can_compute_states_for_all_vehicle_types() {
    let problem = create_test_problem(create_fleet_with_vehicles(2), vec![]);
    let engine = StateEngineBuilder::new(problem.clone())
        .set_vehicles(all_vehicles(problem.fleet.clone()))
        .build()
        .expect("cannot build engine");
    let mut route_ctx = RouteContext::new(get_test_actor_from_fleet(&problem.fleet, "v1"));
    let other_type_idx = get_test_actor_from_fleet(&problem.fleet, "v2").type_index;

    engine.recalculate_states(&mut route_ctx);

    assert_eq!(problem.fleet.type_count(), 2);
    assert_eq!(route_ctx.state().get_switch_not_feasible(other_type_idx), Some(&false));
}

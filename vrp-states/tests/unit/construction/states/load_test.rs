use super::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;
use rand::prelude::*;

fn create_load_pipeline() -> StatePipeline {
    let propagators: Vec<Arc<dyn StatePropagator>> = vec![Arc::new(LoadPropagator::default())];
    StatePipeline::new(propagators).expect("cannot create pipeline")
}

/// Positive size creates a pickup, negative a delivery.
fn create_job_with_size(size: i32) -> Arc<Job> {
    if size >= 0 {
        JobBuilder::pickup(size as usize).size(size).build()
    } else {
        JobBuilder::delivery(-size as usize).size(-size).build()
    }
}

fn create_route_ctx_with_sizes(loading: LoadingRegime, sizes: &[i32]) -> RouteContext {
    let fleet = FleetBuilder::default().add_vehicle(VehicleBuilder::default().loading(loading).build()).build();
    let jobs = sizes.iter().map(|size| create_job_with_size(*size)).collect::<Vec<_>>();
    let route = RouteBuilder::default().with_vehicle(&fleet, "v1").add_jobs(&jobs).build();

    let mut route_ctx = RouteContext::new_with_state(route, RouteState::default());
    create_load_pipeline().recalculate_states(&mut route_ctx);

    route_ctx
}

fn get_values(values: Option<&Vec<Capacity>>) -> Vec<i32> {
    values.expect("no states").iter().map(|load| load.get(0)).collect()
}

fn get_aggregates(route_ctx: &RouteContext) -> (i32, i32) {
    let state = route_ctx.state();
    (
        state.get_load_at_beginning().expect("no load at beginning").get(0),
        state.get_load_at_end().expect("no load at end").get(0),
    )
}

parameterized_test! {can_calculate_current_loads, (loading, sizes, expected_loads), {
    let route_ctx = create_route_ctx_with_sizes(loading, sizes.as_slice());

    let loads = get_values(route_ctx.state().get_current_load_states());

    assert_eq!(loads, expected_loads);
    assert_eq!(get_aggregates(&route_ctx), (expected_loads[0], expected_loads[expected_loads.len() - 1]));
}}

can_calculate_current_loads! {
    case01_fixed_mixed: (LoadingRegime::FixedInitialLoad(Capacity::single(3)), vec![-2, 4, -1], vec![3, 1, 5, 4, 4]),
    case02_depot_mixed: (LoadingRegime::DepotBalanced, vec![-2, 4, -1], vec![2, 0, 4, 3, 3]),
    case03_depot_late_delivery: (LoadingRegime::DepotBalanced, vec![3, -5], vec![2, 5, 0, 0]),
    case04_depot_deliveries: (LoadingRegime::DepotBalanced, vec![-1, -2], vec![3, 2, 0, 0]),
    case05_depot_pickups: (LoadingRegime::DepotBalanced, vec![1, 2], vec![0, 1, 3, 3]),
    case06_empty: (LoadingRegime::DepotBalanced, vec![], vec![0, 0]),
}

#[test]
fn can_calculate_extremal_loads() {
    let route_ctx = create_route_ctx_with_sizes(LoadingRegime::FixedInitialLoad(Capacity::single(3)), &[-2, 4, -1]);
    let state = route_ctx.state();

    assert_eq!(get_values(state.get_past_max_load_states()), vec![3, 3, 5, 5, 5]);
    assert_eq!(get_values(state.get_past_min_load_states()), vec![3, 1, 1, 1, 1]);
    assert_eq!(get_values(state.get_future_max_load_states()), vec![5, 5, 5, 4, 4]);
    assert_eq!(get_values(state.get_future_min_load_states()), vec![1, 1, 4, 4, 4]);
    assert_eq!(state.get_max_load().map(|load| load.get(0)), Some(5));
}

#[test]
fn can_track_shipment_loads() {
    let shipment = JobBuilder::shipment(10, 30).size(2).build();
    let mut activities = shipment.to_activities().into_iter();
    let route = RouteBuilder::default()
        .add_activity(activities.next().expect("no pickup"))
        .add_job(&JobBuilder::service(20).build())
        .add_activity(activities.next().expect("no delivery"))
        .build();
    let mut route_ctx = RouteContext::new_with_state(route, RouteState::default());

    create_load_pipeline().recalculate_states(&mut route_ctx);

    let state = route_ctx.state();
    assert_eq!(get_values(state.get_cumulative_shipment_load_states()), vec![0, 2, 2, 0, 0]);
    assert_eq!(get_values(state.get_future_max_shipment_load_states()), vec![2, 2, 2, 0, 0]);
    assert_eq!(get_values(state.get_current_load_states()), vec![0, 2, 3, 1, 1]);
}

#[test]
fn can_balance_each_dimension_separately() {
    let fleet =
        FleetBuilder::default().add_vehicle(VehicleBuilder::default().capacity_dims(vec![10, 10]).build()).build();
    let jobs = vec![
        JobBuilder::delivery(10).size_dims(vec![2, 0]).build(),
        JobBuilder::pickup(20).size_dims(vec![0, 3]).build(),
        JobBuilder::delivery(30).size_dims(vec![0, 4]).build(),
    ];
    let route = RouteBuilder::default().with_vehicle(&fleet, "v1").add_jobs(&jobs).build();
    let mut route_ctx = RouteContext::new_with_state(route, RouteState::default());

    create_load_pipeline().recalculate_states(&mut route_ctx);

    let state = route_ctx.state();
    assert_eq!(state.get_load_at_beginning().map(|load| load.as_vec()), Some(vec![2, 1]));
    assert_eq!(state.get_load_at_end().map(|load| load.as_vec()), Some(vec![0, 0]));
}

parameterized_test! {can_update_aggregates_incrementally_on_append, (loading, sizes, new_size, expected), {
    let mut route_ctx = create_route_ctx_with_sizes(loading, sizes.as_slice());
    let job = create_job_with_size(new_size);

    job.to_activities().into_iter().for_each(|activity| {
        route_ctx.route_mut().tour.insert_last(activity);
    });
    create_load_pipeline().accept_insertion(&mut route_ctx, &job);

    assert_eq!(get_aggregates(&route_ctx), expected);
    assert!(!route_ctx.is_stale());

    create_load_pipeline().recalculate_states(&mut route_ctx);
    assert_eq!(get_aggregates(&route_ctx), expected);
}}

can_update_aggregates_incrementally_on_append! {
    case01_depot_delivery_covered: (LoadingRegime::DepotBalanced, vec![-2, 4], -3, (2, 1)),
    case02_depot_delivery_not_covered: (LoadingRegime::DepotBalanced, vec![-2, 4], -5, (3, 0)),
    case03_depot_pickup: (LoadingRegime::DepotBalanced, vec![-2, 4], 3, (2, 7)),
    case04_fixed_delivery: (LoadingRegime::FixedInitialLoad(Capacity::single(5)), vec![-2], -1, (5, 2)),
    case05_fixed_pickup: (LoadingRegime::FixedInitialLoad(Capacity::single(5)), vec![-2], 4, (5, 7)),
    case06_depot_empty_route: (LoadingRegime::DepotBalanced, vec![], -4, (4, 0)),
}

#[test]
fn can_shift_depot_load_by_minimal_amount_on_insertion_in_the_middle() {
    let mut route_ctx = create_route_ctx_with_sizes(LoadingRegime::DepotBalanced, &[-2, 4, -3]);
    let job = create_job_with_size(-2);

    route_ctx.route_mut().tour.insert_at(job.to_activities().remove(0), 2);
    create_load_pipeline().accept_insertion(&mut route_ctx, &job);

    assert_eq!(get_aggregates(&route_ctx), (4, 1));
    assert_eq!(get_values(route_ctx.state().get_current_load_states()), vec![4, 2, 0, 4, 1, 1]);
}

#[test]
fn can_absorb_excess_by_unloading_less_at_depot() {
    let mut route_ctx = create_route_ctx_with_sizes(LoadingRegime::DepotBalanced, &[-5, 3]);
    let job = create_job_with_size(9);

    route_ctx.route_mut().tour.insert_at(job.to_activities().remove(0), 1);
    create_load_pipeline().accept_insertion(&mut route_ctx, &job);

    assert_eq!(get_aggregates(&route_ctx), (1, 8));
    assert_eq!(get_values(route_ctx.state().get_future_max_load_states()), vec![10, 10, 8, 8, 8]);
}

#[test]
fn can_keep_minimal_non_negative_loads_for_random_routes() {
    let mut rng = StdRng::seed_from_u64(42);

    (0..50).for_each(|_| {
        let size = rng.gen_range(0..12);
        let sizes = (0..size).map(|_| rng.gen_range(-5..=5)).filter(|size| *size != 0).collect::<Vec<i32>>();
        let mut route_ctx = create_route_ctx_with_sizes(LoadingRegime::DepotBalanced, sizes.as_slice());

        let loads = get_values(route_ctx.state().get_current_load_states());
        let prefix_min = sizes.iter().scan(0, |acc, size| {
            *acc += size;
            Some(*acc)
        });
        let expected_beginning = -prefix_min.min().unwrap_or(0).min(0);

        assert_eq!(loads[0], expected_beginning, "sizes: {sizes:?}");
        assert!(loads.iter().all(|load| *load >= 0), "sizes: {sizes:?}, loads: {loads:?}");

        let state_before = get_values(route_ctx.state().get_future_min_load_states());
        create_load_pipeline().recalculate_states(&mut route_ctx);
        assert_eq!(get_values(route_ctx.state().get_future_min_load_states()), state_before);
    });
}

#[test]
fn can_match_full_recalculation_when_delivery_is_inserted_anywhere() {
    let mut rng = StdRng::seed_from_u64(7);

    (0..50).for_each(|_| {
        let size = rng.gen_range(1..10);
        let sizes = (0..size)
            .map(|_| rng.gen_range(1..=5) * if rng.gen_bool(0.5) { 1 } else { -1 })
            .collect::<Vec<i32>>();
        let mut route_ctx = create_route_ctx_with_sizes(LoadingRegime::DepotBalanced, sizes.as_slice());
        let job = create_job_with_size(-rng.gen_range(1..=5));
        let index = rng.gen_range(1..=sizes.len() + 1);

        route_ctx.route_mut().tour.insert_at(job.to_activities().remove(0), index);
        create_load_pipeline().accept_insertion(&mut route_ctx, &job);
        let incremental = get_aggregates(&route_ctx);

        create_load_pipeline().recalculate_states(&mut route_ctx);
        assert_eq!(get_aggregates(&route_ctx), incremental, "sizes: {sizes:?}, index: {index}");
    });
}

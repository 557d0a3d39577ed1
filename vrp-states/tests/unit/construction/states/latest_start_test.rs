use super::*;
use crate::helpers::construction::*;
use crate::helpers::models::problem::*;
use crate::helpers::models::solution::*;

fn create_test_jobs() -> Vec<Arc<Job>> {
    vec![JobBuilder::service(10).build(), JobBuilder::service(20).build(), JobBuilder::service(30).build()]
}

fn get_latest_starts(route_ctx: &RouteContext, type_idx: usize) -> Vec<Timestamp> {
    (1..=3)
        .map(|idx| {
            route_ctx.state().get_latest_operation_start_time_at(type_idx, idx).copied().expect("no latest start")
        })
        .collect()
}

parameterized_test! {can_calculate_latest_operation_start_times, (end_time, end_location, expected), {
    let fleet = FleetBuilder::default()
        .add_vehicle(VehicleBuilder::default().time(0., end_time).end(end_location).build())
        .build();
    let route = RouteBuilder::default().with_vehicle(&fleet, "v1").add_jobs(&create_test_jobs()).build();

    let route_ctx = create_route_ctx(&fleet, route);

    assert_eq!(get_latest_starts(&route_ctx, 0), expected);
}}

can_calculate_latest_operation_start_times! {
    case01_return_to_depot: (100., Some(0), vec![50., 60., 70.]),
    case02_return_to_depot_earlier: (60., Some(0), vec![10., 20., 30.]),
    case03_other_end_location: (100., Some(40), vec![70., 80., 90.]),
    case04_open_route: (100., None, vec![80., 90., 100.]),
}

#[test]
fn can_limit_latest_start_by_time_window_end() {
    let fleet = FleetBuilder::default().add_vehicle(VehicleBuilder::default().time(0., 100.).build()).build();
    let jobs = vec![
        JobBuilder::service(10).build(),
        JobBuilder::service(20).time(0., 25.).duration(5.).build(),
        JobBuilder::service(30).build(),
    ];
    let route = RouteBuilder::default().with_vehicle(&fleet, "v1").add_jobs(&jobs).build();

    let route_ctx = create_route_ctx(&fleet, route);

    assert_eq!(get_latest_starts(&route_ctx, 0), vec![15., 25., 70.]);
}

#[test]
fn can_calculate_latest_starts_for_other_vehicle_types() {
    let fleet = FleetBuilder::default()
        .add_vehicle(VehicleBuilder::default().id("v1").time(0., 100.).build())
        .add_vehicle(VehicleBuilder::default().id("v2").time(0., 60.).build())
        .build();
    let fleet = Arc::new(fleet);
    let other_type_idx = get_test_actor_from_fleet(&fleet, "v2").type_index;
    let route = RouteBuilder::default().with_vehicle(&fleet, "v1").add_jobs(&create_test_jobs()).build();
    let mut route_ctx = RouteContext::new_with_state(route, RouteState::default());

    create_test_pipeline_with_vehicles(&fleet, all_vehicles(fleet.clone())).recalculate_states(&mut route_ctx);

    assert_ne!(other_type_idx, route_ctx.route().actor.type_index);
    assert_eq!(get_latest_starts(&route_ctx, route_ctx.route().actor.type_index), vec![50., 60., 70.]);
    assert_eq!(get_latest_starts(&route_ctx, other_type_idx), vec![10., 20., 30.]);
}

#[test]
fn can_skip_other_vehicle_types_when_only_route_vehicle_is_requested() {
    let fleet = FleetBuilder::default()
        .add_vehicle(VehicleBuilder::default().id("v1").build())
        .add_vehicle(VehicleBuilder::default().id("v2").build())
        .build();
    let other_type_idx = get_test_actor_from_fleet(&fleet, "v2").type_index;
    let route = RouteBuilder::default().with_vehicle(&fleet, "v1").add_jobs(&create_test_jobs()).build();

    let route_ctx = create_route_ctx(&fleet, route);

    assert!(route_ctx.state().get_latest_operation_start_time_at(other_type_idx, 1).is_none());
}

//! State propagators: they walk route activities and write derived values to [`RouteState`].
//!
//! Propagators are organized into [`StatePipeline`] which runs them in the declared order. Each
//! propagator names the state keys it provides and requires, so a pipeline where some propagator
//! reads a value which is not computed before it cannot be built.

use crate::construction::heuristics::RouteContext;
use crate::models::problem::{Actor, Fleet, Job};
use crate::models::solution::Route;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod pipeline;
pub use self::pipeline::*;

mod schedule;
pub use self::schedule::*;

mod reverse;
pub use self::reverse::*;

mod lateness;
pub use self::lateness::*;

mod load;
pub use self::load::*;

mod latest_start;
pub use self::latest_start::*;

mod switch;
pub use self::switch::*;

/// Names state values produced by propagators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Forward schedules of activities.
    Schedules,
    /// Backward (latest) schedules of activities.
    ReverseSchedules,
    /// Latest departure time from the route start.
    ReverseDepartureTime,
    /// Amount of activities started outside of their soft time window.
    Lateness,
    /// Amount of activities at or after the activity which start after their soft time window.
    LateActivitiesAhead,
    /// Load at route start.
    LoadAtBeginning,
    /// Load at route end.
    LoadAtEnd,
    /// Maximum load within the route.
    MaxLoad,
    /// Load just after the activity.
    CurrentLoad,
    /// Maximum load at or before the activity.
    PastMaxLoad,
    /// Minimum load at or before the activity.
    PastMinLoad,
    /// Maximum load at or after the activity.
    FutureMaxLoad,
    /// Minimum load at or after the activity.
    FutureMinLoad,
    /// Load of shipments picked up, but not yet delivered just after the activity.
    CumulativeShipmentLoad,
    /// Maximum of cumulative shipment load at or after the activity.
    FutureMaxShipmentLoad,
    /// Latest operation start time of activity for specific vehicle type.
    LatestOperationStartTime,
    /// Whether route cannot be served by specific vehicle type.
    SwitchNotFeasible,
    /// A key introduced by user defined propagator.
    Custom(&'static str),
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StateKey::Custom(name) => write!(f, "{name}"),
            key => write!(f, "{key:?}"),
        }
    }
}

/// Specifies when activity's operation starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActivityPolicy {
    /// Operation starts when time window opens or when vehicle is ready, whatever comes later.
    #[default]
    AsSoonAsTimeWindowOpens,
    /// Operation starts as soon as vehicle is ready: time window start is ignored.
    AsSoonAsArrived,
}

/// Returns actors which route states are computed for, in addition to the route's own actor.
pub type VehiclesToUpdate = Arc<dyn Fn(&Route) -> Vec<Arc<Actor>> + Send + Sync>;

/// Creates [`VehiclesToUpdate`] which returns only route's actor.
pub fn route_vehicle() -> VehiclesToUpdate {
    Arc::new(|route: &Route| vec![route.actor.clone()])
}

/// Creates [`VehiclesToUpdate`] which returns route's actor and a representative actor of every
/// other vehicle type in the fleet.
pub fn all_vehicles(fleet: Arc<Fleet>) -> VehiclesToUpdate {
    Arc::new(move |route: &Route| {
        let mut seen = vec![false; fleet.type_count()];
        std::iter::once(&route.actor)
            .chain(fleet.actors.iter())
            .filter(|actor| !std::mem::replace(&mut seen[actor.type_index], true))
            .cloned()
            .collect()
    })
}

/// A state propagator: walks route and keeps some derived values in route state up to date.
pub trait StatePropagator: Send + Sync {
    /// Returns propagator's name, used in diagnostics.
    fn name(&self) -> &str;

    /// Returns state keys written by this propagator.
    fn provides(&self) -> &[StateKey];

    /// Returns state keys which this propagator reads and which must be provided by propagators
    /// running before it.
    fn requires(&self) -> &[StateKey] {
        &[]
    }

    /// Called once per route when insertion process starts and when route is fully recalculated.
    /// Used to compute route level aggregates from scratch.
    fn accept_insertion_start(&self, _route_ctx: &mut RouteContext) {}

    /// Called after job is inserted into the route. Used to update route level aggregates
    /// incrementally. Activity level states are refreshed by `accept_route_state` after it.
    fn accept_insertion(&self, _route_ctx: &mut RouteContext, _job: &Arc<Job>) {}

    /// Walks the route and updates its activity level states.
    fn accept_route_state(&self, route_ctx: &mut RouteContext);
}

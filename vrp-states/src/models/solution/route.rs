use crate::models::common::{Capacity, Duration, Location, TimeWindow};
use crate::models::problem::{Actor, Job};
use crate::models::solution::Tour;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Specifies a role of the activity within the route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    /// Route start pseudo activity.
    Start,
    /// Route end pseudo activity.
    End,
    /// An activity of a service job.
    Service,
    /// An activity of a pickup job.
    Pickup,
    /// An activity of a delivery job.
    Delivery,
    /// A pickup part of a shipment job.
    PickupShipment,
    /// A delivery part of a shipment job.
    DeliverShipment,
}

/// Specifies activity place.
#[derive(Clone, Debug)]
pub struct Place {
    /// Location where activity is performed.
    pub location: Location,
    /// Specifies activity's operation duration.
    pub duration: Duration,
    /// Specifies activity's hard time window: operation has to start within it.
    pub time: TimeWindow,
}

/// Represents activity which is needed to be performed.
/// Derived values, such as schedule or load, are not kept here: see route state.
#[derive(Clone)]
pub struct Activity {
    /// Activity role.
    pub kind: ActivityKind,
    /// Specifies activity details.
    pub place: Place,
    /// Soft time window: starting outside of it is penalized, but feasible.
    pub soft_time: TimeWindow,
    /// Nominal setup duration.
    pub setup: Duration,
    /// Signed size: positive for pickups, negative for deliveries.
    pub size: Capacity,
    /// A job which activity belongs to. None for start and end.
    pub job: Option<Arc<Job>>,
}

impl Activity {
    /// Creates a start activity of the route for given actor.
    pub fn new_start(actor: &Actor) -> Self {
        Self::new_depot(ActivityKind::Start, actor.detail.start, actor)
    }

    /// Creates an end activity of the route for given actor.
    pub fn new_end(actor: &Actor) -> Self {
        Self::new_depot(ActivityKind::End, actor.detail.end.unwrap_or(actor.detail.start), actor)
    }

    fn new_depot(kind: ActivityKind, location: Location, actor: &Actor) -> Self {
        Self {
            kind,
            place: Place { location, duration: 0., time: actor.detail.time.clone() },
            soft_time: actor.detail.time.clone(),
            setup: 0.,
            size: Capacity::default(),
            job: None,
        }
    }

    /// Returns true if activity increases the load.
    pub fn is_pickup_like(&self) -> bool {
        matches!(self.kind, ActivityKind::Pickup | ActivityKind::Service)
    }

    /// Returns true if activity decreases the load and is not a part of shipment.
    pub fn is_delivery(&self) -> bool {
        self.kind == ActivityKind::Delivery
    }

    /// Returns true if activity is route's end.
    pub fn is_end(&self) -> bool {
        self.kind == ActivityKind::End
    }

    /// Checks whether activity belongs to the given job.
    pub fn has_same_job(&self, job: &Arc<Job>) -> bool {
        self.job.as_ref().is_some_and(|other| Arc::ptr_eq(other, job))
    }
}

impl Debug for Activity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activity")
            .field("kind", &self.kind)
            .field("location", &self.place.location)
            .field("size", &self.size)
            .field("job", &self.job.as_ref().map(|job| job.id.as_str()))
            .finish()
    }
}

/// Represents a route: a tour performed by the actor.
pub struct Route {
    /// An actor associated within route.
    pub actor: Arc<Actor>,
    /// Specifies job tour assigned to this route.
    pub tour: Tour,
}

impl Route {
    /// Creates an empty route for the given actor.
    pub fn new(actor: Arc<Actor>) -> Self {
        let tour = Tour::new(actor.as_ref());
        Self { actor, tour }
    }

    /// Returns location where the route effectively ends: the actor's end location or, if actor
    /// doesn't return to the depot, location of the last activity.
    pub fn end_location(&self) -> Location {
        self.actor.detail.end.unwrap_or_else(|| self.tour.last_location())
    }

    /// Returns a deep copy of the route.
    pub fn deep_copy(&self) -> Self {
        Self { actor: self.actor.clone(), tour: self.tour.deep_copy() }
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("vehicle", &self.actor.vehicle.id)
            .field("activities", &self.tour.total())
            .field("jobs", &self.tour.job_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/models/problem/jobs_test.rs"]
mod jobs_test;

use crate::models::common::{Capacity, Duration, Location, TimeWindow};
use crate::models::solution::{Activity, ActivityKind, Place};
use nohash_hasher::IntMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Represents a work which has to be performed at specific location.
#[derive(Clone, Debug)]
pub struct Task {
    /// Location where work has to be performed.
    pub location: Location,
    /// Operation duration.
    pub duration: Duration,
    /// Setup duration needed when vehicle arrives from another location.
    pub setup: Duration,
    /// Hard time window.
    pub time: TimeWindow,
    /// Soft time window, defaults to the hard one.
    pub soft_time: Option<TimeWindow>,
}

/// Specifies job variants.
#[derive(Clone, Debug)]
pub enum JobVariant {
    /// Something is picked up and consumed in place: there is no matching delivery.
    Service(Task),
    /// Something is picked up and brought back to the depot.
    Pickup(Task),
    /// Something is loaded at the depot and delivered.
    Delivery(Task),
    /// Something is picked up at one place and delivered to another within the same route.
    Shipment {
        /// Pickup part.
        pickup: Task,
        /// Delivery part.
        delivery: Task,
    },
}

/// Represents a job: a unit of work assigned to a route as a whole.
pub struct Job {
    /// Job id.
    pub id: String,
    /// A dense index of the job within the problem.
    pub index: usize,
    /// Job size: it is always positive, sign is applied by activities.
    pub size: Capacity,
    /// Job variant.
    pub variant: JobVariant,
}

impl Job {
    /// Returns true if job is a pickup or a service.
    pub fn is_pickup_like(&self) -> bool {
        matches!(self.variant, JobVariant::Pickup(_) | JobVariant::Service(_))
    }

    /// Returns true if job is a delivery.
    pub fn is_delivery(&self) -> bool {
        matches!(self.variant, JobVariant::Delivery(_))
    }

    /// Returns true if job is a shipment.
    pub fn is_shipment(&self) -> bool {
        matches!(self.variant, JobVariant::Shipment { .. })
    }

    /// Creates route activities for the job with signed sizes. Shipment's pickup comes first.
    pub fn to_activities(self: &Arc<Self>) -> Vec<Activity> {
        let create = |kind: ActivityKind, task: &Task, size: Capacity| Activity {
            kind,
            place: Place { location: task.location, duration: task.duration, time: task.time.clone() },
            soft_time: task.soft_time.clone().unwrap_or_else(|| task.time.clone()),
            setup: task.setup,
            size,
            job: Some(self.clone()),
        };

        match &self.variant {
            JobVariant::Service(task) => vec![create(ActivityKind::Service, task, self.size)],
            JobVariant::Pickup(task) => vec![create(ActivityKind::Pickup, task, self.size)],
            JobVariant::Delivery(task) => vec![create(ActivityKind::Delivery, task, -self.size)],
            JobVariant::Shipment { pickup, delivery } => vec![
                create(ActivityKind::PickupShipment, pickup, self.size),
                create(ActivityKind::DeliverShipment, delivery, -self.size),
            ],
        }
    }
}

impl Debug for Job {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job").field("id", &self.id).field("index", &self.index).field("size", &self.size).finish()
    }
}

/// Stores all jobs of the original problem.
pub struct Jobs {
    jobs: Vec<Arc<Job>>,
    index: IntMap<usize, Arc<Job>>,
}

impl Jobs {
    /// Creates a new instance of `Jobs`.
    pub fn new(jobs: Vec<Arc<Job>>) -> Self {
        let index = jobs.iter().map(|job| (job.index, job.clone())).collect();
        Self { jobs, index }
    }

    /// Returns all jobs.
    pub fn all(&self) -> impl Iterator<Item = &Arc<Job>> + '_ {
        self.jobs.iter()
    }

    /// Returns job by its index.
    pub fn get(&self, index: usize) -> Option<&Arc<Job>> {
        self.index.get(&index)
    }

    /// Checks whether exactly this job belongs to the problem.
    pub fn contains(&self, job: &Arc<Job>) -> bool {
        self.index.get(&job.index).is_some_and(|known| Arc::ptr_eq(known, job))
    }

    /// Returns amount of jobs.
    pub fn size(&self) -> usize {
        self.jobs.len()
    }
}

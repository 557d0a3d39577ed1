#[cfg(test)]
#[path = "../../../tests/unit/models/solution/tour_test.rs"]
mod tour_test;

use crate::models::common::Location;
use crate::models::problem::{Actor, Job};
use crate::models::solution::Activity;
use nohash_hasher::IntSet;
use std::slice::Iter;
use std::sync::Arc;

/// Represents a tour, a smart container for jobs with their associated activities.
/// Tour always starts with start activity and ends with end activity.
pub struct Tour {
    /// Stores activities in the order they are performed.
    activities: Vec<Activity>,

    /// Stores indices of jobs present in the tour.
    jobs: IntSet<usize>,
}

impl Tour {
    /// Creates a new tour with start and end using actor properties.
    pub fn new(actor: &Actor) -> Self {
        Self { activities: vec![Activity::new_start(actor), Activity::new_end(actor)], jobs: IntSet::default() }
    }

    /// Inserts activity within its job to the end of tour, right before end activity.
    pub fn insert_last(&mut self, activity: Activity) -> &mut Tour {
        self.insert_at(activity, self.activities.len() - 1)
    }

    /// Inserts activity within its job at specified index. Index has to be between start and end.
    pub fn insert_at(&mut self, activity: Activity, index: usize) -> &mut Tour {
        assert!(index > 0 && index < self.activities.len(), "cannot insert activity at {index}");
        let job_index = activity.job.as_ref().map(|job| job.index);
        assert!(job_index.is_some(), "only job activities can be inserted");

        self.jobs.extend(job_index);
        self.activities.insert(index, activity);

        self
    }

    /// Removes job within its activities from the tour. Returns false if job is not in the tour.
    pub fn remove_job(&mut self, job: &Arc<Job>) -> bool {
        if !self.contains(job) {
            return false;
        }

        self.activities.retain(|activity| !activity.has_same_job(job));
        self.jobs.remove(&job.index);

        true
    }

    /// Returns all activities in tour.
    pub fn all_activities(&self) -> Iter<'_, Activity> {
        self.activities.iter()
    }

    /// Returns activities of jobs in tour: everything between start and end.
    pub fn job_activities(&self) -> Iter<'_, Activity> {
        self.activities[1..self.activities.len() - 1].iter()
    }

    /// Returns activity by its index in tour.
    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    /// Returns start activity in tour.
    pub fn start(&self) -> &Activity {
        &self.activities[0]
    }

    /// Returns end activity in tour.
    pub fn end(&self) -> &Activity {
        &self.activities[self.activities.len() - 1]
    }

    /// Returns location of the last activity before end.
    pub fn last_location(&self) -> Location {
        self.activities[self.activities.len() - 2].place.location
    }

    /// Checks whether job is present in tour.
    pub fn contains(&self, job: &Arc<Job>) -> bool {
        self.jobs.contains(&job.index) && self.job_activities().any(|activity| activity.has_same_job(job))
    }

    /// Returns index of the first job's activity in the tour.
    pub fn index_of(&self, job: &Arc<Job>) -> Option<usize> {
        self.activities.iter().position(|activity| activity.has_same_job(job))
    }

    /// Checks whether tour has any job.
    pub fn has_jobs(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// Returns amount of job activities.
    pub fn job_activity_count(&self) -> usize {
        self.activities.len() - 2
    }

    /// Returns amount of all activities in tour, start and end included.
    pub fn total(&self) -> usize {
        self.activities.len()
    }

    /// Returns amount of jobs in tour.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Creates a copy of the tour.
    pub fn deep_copy(&self) -> Tour {
        Tour { activities: self.activities.clone(), jobs: self.jobs.clone() }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/models/common/domain_test.rs"]
mod domain_test;

use crate::models::common::{Duration, Timestamp};
use crate::utils::compare_floats;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Represents a time window.
#[derive(Clone, Debug)]
pub struct TimeWindow {
    /// Start of time window.
    pub start: Timestamp,
    /// End of time window.
    pub end: Timestamp,
}

impl TimeWindow {
    /// Creates a new [`TimeWindow`].
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Returns unlimited time window.
    pub fn max() -> Self {
        Self { start: 0., end: Timestamp::MAX }
    }

    /// Checks whether time window has intersection with another one.
    pub fn intersects(&self, other: &Self) -> bool {
        compare_floats(self.start, other.end) != Ordering::Greater
            && compare_floats(other.start, self.end) != Ordering::Greater
    }

    /// Checks whether given time is inside the window, bounds included.
    pub fn contains(&self, time: Timestamp) -> bool {
        compare_floats(time, self.start) != Ordering::Less && compare_floats(time, self.end) != Ordering::Greater
    }

    /// Returns time window duration.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::max()
    }
}

impl PartialEq<TimeWindow> for TimeWindow {
    fn eq(&self, other: &TimeWindow) -> bool {
        compare_floats(self.start, other.start) == Ordering::Equal
            && compare_floats(self.end, other.end) == Ordering::Equal
    }
}

impl Eq for TimeWindow {}

impl Hash for TimeWindow {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let start = self.start.to_bits() as i64;
        let end = self.end.to_bits() as i64;

        start.hash(state);
        end.hash(state);
    }
}

/// Represents a schedule of an activity as it was computed by forward time propagation.
#[derive(Clone, Debug, Default)]
pub struct Schedule {
    /// Arrival time.
    pub arrival: Timestamp,
    /// Arrival time plus setup time.
    pub ready: Timestamp,
    /// Operation start time: ready time shifted according to the activity policy.
    pub start: Timestamp,
    /// Departure time, also known as end time.
    pub departure: Timestamp,
}

impl Schedule {
    /// Creates a new instance of `Schedule`.
    pub fn new(arrival: Timestamp, ready: Timestamp, start: Timestamp, departure: Timestamp) -> Self {
        Self { arrival, ready, start, departure }
    }

    /// Creates a schedule where all time points are the same.
    pub fn at(time: Timestamp) -> Self {
        Self { arrival: time, ready: time, start: time, departure: time }
    }
}

impl PartialEq<Schedule> for Schedule {
    fn eq(&self, other: &Schedule) -> bool {
        compare_floats(self.arrival, other.arrival) == Ordering::Equal
            && compare_floats(self.ready, other.ready) == Ordering::Equal
            && compare_floats(self.start, other.start) == Ordering::Equal
            && compare_floats(self.departure, other.departure) == Ordering::Equal
    }
}

impl Eq for Schedule {}

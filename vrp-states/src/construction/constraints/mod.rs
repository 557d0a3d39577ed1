//! Feasibility constraints and marginal cost estimators of activity insertion.
//!
//! Constraints are pure functions of route state and insertion context: they never mutate route
//! or its state, so they can be evaluated concurrently for a route which is not being changed.

use crate::construction::heuristics::{ActivityContext, InsertionContext};
use crate::models::common::Cost;

mod pipeline;
pub use self::pipeline::ConstraintPipeline;

mod capacity;
pub use self::capacity::LoadConstraint;

mod time_window;
pub use self::time_window::TimeWindowConstraint;

mod transport;
pub use self::transport::*;

/// Specifies result of hard activity constraint check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// Insertion is feasible.
    Fulfilled,
    /// Insertion at this position is not feasible, but other positions can be tried.
    NotFulfilled,
    /// Insertion at this and all further positions in the route is not feasible: insertion
    /// search should stop scanning the route.
    NotFulfilledBreak,
}

/// Specifies hard constraint which operates on activity level.
pub trait HardActivityConstraint: Send + Sync {
    /// Checks whether target activity can be inserted between previous and next activities.
    fn evaluate_activity(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> ConstraintStatus;
}

/// Specifies soft constraint which operates on activity level.
pub trait SoftActivityConstraint: Send + Sync {
    /// Estimates activity insertion in specific route leg.
    /// Returns cost delta: positive makes insertion less attractive, negative - more.
    fn estimate_activity(&self, insertion_ctx: &InsertionContext, activity_ctx: &ActivityContext) -> Cost;
}

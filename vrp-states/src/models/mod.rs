//! A collection of models to represent problem and solution in Vehicle Routing Problem domain.

pub mod common;
pub mod problem;
pub mod solution;

use crate::models::problem::{ActivityCost, Fleet, Jobs, TransportCost};
use std::sync::Arc;

/// Defines a routing problem as seen by the state engine.
pub struct Problem {
    /// Specifies used fleet.
    pub fleet: Arc<Fleet>,
    /// Specifies all jobs of the problem. Jobs which are not here cannot be removed from routes.
    pub jobs: Arc<Jobs>,
    /// Specifies activity costs.
    pub activity: Arc<dyn ActivityCost>,
    /// Specifies transport costs.
    pub transport: Arc<dyn TransportCost>,
}

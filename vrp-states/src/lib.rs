//! This crate contains an incremental state propagation and feasibility engine used by ruin and recreate
//! metaheuristics to solve variations of ***Vehicle Routing Problem***.
//!
//! The engine keeps derived values (loads, schedules, latest start times, vehicle switch feasibility)
//! for every route in an explicit state store which is refreshed by an ordered pipeline of propagators.
//! Hard constraints and marginal cost estimators read only from that store, so a single insertion
//! or removal check is answered from the local neighborhood without re-simulating the route.
//!
//! # Lifecycle
//!
//! Route mutations have to be followed by a state refresh before the next feasibility query:
//!
//! - [`solver::StateEngine::recalculate_states`] recomputes everything for one route;
//! - [`solver::StateEngine::inform_insertion_starts`] does that for all routes once per recreate phase;
//! - [`solver::StateEngine::inform_job_inserted`] updates route aggregates incrementally and re-walks the route.
//!
//! [`construction::heuristics::RouteContext::is_stale`] reports whether the route was changed after
//! its last refresh.

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

#[macro_use]
pub(crate) mod macros;

pub mod construction;
pub mod models;
pub mod refinement;
pub mod solver;
pub mod utils;

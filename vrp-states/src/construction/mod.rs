//! Contains building blocks used by insertion and removal heuristics: route state store,
//! state propagators and feasibility constraints.

pub mod constraints;
pub mod heuristics;
pub mod states;

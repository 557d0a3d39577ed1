//! A facade which is used by ruin and recreate search: it keeps route states up to date and
//! answers feasibility and cost queries.

mod engine;
pub use self::engine::*;

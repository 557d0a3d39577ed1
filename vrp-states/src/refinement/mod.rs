//! Ruin side of the search: checks whether a job can be taken out of its route without breaking
//! load feasibility of what remains.

mod ruin;
pub use self::ruin::*;

use crate::construction::states::StateKey;
use thiserror::Error;

/// Describes an error raised while the state propagation pipeline is being assembled.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// A propagator requires a state key which no earlier propagator provides.
    #[error("propagator '{propagator}' requires '{key}' which is not provided by any preceding propagator")]
    MissingDependency {
        /// A name of the propagator with unsatisfied dependency.
        propagator: String,
        /// A required key.
        key: StateKey,
    },

    /// Two propagators claim the same state key.
    #[error("state key '{key}' is provided by both '{first}' and '{second}'")]
    DuplicateKey {
        /// A key provided twice.
        key: StateKey,
        /// A name of the propagator which registered the key first.
        first: String,
        /// A name of the offending propagator.
        second: String,
    },

    /// A propagator has no name.
    #[error("propagator at position {0} has an empty name")]
    EmptyName(usize),
}

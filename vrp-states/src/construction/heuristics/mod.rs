//! Contains contexts shared by state propagators, constraints and their callers.

mod context;
pub use self::context::*;

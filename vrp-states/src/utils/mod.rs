//! A collection of various utility helpers.

mod comparison;
pub use self::comparison::*;

mod error;
pub use self::error::*;

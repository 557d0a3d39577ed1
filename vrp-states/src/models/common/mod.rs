//! Common models.

mod domain;
pub use self::domain::*;

mod load;
pub use self::load::*;

mod primitives;
pub use self::primitives::*;

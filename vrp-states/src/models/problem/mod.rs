//! Problem domain models: the collaborators consumed by the state engine.

mod costs;
pub use self::costs::*;

mod fleet;
pub use self::fleet::*;

mod jobs;
pub use self::jobs::*;

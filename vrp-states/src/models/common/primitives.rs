/// Specifies a floating point type used within the crate.
pub type Float = f64;

/// Specifies location type.
pub type Location = usize;

/// Represents a time value.
pub type Timestamp = Float;

/// Represents a time duration.
pub type Duration = Float;

/// Specifies distance value.
pub type Distance = Float;

/// Specifies cost value.
pub type Cost = Float;

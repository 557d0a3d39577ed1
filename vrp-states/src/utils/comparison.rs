#[cfg(test)]
#[path = "../../tests/unit/utils/comparison_test.rs"]
mod comparison_test;

use crate::models::common::Float;
use std::cmp::Ordering;

/// Compares floats. NaN is considered the greatest value.
pub fn compare_floats(a: Float, b: Float) -> Ordering {
    match (a, b) {
        (x, y) if x.is_nan() && y.is_nan() => Ordering::Equal,
        (x, _) if x.is_nan() => Ordering::Greater,
        (_, y) if y.is_nan() => Ordering::Less,
        (_, _) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

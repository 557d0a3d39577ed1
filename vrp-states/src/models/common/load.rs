#[cfg(test)]
#[path = "../../../tests/unit/models/common/load_test.rs"]
mod load_test;

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

/// Specifies the maximum amount of capacity dimensions.
pub const CAPACITY_DIMENSION_SIZE: usize = 8;

/// Represents a multi dimensional signed quantity: vehicle capacity, activity size or load carried
/// by a vehicle. Pickups have positive size and deliveries negative, so summing sizes of activities
/// along the route gives the load after each of them.
///
/// Comparisons are dimension-wise: `a.is_less_or_equal(&b)` holds only if it holds in every
/// dimension, so two capacities can be incomparable.
#[derive(Clone, Copy, Debug, Default)]
pub struct Capacity {
    /// Capacity data.
    pub load: [i32; CAPACITY_DIMENSION_SIZE],
    /// Actual used size.
    pub size: usize,
}

impl Capacity {
    /// Creates a new instance of `Capacity`.
    pub fn new(data: Vec<i32>) -> Self {
        assert!(data.len() <= CAPACITY_DIMENSION_SIZE, "too many capacity dimensions: {}", data.len());

        let mut load = [0; CAPACITY_DIMENSION_SIZE];
        load.iter_mut().zip(data.iter()).for_each(|(dimen, value)| *dimen = *value);

        Self { load, size: data.len() }
    }

    /// Creates a single dimensional capacity.
    pub fn single(value: i32) -> Self {
        Self::new(vec![value])
    }

    /// Returns value of the given dimension. Unused dimensions are zero.
    pub fn get(&self, idx: usize) -> i32 {
        self.load.get(idx).copied().unwrap_or_default()
    }

    /// Returns capacity with all dimensions negated.
    pub fn invert(self) -> Self {
        -self
    }

    /// Checks whether at least one dimension is not zero.
    pub fn is_not_empty(&self) -> bool {
        self.load.iter().any(|v| *v != 0)
    }

    /// Returns true if every dimension is less or equal to the other's.
    pub fn is_less_or_equal(&self, other: &Self) -> bool {
        self.load.iter().zip(other.load.iter()).all(|(a, b)| a <= b)
    }

    /// Returns true if every dimension is greater or equal to the other's.
    pub fn is_greater_or_equal(&self, other: &Self) -> bool {
        self.load.iter().zip(other.load.iter()).all(|(a, b)| a >= b)
    }

    /// Returns true if at least one dimension is greater than zero.
    pub fn has_positive(&self) -> bool {
        !self.is_less_or_equal(&Capacity::default())
    }

    /// Returns dimension-wise maximum.
    pub fn max_load(self, other: Self) -> Self {
        self.zip_with(other, i32::max)
    }

    /// Returns dimension-wise minimum.
    pub fn min_load(self, other: Self) -> Self {
        self.zip_with(other, i32::min)
    }

    /// Checks whether this capacity can fit the other one.
    pub fn can_fit(&self, other: &Self) -> bool {
        self.is_greater_or_equal(other)
    }

    /// Converts to vector representation.
    pub fn as_vec(&self) -> Vec<i32> {
        if self.size == 0 { vec![0] } else { self.load[..self.size].to_vec() }
    }

    fn zip_with(self, other: Self, op: fn(i32, i32) -> i32) -> Self {
        let mut result = self;
        result.load.iter_mut().zip(other.load.iter()).for_each(|(a, b)| *a = op(*a, *b));
        result.size = self.size.max(other.size);

        result
    }
}

impl Add for Capacity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl Sub for Capacity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Neg for Capacity {
    type Output = Self;

    fn neg(self) -> Self::Output {
        let mut result = self;
        result.load.iter_mut().for_each(|v| *v = -*v);

        result
    }
}

impl PartialEq for Capacity {
    fn eq(&self, other: &Self) -> bool {
        self.load == other.load
    }
}

impl Eq for Capacity {}

impl Hash for Capacity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.load.hash(state);
    }
}

impl Sum for Capacity {
    fn sum<I: Iterator<Item = Capacity>>(iter: I) -> Self {
        iter.fold(Capacity::default(), |acc, item| acc + item)
    }
}

impl Display for Capacity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_vec())
    }
}

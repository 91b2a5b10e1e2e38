//! Scalar `[near, far]` interval used for clip distances and plane projections.

use std::ops::{Add, AddAssign, Mul, MulAssign};

use serde::{Deserialize, Serialize};

/// Closed scalar interval.
///
/// A range is empty when `near > far`. [`Range::empty`] is `{+inf, -inf}` and
/// acts as the identity for union.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound
    pub near: f32,
    /// Upper bound
    pub far: f32,
}

impl Default for Range {
    fn default() -> Self {
        Self::empty()
    }
}

impl Range {
    /// Create a range from its bounds (no reordering is done)
    pub const fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// The empty range `{+inf, -inf}`
    pub const fn empty() -> Self {
        Self {
            near: f32::INFINITY,
            far: f32::NEG_INFINITY,
        }
    }

    /// Whether `near > far`
    pub fn is_empty(&self) -> bool {
        self.near > self.far
    }

    /// Whether `value` lies inside the range
    pub fn contains(&self, value: f32) -> bool {
        self.near <= value && value <= self.far
    }

    /// `far - near`, or zero for an empty range
    pub fn length(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.far - self.near
        }
    }

    /// Grow the range so it includes `value`
    pub fn extend(&mut self, value: f32) {
        self.near = self.near.min(value);
        self.far = self.far.max(value);
    }

    /// Widen both ends by `amount` (no-op on empty ranges)
    pub fn padded(&self, amount: f32) -> Self {
        if self.is_empty() {
            *self
        } else {
            Self::new(self.near - amount, self.far + amount)
        }
    }
}

/// Union
impl Add for Range {
    type Output = Range;

    fn add(self, rhs: Range) -> Range {
        if self.is_empty() {
            return rhs;
        }
        if rhs.is_empty() {
            return self;
        }
        Range::new(self.near.min(rhs.near), self.far.max(rhs.far))
    }
}

impl AddAssign for Range {
    fn add_assign(&mut self, rhs: Range) {
        *self = *self + rhs;
    }
}

/// Intersection
impl Mul for Range {
    type Output = Range;

    fn mul(self, rhs: Range) -> Range {
        if self.is_empty() || rhs.is_empty() {
            return Range::empty();
        }
        Range::new(self.near.max(rhs.near), self.far.min(rhs.far))
    }
}

impl MulAssign for Range {
    fn mul_assign(&mut self, rhs: Range) {
        *self = *self * rhs;
    }
}

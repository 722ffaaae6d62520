//! 2D vector type for planar physics.

use crate::float::Float;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 2D vector used for node positions, velocities and forces.
///
/// Screen convention: `x` grows to the right and `y` grows downwards, so a
/// positive gravity pulls nodes towards larger `y`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    /// Zero vector.
    pub fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Scale both components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec2 { x: self.x * s, y: self.y * s }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    /// Length (magnitude).
    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(F::one() / len)
        }
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise in y-up terms).
    pub fn perp(self) -> Self {
        Vec2 { x: -self.y, y: self.x }
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> F {
        (self - other).length()
    }

    /// Squared distance between two points.
    pub fn distance_sq(self, other: Self) -> F {
        (self - other).length_sq()
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> AddAssign for Vec2<F> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> SubAssign for Vec2<F> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}

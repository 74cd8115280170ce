//! The 2-D vector type used by physics, steering, and collision geometry.
//!
//! [`Vec2`] is a plain `f64` pair with value semantics. Normalization of
//! the zero vector yields the zero vector rather than NaN, and
//! [`Vec2::limit`] clamps magnitude without changing direction -- both
//! properties the steering code relies on.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2-D vector (or point) in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a unit vector pointing along the given heading in radians.
    pub fn from_angle(radians: f64) -> Self {
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    /// Return the Euclidean length of the vector.
    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Return the squared length (cheaper when only comparing distances).
    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Return a unit-length copy; the zero vector normalizes to itself.
    pub fn normalize(self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            Self::ZERO
        } else {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        }
    }

    /// Clamp the magnitude to `max` while preserving direction.
    pub fn limit(self, max: f64) -> Self {
        if self.magnitude() > max {
            self.normalize() * max
        } else {
            self
        }
    }

    /// Return the dot product with another vector.
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Return the perpendicular vector `(-y, x)` (the left-hand tangent).
    pub const fn perp(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    /// Return the Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).magnitude()
    }

    /// Whether both components are finite (no NaN or infinity).
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn magnitude_of_3_4_is_5() {
        assert!((Vec2::new(3.0, 4.0).magnitude() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
    }

    #[test]
    fn normalize_yields_unit_length() {
        let v = Vec2::new(-7.0, 2.5).normalize();
        assert!((v.magnitude() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn limit_clamps_only_above_max() {
        let long = Vec2::new(10.0, 0.0).limit(3.0);
        assert!((long.magnitude() - 3.0).abs() < EPSILON);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.limit(3.0), short);
    }

    #[test]
    fn dot_of_perpendicular_vectors_is_zero() {
        let v = Vec2::new(2.0, 5.0);
        assert!(v.dot(v.perp()).abs() < EPSILON);
    }

    #[test]
    fn from_angle_is_unit_length() {
        let v = Vec2::from_angle(1.234);
        assert!((v.magnitude() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn serializes_as_x_y_object() {
        let json = serde_json::to_value(Vec2::new(1.5, -2.0)).unwrap();
        assert_eq!(json, serde_json::json!({"x": 1.5, "y": -2.0}));
    }
}

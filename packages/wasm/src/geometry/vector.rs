use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::Serialize;

/// A point or displacement in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A point in the plane (`z == 0`).
    #[inline]
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn distance_squared(self, other: Position) -> f64 {
        (self - other).length_squared()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Position> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    /// z component of the cross product of the xy projections.
    #[inline]
    pub fn cross_2d(self, other: Position) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Clamp every axis into `[-half_extent, half_extent]`.
    pub fn clamp_to_box(self, half_extent: f64) -> Position {
        Position::new(
            self.x.clamp(-half_extent, half_extent),
            self.y.clamp(-half_extent, half_extent),
            self.z.clamp(-half_extent, half_extent),
        )
    }

    /// Whether every axis lies in `[-half_extent, half_extent]`.
    pub fn within_box(self, half_extent: f64) -> bool {
        self.x.abs() <= half_extent && self.y.abs() <= half_extent && self.z.abs() <= half_extent
    }
}

impl Add for Position {
    type Output = Position;

    #[inline]
    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    #[inline]
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    #[inline]
    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Position::new(1.0, 2.0, 2.0);
        assert_eq!(a.length(), 3.0);
        assert_eq!(a.distance_squared(Position::ORIGIN), 9.0);
    }

    #[test]
    fn test_normalized() {
        let v = Position::planar(3.0, 4.0).normalized().unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.x - 0.6).abs() < 1e-12);
        assert!(Position::ORIGIN.normalized().is_none());
    }

    #[test]
    fn test_box_checks() {
        let p = Position::new(4.95, -5.5, 0.0);
        assert!(!p.within_box(4.9));
        let clamped = p.clamp_to_box(4.9);
        assert_eq!(clamped, Position::new(4.9, -4.9, 0.0));
        assert!(clamped.within_box(4.9));
    }

    #[test]
    fn test_cross_2d_ignores_z() {
        let a = Position::new(1.0, 0.0, 7.0);
        let b = Position::new(0.0, 1.0, -3.0);
        assert_eq!(a.cross_2d(b), 1.0);
        assert_eq!(b.cross_2d(a), -1.0);
    }
}

//! Integer 2-D vector used throughout the engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An integer 2-D coordinate.
///
/// Used both as a pixel coordinate (atlas offsets, tile sizes) and as a
/// grid coordinate (map sizes, cell positions). The two spaces are never
/// converted implicitly; callers must not conflate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: i32,
    pub y: i32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Vector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Vector2::new(3, -2);
        let b = Vector2::new(1, 5);
        assert_eq!(a + b, Vector2::new(4, 3));
        assert_eq!(a - b, Vector2::new(2, -7));
    }

    #[test]
    fn test_serde_shape() {
        let v = Vector2::new(16, 24);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, r#"{"x":16,"y":24}"#);
        let back: Vector2 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}

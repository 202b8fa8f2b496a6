//! Geometry primitives: [`Vec2`] and [`Rect`].
//!
//! Screen coordinates: X grows right, Y grows down. Both types use `f32`
//! because entry positions are fractional while screens slide in and out.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

// ---------------------------------------------------------------------------
// Vec2
// ---------------------------------------------------------------------------

/// A 2D vector or position in screen space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// (1, 1), the identity scale.
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Return a vector shifted by (dx, dy).
    #[inline]
    pub const fn shift(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Squared euclidean length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Component-wise product.
    #[inline]
    pub fn scale(self, s: Vec2) -> Self {
        Self::new(self.x * s.x, self.y * s.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A half-open rectangle \[min, max). `min` is inclusive, `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from two corners and canonicalize so that
    /// `min` ≤ `max` on each axis.
    #[inline]
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min: Vec2::new(x0.min(x1), y0.min(y1)),
            max: Vec2::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Rectangle with top-left corner `pos` and the given size.
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, pos.x + size.x, pos.y + size.y)
    }

    /// Size as a vector (width, height).
    #[inline]
    pub fn size(self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.max.y - self.min.y
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Whether the rectangle has zero or negative area.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` is inside the half-open rectangle.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Return a rectangle of the same size translated by `p`.
    #[inline]
    pub fn translate(self, p: Vec2) -> Self {
        Self {
            min: self.min + p,
            max: self.max + p,
        }
    }

    /// Intersection of two rectangles. Returns the zero rectangle when they
    /// do not overlap.
    pub fn intersect(self, other: Rect) -> Self {
        let r = Self {
            min: Vec2::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Vec2::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Self::default() } else { r }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(b - a, Vec2::new(2.0, 2.0));
        assert_eq!(a * 3.0, Vec2::new(3.0, 6.0));
        assert_eq!(b / 2.0, Vec2::new(1.5, 2.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
        assert_eq!(b.length_squared(), 25.0);
    }

    #[test]
    fn rect_basics() {
        let r = Rect::new(0.0, 0.0, 3.0, 2.0);
        assert_eq!(r.size(), Vec2::new(3.0, 2.0));
        assert!(!r.is_empty());
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(2.9, 1.9)));
        assert!(!r.contains(Vec2::new(3.0, 0.0)));
        assert!(!r.contains(Vec2::new(0.0, 2.0)));
        assert_eq!(r.center(), Vec2::new(1.5, 1.0));
    }

    #[test]
    fn rect_auto_canonicalize() {
        let r = Rect::new(3.0, 2.0, 0.0, 0.0);
        assert_eq!(r.min, Vec2::ZERO);
        assert_eq!(r.max, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn rect_from_pos_size_and_translate() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 20.0), Vec2::new(5.0, 4.0));
        assert_eq!(r, Rect::new(10.0, 20.0, 15.0, 24.0));
        let t = r.translate(Vec2::new(-10.0, -20.0));
        assert_eq!(t, Rect::new(0.0, 0.0, 5.0, 4.0));
    }

    #[test]
    fn rect_intersect() {
        let a = Rect::new(0.0, 0.0, 4.0, 4.0);
        let b = Rect::new(2.0, 2.0, 6.0, 6.0);
        assert_eq!(a.intersect(b), Rect::new(2.0, 2.0, 4.0, 4.0));

        let c = Rect::new(5.0, 5.0, 7.0, 7.0);
        assert!(a.intersect(c).is_empty());
        assert_eq!(a.intersect(c), Rect::default());
    }
}

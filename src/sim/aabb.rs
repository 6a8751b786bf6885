//! Axis-aligned rectangle geometry for entities, surfaces and hazards
//!
//! Screen-space convention: +x is right, +y is down. A rectangle is
//! defined by its top-left corner and its size:
//! - left/right: `pos.x` / `pos.x + size.x`
//! - top/bottom: `pos.y` / `pos.y + size.y`

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Grow the rectangle by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Aabb {
        Aabb {
            pos: self.pos - Vec2::splat(amount),
            size: self.size + Vec2::splat(amount * 2.0),
        }
    }

    /// Inclusive intersection test: touching edges count.
    ///
    /// Used for proximity checks where an entity resting flush against a
    /// surface must still register as "near" it.
    #[inline]
    pub fn touches(&self, other: &Aabb) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// True if every coordinate is finite and both extents are positive
    pub fn is_well_formed(&self) -> bool {
        self.pos.is_finite() && self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_excludes_shared_edges() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.touches(&b));

        let c = Aabb::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_inflate() {
        let a = Aabb::new(10.0, 20.0, 30.0, 40.0).inflate(5.0);
        assert_eq!(a.left(), 5.0);
        assert_eq!(a.top(), 15.0);
        assert_eq!(a.right(), 45.0);
        assert_eq!(a.bottom(), 65.0);
    }

    #[test]
    fn test_well_formed() {
        assert!(Aabb::new(0.0, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!Aabb::new(0.0, 0.0, 0.0, 1.0).is_well_formed());
        assert!(!Aabb::new(f32::NAN, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!Aabb::new(0.0, 0.0, 1.0, -3.0).is_well_formed());
    }
}

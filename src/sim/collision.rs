//! Axis-aligned collision for the side-scroller
//!
//! Actor and pipes are plain rectangles in screen space (y grows downward).
//! Edges that only touch do not count as a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// A rectangle with no area never collides
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Strict AABB overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }
}

/// Check a box against any of several obstacle boxes
pub fn overlaps_any(subject: &Rect, others: &[Rect]) -> bool {
    others.iter().any(|r| subject.overlaps(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_empty_rect_never_hits() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let flat = Rect::new(2.0, 2.0, 5.0, 0.0);
        assert!(flat.is_empty());
        assert!(!a.overlaps(&flat));
    }

    #[test]
    fn test_negative_size_clamped() {
        let r = Rect::new(0.0, 0.0, -4.0, 3.0);
        assert!(r.is_empty());
        assert_eq!(r.max(), Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_overlaps_any() {
        let actor = Rect::new(50.0, 100.0, 34.0, 24.0);
        let top = Rect::new(60.0, 0.0, 60.0, 90.0);
        let bottom = Rect::new(60.0, 110.0, 60.0, 400.0);
        assert!(!overlaps_any(&actor, &[top]));
        assert!(overlaps_any(&actor, &[top, bottom]));
    }
}

//! Integer screen rectangles used for sprite clipping and placement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle from a floating-point origin and size, truncating
    /// toward zero.
    #[must_use]
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            x: origin.x as i32,
            y: origin.y as i32,
            w: size.x as i32,
            h: size.y as i32,
        }
    }

    /// Returns `true` if the rectangle has no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Returns `true` if the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_origin_size_truncates() {
        let r = Rect::from_origin_size(Vec2::new(10.9, 30.2), Vec2::new(64.0, 63.7));
        assert_eq!(r, Rect::new(10, 30, 64, 63));
    }

    #[test]
    fn test_empty() {
        assert!(Rect::default().is_empty());
        assert!(!Rect::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(0, 0, 32, 32);
        assert!(r.contains(0, 0));
        assert!(r.contains(31, 31));
        assert!(!r.contains(32, 0));
    }
}

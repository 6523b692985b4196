//! 2D transform component.
//!
//! [`Transform2D`] represents position, rotation, and scale in screen space.
//! Nearly every visible or moving entity carries one.

use glam::{Mat3, Vec2};
use rigel_ecs::Component;
use serde::{Deserialize, Serialize};

/// A 2D transform: position in pixels, per-axis scale, rotation in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform2D {
    /// Screen-space position of the top-left corner.
    pub position: Vec2,
    /// Per-axis scale factor.
    pub scale: Vec2,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
}

impl Transform2D {
    /// The identity transform: origin, unit scale, no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    /// Create a transform from all three parts.
    #[must_use]
    pub fn new(position: Vec2, scale: Vec2, rotation: f64) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Create a transform at `position` with unit scale and no rotation.
    #[must_use]
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Return a copy with a uniform scale.
    #[must_use]
    pub fn with_uniform_scale(mut self, factor: f32) -> Self {
        self.scale = Vec2::splat(factor);
        self
    }

    /// Translate by `offset`.
    #[must_use]
    pub fn translated(mut self, offset: Vec2) -> Self {
        self.position += offset;
        self
    }

    /// Compute the 3×3 affine matrix (scale, then rotation, then translation).
    #[must_use]
    pub fn to_matrix(&self) -> Mat3 {
        Mat3::from_scale_angle_translation(
            self.scale,
            (self.rotation as f32).to_radians(),
            self.position,
        )
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform2D {
    fn type_name() -> &'static str {
        "Transform2D"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform2D::default();
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.scale, Vec2::ONE);
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn test_from_position() {
        let t = Transform2D::from_position(Vec2::new(10.0, 30.0)).with_uniform_scale(2.0);
        assert_eq!(t.position, Vec2::new(10.0, 30.0));
        assert_eq!(t.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_translated() {
        let t = Transform2D::IDENTITY.translated(Vec2::new(5.0, -1.0));
        assert_eq!(t.position, Vec2::new(5.0, -1.0));
    }

    #[test]
    fn test_matrix_identity() {
        assert_eq!(Transform2D::IDENTITY.to_matrix(), Mat3::IDENTITY);
    }

    #[test]
    fn test_matrix_maps_origin_to_position() {
        let t = Transform2D::new(Vec2::new(3.0, 4.0), Vec2::splat(2.0), 0.0);
        let p = t.to_matrix().transform_point2(Vec2::new(1.0, 1.0));
        assert_eq!(p, Vec2::new(5.0, 6.0));
    }
}

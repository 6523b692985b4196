//! Gameplay component definitions.
//!
//! Alongside [`Transform2D`](rigel_math::Transform2D) these are the
//! components the built-in systems operate on.

use rigel_ecs::Component;
use rigel_math::{Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Linear velocity in pixels per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RigidBody {
    /// Velocity in pixels per second.
    pub velocity: Vec2,
}

impl RigidBody {
    /// A body at rest.
    pub const ZERO: Self = Self {
        velocity: Vec2::ZERO,
    };

    /// Create a body moving at `(x, y)` pixels per second.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec2::new(x, y),
        }
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Component for RigidBody {
    fn type_name() -> &'static str {
        "RigidBody"
    }
}

/// A reference to a region of a texture, drawn at the entity's transform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sprite {
    /// Identifier of the texture in the asset store.
    pub asset_id: String,
    /// Unscaled width in pixels.
    pub width: i32,
    /// Unscaled height in pixels.
    pub height: i32,
    /// Draw order; lower values are drawn first.
    pub z_index: i32,
    /// Region of the texture to draw.
    pub src_rect: Rect,
}

impl Sprite {
    /// A sprite drawing the `width × height` region at the texture origin.
    #[must_use]
    pub fn new(asset_id: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            asset_id: asset_id.into(),
            width,
            height,
            z_index: 0,
            src_rect: Rect::new(0, 0, width, height),
        }
    }

    /// Clip the source region to start at `(x, y)` in the texture.
    #[must_use]
    pub fn with_src_origin(mut self, x: i32, y: i32) -> Self {
        self.src_rect.x = x;
        self.src_rect.y = y;
        self
    }

    /// Set the draw order.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

impl Component for Sprite {
    fn type_name() -> &'static str {
        "Sprite"
    }
}

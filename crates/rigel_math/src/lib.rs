//! # rigel_math
//!
//! Math types for the rigel engine. Re-exports [`glam`] for linear algebra
//! and defines the engine's 2D spatial types. [`Transform2D`] implements
//! [`Component`](rigel_ecs::Component).

pub mod rect;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Mat3, Vec2};

pub use rect::Rect;
pub use transform::Transform2D;

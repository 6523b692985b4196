//! # rigel_systems
//!
//! Gameplay components and the built-in systems of the rigel engine.
//!
//! - [`RigidBody`] and [`Sprite`] components.
//! - [`MovementSystem`]: integrates velocity into position.
//! - [`RenderSystem`]: issues a [`DrawCommand`] per visible entity.
//! - [`AssetStore`]: asset id to [`TextureHandle`] lookup.
//!
//! A frame runs [`Registry::update`](rigel_ecs::Registry::update) first, then
//! movement, then rendering.

pub mod assets;
pub mod components;
pub mod error;
pub mod movement;
pub mod render;

pub use assets::{AssetStore, TextureHandle, TextureSource};
pub use components::{RigidBody, Sprite};
pub use error::RenderError;
pub use movement::MovementSystem;
pub use render::{DrawCommand, RecordingRenderer, RenderReport, RenderSystem, Renderer};

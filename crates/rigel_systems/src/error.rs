//! Error types for the built-in systems.

use rigel_ecs::{EcsError, Entity};

/// Errors produced while drawing a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A sprite refers to an asset id the asset store does not know.
    #[error("{entity}: texture `{asset_id}` is not in the asset store")]
    TextureNotFound {
        /// The entity whose sprite could not be drawn.
        entity: Entity,
        /// The missing asset id.
        asset_id: String,
    },

    /// Component storage rejected a lookup.
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

//! Asset store collaborator.
//!
//! The renderer owns the actual textures; the [`AssetStore`] only maps asset
//! ids to the opaque [`TextureHandle`]s the renderer handed out. Loading image
//! files is the renderer's concern.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// An opaque handle to a texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Anything that can resolve an asset id to a texture.
pub trait TextureSource {
    /// Returns the texture registered under `asset_id`, or `None` if unknown.
    fn texture(&self, asset_id: &str) -> Option<TextureHandle>;
}

/// Maps asset ids to texture handles.
#[derive(Debug, Default)]
pub struct AssetStore {
    textures: HashMap<String, TextureHandle>,
}

impl AssetStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` under `asset_id`, replacing any previous entry.
    pub fn add_texture(&mut self, asset_id: impl Into<String>, handle: TextureHandle) {
        let asset_id = asset_id.into();
        info!(asset_id = %asset_id, handle = handle.0, "texture added to asset store");
        self.textures.insert(asset_id, handle);
    }

    /// The texture registered under `asset_id`.
    #[must_use]
    pub fn get_texture(&self, asset_id: &str) -> Option<TextureHandle> {
        self.textures.get(asset_id).copied()
    }

    /// Returns `true` if `asset_id` is registered.
    #[must_use]
    pub fn has_texture(&self, asset_id: &str) -> bool {
        self.textures.contains_key(asset_id)
    }

    /// Number of registered textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Returns `true` if no texture is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Forget every texture.
    pub fn clear_assets(&mut self) {
        debug!(count = self.textures.len(), "asset store cleared");
        self.textures.clear();
    }
}

impl TextureSource for AssetStore {
    fn texture(&self, asset_id: &str) -> Option<TextureHandle> {
        self.get_texture(asset_id)
    }
}

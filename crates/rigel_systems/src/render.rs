//! Sprite rendering.
//!
//! [`RenderSystem`] turns every entity with a [`Transform2D`] and a
//! [`Sprite`] into a [`DrawCommand`] and hands it to a [`Renderer`]. The
//! renderer itself (window, GPU, image decoding) lives outside this crate.

use rigel_ecs::{EcsError, Entity, System, SystemMembership, World};
use rigel_math::{Rect, Transform2D, Vec2};
use tracing::{trace, warn};

use crate::assets::{TextureHandle, TextureSource};
use crate::components::Sprite;
use crate::error::RenderError;

/// One textured quad to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// The entity being drawn.
    pub entity: Entity,
    /// Texture to sample.
    pub texture: TextureHandle,
    /// Region of the texture.
    pub src: Rect,
    /// Screen-space destination.
    pub dst: Rect,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
}

/// Receives draw commands.
pub trait Renderer {
    /// Draw one textured quad.
    fn draw(&mut self, command: DrawCommand);
}

/// A renderer that keeps every command it receives.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received since the last [`clear`](Self::clear).
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Outcome of one [`RenderSystem::update`] call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderReport {
    /// Number of draw commands issued.
    pub drawn: usize,
    /// Entities that could not be drawn.
    pub failures: Vec<RenderError>,
}

impl RenderReport {
    /// Returns `true` if every member was drawn.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Draws every entity with a [`Transform2D`] and a [`Sprite`].
#[derive(Debug)]
pub struct RenderSystem {
    membership: SystemMembership,
}

impl RenderSystem {
    /// Create the system.
    ///
    /// # Errors
    ///
    /// Fails if the component type table is full.
    pub fn new() -> Result<Self, EcsError> {
        let membership = SystemMembership::new()
            .require::<Transform2D>()?
            .require::<Sprite>()?;
        Ok(Self { membership })
    }

    /// Issue a draw command for each member, lowest z-index first.
    ///
    /// An entity whose texture is unknown or whose components disappeared
    /// since the last registry update is recorded in the report and skipped;
    /// the rest are still drawn.
    pub fn update(
        &self,
        world: &World,
        assets: &impl TextureSource,
        renderer: &mut impl Renderer,
    ) -> RenderReport {
        let mut report = RenderReport::default();
        let mut queue = Vec::with_capacity(self.entities().len());
        for &entity in self.entities() {
            match Self::components(world, entity) {
                Ok((transform, sprite)) => queue.push((sprite.z_index, entity, transform, sprite)),
                Err(err) => report.failures.push(err),
            }
        }
        queue.sort_by_key(|&(z_index, entity, ..)| (z_index, entity));

        for (_, entity, transform, sprite) in queue {
            match draw_command(entity, transform, sprite, assets) {
                Ok(command) => {
                    trace!(entity = %entity, asset_id = %sprite.asset_id, "sprite drawn");
                    renderer.draw(command);
                    report.drawn += 1;
                }
                Err(err) => {
                    warn!(entity = %entity, error = %err, "sprite not drawn");
                    report.failures.push(err);
                }
            }
        }
        report
    }

    fn components(world: &World, entity: Entity) -> Result<(&Transform2D, &Sprite), RenderError> {
        let transform = world.get_component::<Transform2D>(entity)?;
        let sprite = world.get_component::<Sprite>(entity)?;
        Ok((transform, sprite))
    }
}

impl System for RenderSystem {
    fn membership(&self) -> &SystemMembership {
        &self.membership
    }

    fn membership_mut(&mut self) -> &mut SystemMembership {
        &mut self.membership
    }

    fn name(&self) -> &'static str {
        "RenderSystem"
    }
}

fn draw_command(
    entity: Entity,
    transform: &Transform2D,
    sprite: &Sprite,
    assets: &impl TextureSource,
) -> Result<DrawCommand, RenderError> {
    let texture = assets
        .texture(&sprite.asset_id)
        .ok_or_else(|| RenderError::TextureNotFound {
            entity,
            asset_id: sprite.asset_id.clone(),
        })?;
    let size = Vec2::new(sprite.width as f32, sprite.height as f32) * transform.scale;
    Ok(DrawCommand {
        entity,
        texture,
        src: sprite.src_rect,
        dst: Rect::from_origin_size(transform.position, size),
        rotation: transform.rotation,
    })
}

//! The fixed-timestep game loop.
//!
//! Each frame:
//!
//! 1. Apply staged entity changes ([`Registry::update`]).
//! 2. Integrate velocities ([`MovementSystem`]).
//! 3. Draw sprites ([`RenderSystem`]).

use std::time::{Duration, Instant};

use rigel_ecs::{EcsError, Entity, Registry};
use rigel_math::{Transform2D, Vec2};
use rigel_systems::{
    AssetStore, MovementSystem, RecordingRenderer, RenderReport, RenderSystem, RigidBody, Sprite,
    TextureHandle,
};
use tracing::{debug, info, warn};

use crate::config::GameConfig;

/// Edge length of a tile in the tile-map texture.
pub const TILE_SIZE: i32 = 32;
/// Scale applied to every tile.
pub const TILE_SCALE: f32 = 2.0;
/// Group that holds every tile entity.
pub const TILES_GROUP: &str = "tiles";
/// Tag of the player's tank.
pub const PLAYER_TAG: &str = "player";

const TILESET_COLS: u32 = 10;
const TILESET_ROWS: u32 = 3;

/// Counts frames and reports the rate once per second.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f64,
}

impl FpsCounter {
    /// Start counting at `now`.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Record a frame finished at `now`. Returns the new rate when a
    /// one-second window closes.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    /// The rate measured over the last full window.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Owns the registry, the assets and the renderer, and drives frames.
#[derive(Debug)]
pub struct GameLoop {
    config: GameConfig,
    registry: Registry,
    assets: AssetStore,
    renderer: RecordingRenderer,
    frame: u64,
    fps: FpsCounter,
}

impl GameLoop {
    /// Create an empty game. Call [`load_level`](Self::load_level) before
    /// running.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            assets: AssetStore::new(),
            renderer: RecordingRenderer::new(),
            frame: 0,
            fps: FpsCounter::new(Instant::now()),
        }
    }

    /// Number of frames run so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The entity registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The asset store.
    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Draw commands issued by the most recent frame.
    #[must_use]
    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    /// Register the systems and textures and spawn the tile map and vehicles.
    ///
    /// # Errors
    ///
    /// Fails if a component type cannot be registered.
    pub fn load_level(&mut self) -> Result<(), EcsError> {
        self.registry.add_system(MovementSystem::new()?);
        self.registry.add_system(RenderSystem::new()?);

        self.assets.add_texture("tank-image", TextureHandle(1));
        self.assets.add_texture("truck-image", TextureHandle(2));
        self.assets.add_texture("tilemap-image", TextureHandle(3));

        let grid = self.config.grid;
        let step = TILE_SCALE * TILE_SIZE as f32;
        for y in 0..grid.rows {
            for x in 0..grid.cols {
                let (src_row, src_col) = tile_index(x, y);
                let tile = self.registry.create_entity();
                self.registry.add_component(
                    tile,
                    Transform2D::from_position(Vec2::new(x as f32 * step, y as f32 * step))
                        .with_uniform_scale(TILE_SCALE),
                )?;
                self.registry.add_component(
                    tile,
                    Sprite::new("tilemap-image", TILE_SIZE, TILE_SIZE)
                        .with_src_origin(src_col as i32 * TILE_SIZE, src_row as i32 * TILE_SIZE),
                )?;
                self.registry.world_mut().group_entity(tile, TILES_GROUP)?;
            }
        }

        let tank = self.spawn_vehicle(Vec2::new(10.0, 30.0), Vec2::new(40.0, 0.0), "tank-image")?;
        self.registry.world_mut().tag_entity(tank, PLAYER_TAG)?;
        self.spawn_vehicle(Vec2::new(50.0, 100.0), Vec2::new(0.0, 50.0), "truck-image")?;

        info!(
            grid = %grid,
            entities = self.registry.entity_count(),
            textures = self.assets.len(),
            "level loaded"
        );
        Ok(())
    }

    fn spawn_vehicle(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        asset_id: &str,
    ) -> Result<Entity, EcsError> {
        let vehicle = self.registry.create_entity();
        self.registry.add_component(
            vehicle,
            Transform2D::from_position(position).with_uniform_scale(TILE_SCALE),
        )?;
        self.registry
            .add_component(vehicle, RigidBody { velocity })?;
        self.registry.add_component(
            vehicle,
            Sprite::new(asset_id, TILE_SIZE, TILE_SIZE).with_z_index(1),
        )?;
        Ok(vehicle)
    }

    /// Run one frame with time step `dt` in seconds.
    ///
    /// # Errors
    ///
    /// Fails if the movement or render system is not registered.
    pub fn run_frame(&mut self, dt: f32) -> Result<RenderReport, EcsError> {
        self.registry.update();

        let (movement, world) = self.registry.system_with_world::<MovementSystem>()?;
        let moved = movement.update(world, dt);

        self.renderer.clear();
        let report = self.registry.get_system::<RenderSystem>()?.update(
            self.registry.world(),
            &self.assets,
            &mut self.renderer,
        );

        self.frame += 1;
        debug!(
            frame = self.frame,
            moved,
            drawn = report.drawn,
            failures = report.failures.len(),
            "frame complete"
        );
        Ok(report)
    }

    /// Run frames at the configured rate until `max_frames` is reached, or
    /// forever when it is zero.
    ///
    /// # Errors
    ///
    /// Propagates the first frame error.
    pub fn run(&mut self) -> Result<(), EcsError> {
        let frame_duration = Duration::from_secs_f64(self.config.frame_time());
        let dt = frame_duration.as_secs_f32();

        info!(
            tick_rate = self.config.tick_rate,
            max_frames = self.config.max_frames,
            "starting game loop"
        );

        loop {
            let start = Instant::now();
            self.run_frame(dt)?;

            if let Some(fps) = self.fps.tick(Instant::now()) {
                info!(frame = self.frame, fps, "frame rate");
            }

            if self.config.max_frames > 0 && self.frame >= self.config.max_frames {
                info!(frames = self.frame, fps = self.fps.fps(), "game loop complete");
                return Ok(());
            }

            let elapsed = start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            } else {
                warn!(
                    frame = self.frame,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = frame_duration.as_millis() as u64,
                    "frame exceeded time budget"
                );
            }
        }
    }
}

/// Tileset `(row, col)` used for the tile at grid position `(x, y)`.
fn tile_index(x: u32, y: u32) -> (u32, u32) {
    ((x / 4 + y / 3) % TILESET_ROWS, (x * 7 + y * 3) % TILESET_COLS)
}

#[cfg(test)]
mod tests {
    use rigel_ecs::System;

    use rigel_math::Rect;

    use super::*;
    use crate::config::GridSize;

    fn small_game() -> GameLoop {
        let config = GameConfig::default()
            .with_tick_rate(1000.0)
            .with_grid(GridSize::new(4, 3));
        let mut game = GameLoop::new(config);
        game.load_level().unwrap();
        game
    }

    fn player_position(game: &GameLoop) -> Vec2 {
        let player = game
            .registry()
            .world()
            .get_entity_by_tag(PLAYER_TAG)
            .unwrap();
        game.registry()
            .get_component::<Transform2D>(player)
            .unwrap()
            .position
    }

    #[test]
    fn test_load_level_spawns_tiles_and_vehicles() {
        let game = small_game();
        assert_eq!(game.registry().entity_count(), 12 + 2);
        assert_eq!(game.registry().world().get_entities_by_group(TILES_GROUP).len(), 12);
        assert_eq!(game.assets().len(), 3);
        assert_eq!(player_position(&game), Vec2::new(10.0, 30.0));
    }

    #[test]
    fn test_tiles_are_laid_out_on_scaled_grid() {
        let game = small_game();
        let world = game.registry().world();
        let last = *world.get_entities_by_group(TILES_GROUP).last().unwrap();
        let transform = world.get_component::<Transform2D>(last).unwrap();
        assert_eq!(transform.position, Vec2::new(3.0 * 64.0, 2.0 * 64.0));
        assert_eq!(transform.scale, Vec2::splat(TILE_SCALE));
    }

    #[test]
    fn test_first_frame_moves_and_draws_everything() {
        let mut game = small_game();
        let report = game.run_frame(0.5).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.drawn, 14);
        assert_eq!(player_position(&game), Vec2::new(30.0, 30.0));

        let movement = game.registry().get_system::<MovementSystem>().unwrap();
        assert_eq!(movement.entities().len(), 2);

        let commands = game.renderer().commands();
        assert!(commands.iter().all(|c| c.dst.w == 2 * TILE_SIZE && c.dst.h == 2 * TILE_SIZE));
        assert!(commands[12..].iter().all(|c| c.src.w == TILE_SIZE && c.src.x == 0));

        let player = game.registry().world().get_entity_by_tag(PLAYER_TAG).unwrap();
        let tank = commands.iter().find(|c| c.entity == player).unwrap();
        assert_eq!(tank.dst, Rect::new(30, 30, 64, 64));
    }

    #[test]
    fn test_run_stops_after_max_frames() {
        let mut game = small_game();
        game.config.max_frames = 3;
        game.run().unwrap();
        assert_eq!(game.frame(), 3);
    }

    #[test]
    fn test_run_frame_without_systems_fails() {
        let mut game = GameLoop::new(GameConfig::default());
        assert!(matches!(game.run_frame(0.1), Err(EcsError::SystemNotFound(_))));
    }

    #[test]
    fn test_tile_index_stays_in_tileset() {
        for y in 0..20 {
            for x in 0..25 {
                let (row, col) = tile_index(x, y);
                assert!(row < TILESET_ROWS && col < TILESET_COLS);
            }
        }
    }

    #[test]
    fn test_fps_counter_reports_once_per_second() {
        let start = Instant::now();
        let mut fps = FpsCounter::new(start);
        for i in 1..60 {
            assert_eq!(fps.tick(start + Duration::from_millis(i * 16)), None);
        }
        let rate = fps.tick(start + Duration::from_secs(1)).unwrap();
        assert_eq!(rate, 60.0);
        assert_eq!(fps.fps(), 60.0);
    }
}

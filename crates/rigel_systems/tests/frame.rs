//! Full-frame tests: registry update, movement, then rendering.

use rigel_ecs::{Entity, Registry, System};
use rigel_math::{Rect, Transform2D, Vec2};
use rigel_systems::{
    AssetStore, MovementSystem, RecordingRenderer, RenderError, RenderSystem, RigidBody, Sprite,
    TextureHandle,
};

struct Scene {
    registry: Registry,
    assets: AssetStore,
    renderer: RecordingRenderer,
}

impl Scene {
    fn new() -> Self {
        let mut registry = Registry::new();
        registry.add_system(MovementSystem::new().unwrap());
        registry.add_system(RenderSystem::new().unwrap());

        let mut assets = AssetStore::new();
        assets.add_texture("tank-image", TextureHandle(1));
        assets.add_texture("truck-image", TextureHandle(2));

        Self {
            registry,
            assets,
            renderer: RecordingRenderer::new(),
        }
    }

    fn spawn_vehicle(&mut self, position: Vec2, velocity: Vec2, asset_id: &str) -> Entity {
        let e = self.registry.create_entity();
        self.registry
            .add_component(e, Transform2D::from_position(position))
            .unwrap();
        self.registry
            .add_component(e, RigidBody { velocity })
            .unwrap();
        self.registry
            .add_component(e, Sprite::new(asset_id, 32, 32))
            .unwrap();
        e
    }

    fn frame(&mut self, dt: f32) -> rigel_systems::RenderReport {
        self.renderer.clear();
        self.registry.update();

        let (movement, world) = self
            .registry
            .system_with_world::<MovementSystem>()
            .unwrap();
        movement.update(world, dt);

        self.registry
            .get_system::<RenderSystem>()
            .unwrap()
            .update(self.registry.world(), &self.assets, &mut self.renderer)
    }

    fn position(&self, entity: Entity) -> Vec2 {
        self.registry
            .get_component::<Transform2D>(entity)
            .unwrap()
            .position
    }
}

#[test]
fn test_frame_moves_then_draws() {
    let mut scene = Scene::new();
    let tank = scene.spawn_vehicle(Vec2::new(10.0, 30.0), Vec2::new(40.0, 0.0), "tank-image");
    let truck = scene.spawn_vehicle(Vec2::new(50.0, 100.0), Vec2::new(0.0, 50.0), "truck-image");

    let report = scene.frame(0.5);
    assert!(report.is_complete());
    assert_eq!(report.drawn, 2);
    assert_eq!(scene.position(tank), Vec2::new(30.0, 30.0));
    assert_eq!(scene.position(truck), Vec2::new(50.0, 125.0));

    let commands = scene.renderer.commands();
    assert_eq!(commands[0].entity, tank);
    assert_eq!(commands[0].dst, Rect::new(30, 30, 32, 32));
    assert_eq!(commands[1].entity, truck);
    assert_eq!(commands[1].texture, TextureHandle(2));
}

#[test]
fn test_entity_spawned_mid_game_joins_next_frame() {
    let mut scene = Scene::new();
    scene.frame(0.1);
    assert!(scene.renderer.commands().is_empty());

    let tank = scene.spawn_vehicle(Vec2::ZERO, Vec2::new(10.0, 0.0), "tank-image");
    let report = scene.frame(1.0);
    assert_eq!(report.drawn, 1);
    assert_eq!(scene.position(tank), Vec2::new(10.0, 0.0));
}

#[test]
fn test_unknown_texture_does_not_stop_the_frame() {
    let mut scene = Scene::new();
    let ghost = scene.spawn_vehicle(Vec2::ZERO, Vec2::ZERO, "ghost-image");
    let tank = scene.spawn_vehicle(Vec2::ZERO, Vec2::new(1.0, 1.0), "tank-image");

    let report = scene.frame(1.0);
    assert_eq!(report.drawn, 1);
    assert_eq!(
        report.failures,
        vec![RenderError::TextureNotFound {
            entity: ghost,
            asset_id: "ghost-image".to_string(),
        }]
    );
    assert_eq!(scene.renderer.commands()[0].entity, tank);
    assert_eq!(scene.position(tank), Vec2::new(1.0, 1.0));
}

#[test]
fn test_killed_entity_leaves_both_systems() {
    let mut scene = Scene::new();
    let tank = scene.spawn_vehicle(Vec2::ZERO, Vec2::new(1.0, 0.0), "tank-image");
    let truck = scene.spawn_vehicle(Vec2::ZERO, Vec2::new(0.0, 1.0), "truck-image");
    scene.frame(1.0);

    scene.registry.kill_entity(tank).unwrap();
    let report = scene.frame(1.0);
    assert_eq!(report.drawn, 1);
    assert_eq!(scene.renderer.commands()[0].entity, truck);
    assert!(!scene.registry.is_alive(tank));
    assert!(
        scene
            .registry
            .get_system::<MovementSystem>()
            .unwrap()
            .entities()
            .iter()
            .all(|&e| e != tank)
    );
}

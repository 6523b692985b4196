//! Velocity integration.

use rigel_ecs::{EcsError, System, SystemMembership, World};
use rigel_math::Transform2D;
use tracing::debug;

use crate::components::RigidBody;

/// Moves every entity with a [`Transform2D`] and a [`RigidBody`] by its
/// velocity.
#[derive(Debug)]
pub struct MovementSystem {
    membership: SystemMembership,
}

impl MovementSystem {
    /// Create the system.
    ///
    /// # Errors
    ///
    /// Fails if the component type table is full.
    pub fn new() -> Result<Self, EcsError> {
        let membership = SystemMembership::new()
            .require::<Transform2D>()?
            .require::<RigidBody>()?;
        Ok(Self { membership })
    }

    /// Advance each member's position by `velocity * dt` and return how many
    /// entities moved.
    ///
    /// Members whose components were removed since the last registry update
    /// are skipped.
    pub fn update(&self, world: &mut World, dt: f32) -> usize {
        let mut moved = 0;
        for &entity in self.entities() {
            let velocity = match world.get_component::<RigidBody>(entity) {
                Ok(body) => body.velocity,
                Err(err) => {
                    debug!(entity = %entity, error = %err, "skipping entity without rigid body");
                    continue;
                }
            };
            match world.get_component_mut::<Transform2D>(entity) {
                Ok(transform) => {
                    transform.position += velocity * dt;
                    moved += 1;
                }
                Err(err) => {
                    debug!(entity = %entity, error = %err, "skipping entity without transform");
                }
            }
        }
        moved
    }
}

impl System for MovementSystem {
    fn membership(&self) -> &SystemMembership {
        &self.membership
    }

    fn membership_mut(&mut self) -> &mut SystemMembership {
        &mut self.membership
    }

    fn name(&self) -> &'static str {
        "MovementSystem"
    }
}

#[cfg(test)]
mod tests {
    use rigel_ecs::Registry;
    use rigel_math::Vec2;

    use super::*;

    fn registry_with_movement() -> Registry {
        let mut registry = Registry::new();
        registry.add_system(MovementSystem::new().unwrap());
        registry
    }

    #[test]
    fn test_position_advances_by_velocity() {
        let mut registry = registry_with_movement();
        let tank = registry.create_entity();
        registry
            .add_component(tank, Transform2D::from_position(Vec2::new(10.0, 30.0)))
            .unwrap();
        registry.add_component(tank, RigidBody::new(40.0, 0.0)).unwrap();
        registry.update();

        let (movement, world) = registry.system_with_world::<MovementSystem>().unwrap();
        assert_eq!(movement.update(world, 0.5), 1);

        let transform = registry.get_component::<Transform2D>(tank).unwrap();
        assert_eq!(transform.position, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_entity_without_body_is_not_moved() {
        let mut registry = registry_with_movement();
        let post = registry.create_entity();
        registry
            .add_component(post, Transform2D::from_position(Vec2::new(1.0, 2.0)))
            .unwrap();
        registry.update();

        let (movement, world) = registry.system_with_world::<MovementSystem>().unwrap();
        assert_eq!(movement.update(world, 1.0), 0);
        assert_eq!(
            registry.get_component::<Transform2D>(post).unwrap().position,
            Vec2::new(1.0, 2.0)
        );
    }

    #[test]
    fn test_component_removed_mid_frame_is_skipped() {
        let mut registry = registry_with_movement();
        let truck = registry.create_entity();
        registry.add_component(truck, Transform2D::IDENTITY).unwrap();
        registry.add_component(truck, RigidBody::new(0.0, 50.0)).unwrap();
        registry.update();

        registry.remove_component::<RigidBody>(truck).unwrap();
        let (movement, world) = registry.system_with_world::<MovementSystem>().unwrap();
        assert!(movement.entities().contains(&truck));
        assert_eq!(movement.update(world, 1.0), 0);
    }
}

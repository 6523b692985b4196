//! The registry: the single owner of entities, components and systems.
//!
//! Everything that changes which entities a system sees is staged and
//! applied in [`Registry::update`], which the game loop calls once per frame
//! before running systems. Within a frame a system's membership list is
//! therefore fixed, even if entities are created, changed or killed while
//! systems run.

use std::any::TypeId;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info, trace};

use crate::component::Component;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::system::System;
use crate::world::World;

/// Central coordinator owning the [`World`] and every registered [`System`].
///
/// One instance per system type is kept, keyed by the system's Rust type.
#[derive(Default)]
pub struct Registry {
    /// Entity and component storage.
    world: World,
    /// Registered systems keyed by type.
    systems: HashMap<TypeId, Box<dyn System>>,
    /// Systems registered since the last update that still need a full scan.
    unsynced_systems: HashSet<TypeId>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        debug!("registry created");
        Self::default()
    }

    /// Returns the entity and component storage.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Returns mutable entity and component storage.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    // -- Frame synchronisation --

    /// Apply every staged change to system membership.
    ///
    /// 1. Entities created or whose components changed since the last update
    ///    are added to each system now interested in them and removed from
    ///    each system no longer interested.
    /// 2. Systems registered since the last update are filled with every
    ///    matching live entity.
    /// 3. Entities marked for removal are dropped from every system, their
    ///    components are released, and their slots are freed for reuse.
    pub fn update(&mut self) {
        let staged = self.world.take_pending_adds();
        for &entity in &staged {
            let Some(signature) = self.world.signature(entity) else {
                continue;
            };
            for system in self.systems.values_mut() {
                let name = system.name();
                let membership = system.membership_mut();
                if membership.is_interested(signature) {
                    if membership.add_entity(entity) {
                        trace!(entity = %entity, system = name, "entity added to system");
                    }
                } else if membership.remove_entity(entity) {
                    trace!(entity = %entity, system = name, "entity removed from system");
                }
            }
        }

        for type_id in self.unsynced_systems.drain() {
            let Some(system) = self.systems.get_mut(&type_id) else {
                continue;
            };
            let membership = system.membership_mut();
            for entity in self.world.entities() {
                let interested = self
                    .world
                    .signature(entity)
                    .is_some_and(|sig| membership.is_interested(sig));
                if interested {
                    membership.add_entity(entity);
                }
            }
            debug!(system = system.name(), entities = system.entities().len(), "system synced");
        }

        let killed = self.world.take_pending_kills();
        for &entity in &killed {
            for system in self.systems.values_mut() {
                if system.membership_mut().remove_entity(entity) {
                    trace!(entity = %entity, system = system.name(), "entity removed from system");
                }
            }
            self.world.destroy_entity(entity);
        }

        if !staged.is_empty() || !killed.is_empty() {
            debug!(staged = staged.len(), killed = killed.len(), "registry updated");
        }
    }

    // -- Entity lifecycle --

    /// Create an entity. See [`World::create_entity`].
    pub fn create_entity(&mut self) -> Entity {
        self.world.create_entity()
    }

    /// Stage `entity` for removal at the next update.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle.
    pub fn kill_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.world.kill_entity(entity)
    }

    /// Returns `true` if `entity` is alive.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world.is_alive(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    // -- Component operations --

    /// Attach `value` to `entity`. See [`World::add_component`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] or
    /// [`EcsError::ComponentCapacityExceeded`].
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        self.world.add_component(entity, value)
    }

    /// Detach `T` from `entity`. See [`World::remove_component`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] or [`EcsError::ComponentNotFound`].
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.world.remove_component::<T>(entity)
    }

    /// Returns `true` if `entity` carries a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.world.has_component::<T>(entity)
    }

    /// Borrow `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] or [`EcsError::ComponentNotFound`].
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.world.get_component::<T>(entity)
    }

    /// Mutably borrow `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] or [`EcsError::ComponentNotFound`].
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.world.get_component_mut::<T>(entity)
    }

    // -- System management --

    /// Register `system`, replacing (and returning) any existing system of
    /// the same type.
    ///
    /// The new system's membership is filled at the next update.
    pub fn add_system<S: System>(&mut self, system: S) -> Option<S> {
        let type_id = TypeId::of::<S>();
        info!(system = system.name(), signature = ?system.signature(), "system registered");
        let previous = self.systems.insert(type_id, Box::new(system));
        self.unsynced_systems.insert(type_id);
        previous.and_then(|boxed| boxed.into_any().downcast::<S>().ok().map(|s| *s))
    }

    /// Unregister the system of type `S` and hand it back.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no `S` is registered.
    pub fn remove_system<S: System>(&mut self) -> Result<S, EcsError> {
        let type_id = TypeId::of::<S>();
        let boxed = self
            .systems
            .remove(&type_id)
            .ok_or_else(not_registered::<S>)?;
        self.unsynced_systems.remove(&type_id);
        info!(system = boxed.name(), "system removed");
        boxed
            .into_any()
            .downcast::<S>()
            .map(|s| *s)
            .map_err(|_| not_registered::<S>())
    }

    /// Returns `true` if a system of type `S` is registered.
    #[must_use]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<S>())
    }

    /// Borrow the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no `S` is registered.
    pub fn get_system<S: System>(&self) -> Result<&S, EcsError> {
        self.systems
            .get(&TypeId::of::<S>())
            .and_then(|system| (**system).as_any().downcast_ref::<S>())
            .ok_or_else(not_registered::<S>)
    }

    /// Mutably borrow the system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no `S` is registered.
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S, EcsError> {
        self.systems
            .get_mut(&TypeId::of::<S>())
            .and_then(|system| (**system).as_any_mut().downcast_mut::<S>())
            .ok_or_else(not_registered::<S>)
    }

    /// Borrow the system of type `S` together with the world, so the system
    /// can read and write components of its member entities.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::SystemNotFound`] if no `S` is registered.
    pub fn system_with_world<S: System>(&mut self) -> Result<(&mut S, &mut World), EcsError> {
        let Self { world, systems, .. } = self;
        let system = systems
            .get_mut(&TypeId::of::<S>())
            .and_then(|system| (**system).as_any_mut().downcast_mut::<S>())
            .ok_or_else(not_registered::<S>)?;
        Ok((system, world))
    }

    /// Number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }
}

fn not_registered<S: System>() -> EcsError {
    EcsError::SystemNotFound(std::any::type_name::<S>())
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut systems: Vec<&'static str> = self.systems.values().map(|s| s.name()).collect();
        systems.sort_unstable();
        f.debug_struct("Registry")
            .field("world", &self.world)
            .field("systems", &systems)
            .finish()
    }
}

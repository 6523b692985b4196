//! Entity and component storage.
//!
//! The [`World`] owns everything the registry knows about entities: the
//! allocator, one [`Signature`] per entity slot, one type-erased [`Pool`] per
//! component type, the staged add/kill queues, and the tag and group
//! indexes. It never touches system membership; that is the
//! [`Registry`](crate::Registry)'s job during `update()`.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::pool::{AnyPool, Pool};
use crate::signature::Signature;

/// Entity lifecycle, component storage and entity metadata.
#[derive(Default)]
pub struct World {
    /// Entity slot allocator.
    allocator: EntityAllocator,
    /// Current component signature per entity slot.
    signatures: Vec<Signature>,
    /// One pool per component type, indexed by [`ComponentTypeId`].
    pools: Vec<Option<Box<dyn AnyPool>>>,
    /// Entities whose signature changed since the last update (including new
    /// entities).
    pending_add: BTreeSet<Entity>,
    /// Entities waiting to be destroyed at the next update.
    pending_kill: BTreeSet<Entity>,
    tag_by_entity: HashMap<Entity, String>,
    entity_by_tag: HashMap<String, Entity>,
    group_by_entity: HashMap<Entity, String>,
    entities_by_group: HashMap<String, BTreeSet<Entity>>,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Create an entity with no components.
    ///
    /// The entity is staged: systems see it only after the next
    /// [`Registry::update`](crate::Registry::update).
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        let slot = entity.slot();
        if slot >= self.signatures.len() {
            self.signatures.resize(slot + 1, Signature::EMPTY);
        }
        self.signatures[slot].reset();
        self.pending_add.insert(entity);
        debug!(entity = %entity, "entity created");
        entity
    }

    /// Stage `entity` for destruction at the next update.
    ///
    /// Until then it stays alive and keeps its components.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle.
    pub fn kill_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        if self.pending_kill.insert(entity) {
            debug!(entity = %entity, "entity marked for removal");
        }
        Ok(())
    }

    /// Returns `true` if `entity` is the current occupant of its slot.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Returns `true` if `entity` will be destroyed at the next update.
    #[must_use]
    pub fn is_pending_kill(&self, entity: Entity) -> bool {
        self.pending_kill.contains(&entity)
    }

    /// Number of live entities (including ones staged for removal).
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.allocator.live_count()
    }

    /// Iterate over live entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.allocator.iter_alive()
    }

    /// The current component signature of `entity`.
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        if !self.is_alive(entity) {
            return None;
        }
        self.signatures.get(entity.slot()).copied()
    }

    // -- Component operations --

    /// Attach `value` to `entity`, overwriting any existing `T`.
    ///
    /// The pool for `T` is created on first use and grown to cover every
    /// entity slot. Systems pick up the change at the next update.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle, or
    /// [`EcsError::ComponentCapacityExceeded`] if `T` is a new type and no
    /// ids are left.
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let id = ComponentTypeId::of::<T>()?;
        let slots = self.allocator.slot_count();

        let pool = self.pool_or_insert::<T>(id);
        pool.resize(slots);
        pool.set(entity.slot(), value)?;

        self.signatures[entity.slot()].set(id);
        self.pending_add.insert(entity);
        debug!(entity = %entity, component = T::type_name(), id = id.index(), "component added");
        Ok(())
    }

    /// Detach `T` from `entity` and drop the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle, or
    /// [`EcsError::ComponentNotFound`] if the entity has no `T`.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let id = self.present_id::<T>(entity)?;

        self.signatures[entity.slot()].clear(id);
        if let Some(pool) = self.pools[usize::from(id.index())].as_mut() {
            pool.remove_slot(entity.slot());
        }
        self.pending_add.insert(entity);
        debug!(entity = %entity, component = T::type_name(), id = id.index(), "component removed");
        Ok(())
    }

    /// Returns `true` if `entity` is alive and carries a `T`.
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        let Some(id) = ComponentTypeId::lookup::<T>() else {
            return false;
        };
        self.signature(entity).is_some_and(|sig| sig.test(id))
    }

    /// Borrow `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] or [`EcsError::ComponentNotFound`].
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        self.ensure_alive(entity)?;
        self.present_id::<T>(entity)?;
        self.pool::<T>()
            .and_then(|pool| pool.get(entity.slot()))
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// Mutably borrow `entity`'s `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] or [`EcsError::ComponentNotFound`].
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.ensure_alive(entity)?;
        self.present_id::<T>(entity)?;
        self.pool_mut::<T>()
            .and_then(|pool| pool.get_mut(entity.slot()))
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// The pool holding every `T`, if any `T` was ever added.
    ///
    /// Slots of dead entities are always empty, but a filled slot is only
    /// meaningful together with the entity's signature.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&Pool<T>> {
        let id = ComponentTypeId::lookup::<T>()?;
        self.pools
            .get(usize::from(id.index()))
            .and_then(Option::as_ref)
            .and_then(|pool| (**pool).as_any().downcast_ref::<Pool<T>>())
    }

    fn pool_mut<T: Component>(&mut self) -> Option<&mut Pool<T>> {
        let id = ComponentTypeId::lookup::<T>()?;
        self.pools
            .get_mut(usize::from(id.index()))
            .and_then(Option::as_mut)
            .and_then(|pool| (**pool).as_any_mut().downcast_mut::<Pool<T>>())
    }

    fn pool_or_insert<T: Component>(&mut self, id: ComponentTypeId) -> &mut Pool<T> {
        let index = usize::from(id.index());
        if index >= self.pools.len() {
            self.pools.resize_with(index + 1, || None);
        }
        let slot = &mut self.pools[index];
        if slot.is_none() {
            debug!(component = T::type_name(), id = index, "component pool created");
        }
        let pool = slot.get_or_insert_with(|| Box::new(Pool::<T>::new()));
        match (**pool).as_any_mut().downcast_mut::<Pool<T>>() {
            Some(pool) => pool,
            // A type id maps to exactly one Rust type for the process lifetime.
            None => unreachable!("pool for component id {index} holds a different type"),
        }
    }

    fn ensure_alive(&self, entity: Entity) -> Result<(), EcsError> {
        if self.is_alive(entity) {
            Ok(())
        } else {
            Err(EcsError::EntityNotAlive(entity))
        }
    }

    /// The id of `T` if `entity` currently carries it.
    fn present_id<T: Component>(&self, entity: Entity) -> Result<ComponentTypeId, EcsError> {
        ComponentTypeId::lookup::<T>()
            .filter(|&id| self.signatures[entity.slot()].test(id))
            .ok_or_else(|| not_found::<T>(entity))
    }

    // -- Staging (driven by the registry) --

    /// Drain entities whose membership must be re-evaluated. Entities that
    /// died in the meantime are dropped.
    pub(crate) fn take_pending_adds(&mut self) -> Vec<Entity> {
        let staged = std::mem::take(&mut self.pending_add);
        staged.into_iter().filter(|&e| self.is_alive(e)).collect()
    }

    /// Drain entities staged for destruction.
    pub(crate) fn take_pending_kills(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.pending_kill).into_iter().collect()
    }

    /// Number of entities staged for membership re-evaluation.
    #[must_use]
    pub fn pending_add_count(&self) -> usize {
        self.pending_add.len()
    }

    /// Destroy `entity`: clear its signature, empty its pool slots, drop its
    /// tag and group, and free the slot for reuse.
    pub(crate) fn destroy_entity(&mut self, entity: Entity) {
        if !self.is_alive(entity) {
            return;
        }
        let slot = entity.slot();
        self.signatures[slot].reset();
        for pool in self.pools.iter_mut().flatten() {
            pool.remove_slot(slot);
        }
        self.remove_entity_tag(entity);
        self.remove_entity_group(entity);
        self.allocator.free(entity);
        debug!(entity = %entity, "entity destroyed");
    }

    // -- Tags --

    /// Give `entity` a unique tag.
    ///
    /// An entity has at most one tag, so this replaces any previous tag on
    /// `entity`. If another entity held `tag`, it loses it.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle.
    pub fn tag_entity(&mut self, entity: Entity, tag: impl Into<String>) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let tag = tag.into();
        self.remove_entity_tag(entity);
        if let Some(previous) = self.entity_by_tag.insert(tag.clone(), entity) {
            self.tag_by_entity.remove(&previous);
        }
        debug!(entity = %entity, tag = %tag, "entity tagged");
        self.tag_by_entity.insert(entity, tag);
        Ok(())
    }

    /// Returns `true` if `entity` carries `tag`.
    #[must_use]
    pub fn entity_has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.entity_by_tag.get(tag) == Some(&entity)
    }

    /// The entity carrying `tag`, if any.
    #[must_use]
    pub fn get_entity_by_tag(&self, tag: &str) -> Option<Entity> {
        self.entity_by_tag.get(tag).copied()
    }

    /// The tag of `entity`, if any.
    #[must_use]
    pub fn entity_tag(&self, entity: Entity) -> Option<&str> {
        self.tag_by_entity.get(&entity).map(String::as_str)
    }

    /// Remove `entity`'s tag. Returns `false` if it had none.
    pub fn remove_entity_tag(&mut self, entity: Entity) -> bool {
        match self.tag_by_entity.remove(&entity) {
            Some(tag) => {
                self.entity_by_tag.remove(&tag);
                true
            }
            None => false,
        }
    }

    // -- Groups --

    /// Put `entity` into `group`, moving it out of any group it was in.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotAlive`] for a stale handle.
    pub fn group_entity(&mut self, entity: Entity, group: impl Into<String>) -> Result<(), EcsError> {
        self.ensure_alive(entity)?;
        let group = group.into();
        self.remove_entity_group(entity);
        self.entities_by_group
            .entry(group.clone())
            .or_default()
            .insert(entity);
        self.group_by_entity.insert(entity, group);
        Ok(())
    }

    /// Returns `true` if `entity` is in `group`.
    #[must_use]
    pub fn entity_belongs_to_group(&self, entity: Entity, group: &str) -> bool {
        self.entities_by_group
            .get(group)
            .is_some_and(|members| members.contains(&entity))
    }

    /// Every entity in `group`, in index order.
    #[must_use]
    pub fn get_entities_by_group(&self, group: &str) -> Vec<Entity> {
        self.entities_by_group
            .get(group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Remove `entity` from its group. Returns `false` if it had none.
    pub fn remove_entity_group(&mut self, entity: Entity) -> bool {
        let Some(group) = self.group_by_entity.remove(&entity) else {
            return false;
        };
        if let Some(members) = self.entities_by_group.get_mut(&group) {
            members.remove(&entity);
            if members.is_empty() {
                self.entities_by_group.remove(&group);
            }
        }
        true
    }
}

fn not_found<T: Component>(entity: Entity) -> EcsError {
    EcsError::ComponentNotFound {
        entity,
        component: T::type_name(),
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.allocator.live_count())
            .field("pools", &self.pools.iter().flatten().count())
            .field("pending_add", &self.pending_add.len())
            .field("pending_kill", &self.pending_kill.len())
            .field("tags", &self.entity_by_tag.len())
            .field("groups", &self.entities_by_group.len())
            .finish()
    }
}

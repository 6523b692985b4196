//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight handle with no inherent data: a slot
//! `index` used to address signatures and component pools, plus a
//! `generation` that changes whenever the slot is recycled. Handles carry no
//! reference to the registry that created them; every operation goes through
//! the [`Registry`](crate::Registry) passed at the call site.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// A unique entity handle.
///
/// Ordering compares `index` first, so entities sort by creation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create an entity handle from raw parts.
    #[must_use]
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this entity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation of this entity's slot when the handle was
    /// issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// The slot index as a `usize`, for indexing pools and signature tables.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index as usize
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Allocates entity handles.
///
/// Fresh slots are handed out with strictly increasing indices. Freed slots
/// go onto a FIFO free list and are reused before any new slot is opened;
/// each reuse bumps the slot's generation so handles to the previous
/// occupant stop resolving.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation of every slot ever opened.
    generations: Vec<u32>,
    /// Whether each slot is currently occupied.
    alive: Vec<bool>,
    /// Freed slots waiting to be reused, oldest first.
    free: VecDeque<u32>,
    /// Number of occupied slots.
    live: usize,
}

impl EntityAllocator {
    /// Creates an empty allocator. The first entity gets index 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an entity, recycling a freed slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        let entity = if let Some(index) = self.free.pop_front() {
            let slot = index as usize;
            self.alive[slot] = true;
            Entity::from_raw(index, self.generations[slot])
        } else {
            let index = u32::try_from(self.generations.len())
                .unwrap_or_else(|_| panic!("entity index space exhausted"));
            self.generations.push(0);
            self.alive.push(true);
            Entity::from_raw(index, 0)
        };
        self.live += 1;
        entity
    }

    /// Frees `entity`'s slot. Returns `false` if the handle was not alive.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.slot();
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push_back(entity.index);
        self.live -= 1;
        true
    }

    /// Returns `true` if `entity` refers to the current occupant of its slot.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.slot();
        self.alive.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == entity.generation
    }

    /// Number of slots ever opened (the high-water mark of indices).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.generations.len()
    }

    /// Number of live entities.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Iterate over every live entity in index order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .zip(&self.generations)
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, &generation))| Entity::from_raw(index as u32, generation))
    }
}

//! Core [`Component`] trait and component type identity.
//!
//! Every piece of data stored in the ECS must implement [`Component`]. Each
//! distinct component type is assigned a small [`ComponentTypeId`] the first
//! time it is registered. Ids are handed out in registration order starting
//! at 0 and are stable for the lifetime of the process, which lets a
//! [`Signature`](crate::Signature) use them directly as bit positions.
//!
//! ## Type Identity
//!
//! Ids come from a process-global [`ComponentTypeRegistry`] keyed by
//! [`std::any::TypeId`]. Registration beyond [`MAX_COMPONENTS`] fails with
//! [`EcsError::ComponentCapacityExceeded`] instead of silently truncating the
//! signature.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::EcsError;
use crate::signature::MAX_COMPONENTS;

/// A small integer identifying a component type. Doubles as the bit position
/// of that type in a [`Signature`](crate::Signature).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Create an id from a raw bit index.
    ///
    /// Only meaningful for indices below [`MAX_COMPONENTS`]; ids for real
    /// component types should come from [`ComponentTypeId::of`].
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Self(index)
    }

    /// Returns the bit index of this id.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the id for `T`, registering it in the global registry on first
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacityExceeded`] if `T` is new and all
    /// [`MAX_COMPONENTS`] ids are taken.
    pub fn of<T: Component>() -> Result<Self, EcsError> {
        if let Some(id) = Self::lookup::<T>() {
            return Ok(id);
        }
        global()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register::<T>()
    }

    /// Returns the id for `T` if it has been registered, without registering
    /// it.
    #[must_use]
    pub fn lookup<T: Component>() -> Option<Self> {
        global()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lookup::<T>()
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// The core component trait.
///
/// Components are plain data. The trait only asks for `Send + Sync + 'static`
/// so values can live in type-erased pools; override
/// [`Component::type_name`] to get a shorter name in logs and errors.
///
/// # Examples
///
/// ```rust
/// use rigel_ecs::Component;
///
/// #[derive(Debug, Clone, Copy)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Assigns [`ComponentTypeId`]s to Rust types in first-registration order.
///
/// The engine uses a single process-global instance (see
/// [`ComponentTypeId::of`]); separate instances are useful where an isolated
/// id space is wanted.
#[derive(Debug)]
pub struct ComponentTypeRegistry {
    by_type: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
    capacity: usize,
}

impl ComponentTypeRegistry {
    /// Create an empty registry with room for [`MAX_COMPONENTS`] types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            names: Vec::new(),
            capacity: MAX_COMPONENTS,
        }
    }

    /// Register `T`, returning its existing id if it was registered before.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacityExceeded`] when `T` is new and
    /// the registry is full.
    pub fn register<T: Component>(&mut self) -> Result<ComponentTypeId, EcsError> {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.by_type.get(&type_id) {
            return Ok(id);
        }

        let index = self.names.len();
        if index >= self.capacity {
            return Err(EcsError::ComponentCapacityExceeded {
                type_name: T::type_name(),
                capacity: self.capacity,
            });
        }

        // `capacity` never exceeds MAX_COMPONENTS, so the index fits in a u8.
        let id = ComponentTypeId(index as u8);
        self.by_type.insert(type_id, id);
        self.names.push(T::type_name());
        tracing::debug!(component = T::type_name(), id = index, "registered component type");
        Ok(id)
    }

    /// Returns the id of `T` if registered.
    #[must_use]
    pub fn lookup<T: Component>(&self) -> Option<ComponentTypeId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the name recorded for `id`.
    #[must_use]
    pub fn name(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.names.get(usize::from(id.0)).copied()
    }

    /// Number of registered component types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Maximum number of types this registry accepts.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ComponentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<ComponentTypeRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<ComponentTypeRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(ComponentTypeRegistry::new()))
}

/// Returns the registered name of `id` in the global registry.
#[must_use]
pub fn component_name(id: ComponentTypeId) -> Option<&'static str> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .name(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health;
    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    struct Velocity;
    impl Component for Velocity {}

    struct Marker<const N: usize>;
    impl<const N: usize> Component for Marker<N> {}

    macro_rules! register_markers {
        ($registry:expr; $($n:literal)*) => {
            $( $registry.register::<Marker<$n>>().unwrap(); )*
        };
    }

    #[test]
    fn test_ids_assigned_in_registration_order() {
        let mut registry = ComponentTypeRegistry::new();
        let health = registry.register::<Health>().unwrap();
        let velocity = registry.register::<Velocity>().unwrap();
        assert_eq!(health.index(), 0);
        assert_eq!(velocity.index(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_is_stable() {
        let mut registry = ComponentTypeRegistry::new();
        let first = registry.register::<Health>().unwrap();
        let _ = registry.register::<Velocity>().unwrap();
        let again = registry.register::<Health>().unwrap();
        assert_eq!(first, again);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_lookup_does_not_register() {
        let registry = ComponentTypeRegistry::new();
        assert_eq!(registry.lookup::<Health>(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names() {
        let mut registry = ComponentTypeRegistry::new();
        let health = registry.register::<Health>().unwrap();
        let velocity = registry.register::<Velocity>().unwrap();
        assert_eq!(registry.name(health), Some("Health"));
        assert!(registry.name(velocity).unwrap().ends_with("Velocity"));
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut registry = ComponentTypeRegistry::new();
        register_markers!(registry;
            0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
            16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        assert_eq!(registry.len(), MAX_COMPONENTS);

        // Already-registered types still resolve when full.
        assert!(registry.register::<Marker<31>>().is_ok());

        let err = registry.register::<Marker<32>>().unwrap_err();
        assert!(matches!(
            err,
            EcsError::ComponentCapacityExceeded { capacity: MAX_COMPONENTS, .. }
        ));
    }

    #[test]
    fn test_global_ids_are_stable_and_distinct() {
        let health = ComponentTypeId::of::<Health>().unwrap();
        let velocity = ComponentTypeId::of::<Velocity>().unwrap();
        assert_ne!(health, velocity);
        assert_eq!(ComponentTypeId::of::<Health>().unwrap(), health);
        assert_eq!(ComponentTypeId::lookup::<Health>(), Some(health));
        assert_eq!(component_name(health), Some("Health"));
    }
}

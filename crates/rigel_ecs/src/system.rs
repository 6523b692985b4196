//! The [`System`] trait and system membership.
//!
//! A system declares the component types it requires when it is constructed
//! and is handed the matching entities by the [`Registry`](crate::Registry).
//! Membership lives in a [`SystemMembership`] embedded in each concrete
//! system; only the registry mutates it, and only during
//! [`Registry::update`](crate::Registry::update).

use std::any::Any;

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::signature::Signature;

/// The required-component signature of a system plus the entities that
/// currently match it.
///
/// Entities are kept sorted by index, so iteration order is deterministic.
///
/// ```rust
/// use rigel_ecs::{Component, SystemMembership};
///
/// struct Position;
/// impl Component for Position {}
/// struct Velocity;
/// impl Component for Velocity {}
///
/// let membership = SystemMembership::new()
///     .require::<Position>()?
///     .require::<Velocity>()?;
/// assert_eq!(membership.signature().count(), 2);
/// # Ok::<(), rigel_ecs::EcsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SystemMembership {
    signature: Signature,
    entities: Vec<Entity>,
}

impl SystemMembership {
    /// Create a membership with an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `T` to the required components.
    ///
    /// # Errors
    ///
    /// Fails if `T` cannot be assigned a component type id.
    pub fn require<T: Component>(mut self) -> Result<Self, EcsError> {
        self.require_component::<T>()?;
        Ok(self)
    }

    /// Add `T` to the required components in place.
    ///
    /// # Errors
    ///
    /// Fails if `T` cannot be assigned a component type id.
    pub fn require_component<T: Component>(&mut self) -> Result<(), EcsError> {
        self.signature.set(ComponentTypeId::of::<T>()?);
        Ok(())
    }

    /// The required-component signature.
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Returns `true` if an entity with `entity_signature` satisfies this
    /// system's requirements.
    #[must_use]
    pub fn is_interested(&self, entity_signature: Signature) -> bool {
        entity_signature.contains_all(self.signature)
    }

    /// The entities currently matched, in index order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns `true` if `entity` is a member.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.binary_search(&entity).is_ok()
    }

    /// Number of member entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entity is a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Insert `entity`. Returns `false` if it was already a member.
    pub(crate) fn add_entity(&mut self, entity: Entity) -> bool {
        match self.entities.binary_search(&entity) {
            Ok(_) => false,
            Err(pos) => {
                self.entities.insert(pos, entity);
                true
            }
        }
    }

    /// Remove `entity`. Returns `false` if it was not a member.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        match self.entities.binary_search(&entity) {
            Ok(pos) => {
                self.entities.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}

/// Upcast helper so the registry can downcast `dyn System` to a concrete
/// type. Implemented for every `'static` type.
pub trait AsAny: Any {
    /// Upcast to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Upcast to `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Upcast a boxed value.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A unit of per-frame logic over every entity carrying a required set of
/// components.
///
/// Concrete systems embed a [`SystemMembership`] built in their constructor
/// and expose it through [`System::membership`]. Per-frame update methods are
/// inherent to each system, since their inputs differ (a time step, a
/// renderer, ...).
pub trait System: AsAny {
    /// The system's membership (signature and matched entities).
    fn membership(&self) -> &SystemMembership;

    /// Mutable access to the membership, used by the registry.
    fn membership_mut(&mut self) -> &mut SystemMembership;

    /// A human-readable name for logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The required-component signature.
    fn signature(&self) -> Signature {
        self.membership().signature()
    }

    /// A snapshot-friendly view of the matched entities.
    fn entities(&self) -> &[Entity] {
        self.membership().entities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Position;
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {}

    #[test]
    fn test_require_sets_bits() {
        let membership = SystemMembership::new()
            .require::<Position>()
            .unwrap()
            .require::<Velocity>()
            .unwrap();
        let position = ComponentTypeId::lookup::<Position>().unwrap();
        let velocity = ComponentTypeId::lookup::<Velocity>().unwrap();
        assert!(membership.signature().test(position));
        assert!(membership.signature().test(velocity));
        assert_eq!(membership.signature().count(), 2);
    }

    #[test]
    fn test_interest() {
        let membership = SystemMembership::new().require::<Position>().unwrap();
        let position = ComponentTypeId::lookup::<Position>().unwrap();
        let velocity = ComponentTypeId::of::<Velocity>().unwrap();

        let mut entity_sig = Signature::new();
        assert!(!membership.is_interested(entity_sig));
        entity_sig.set(velocity);
        assert!(!membership.is_interested(entity_sig));
        entity_sig.set(position);
        assert!(membership.is_interested(entity_sig));
    }

    #[test]
    fn test_membership_sorted_and_deduplicated() {
        let mut membership = SystemMembership::new();
        let e = |i| Entity::from_raw(i, 0);
        assert!(membership.add_entity(e(5)));
        assert!(membership.add_entity(e(1)));
        assert!(membership.add_entity(e(3)));
        assert!(!membership.add_entity(e(3)));
        assert_eq!(membership.entities(), &[e(1), e(3), e(5)]);

        assert!(membership.remove_entity(e(3)));
        assert!(!membership.remove_entity(e(3)));
        assert!(!membership.contains(e(3)));
        assert_eq!(membership.len(), 2);
    }
}

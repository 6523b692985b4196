//! ECS error types.

use crate::entity::Entity;

/// Errors returned by registry, pool and system operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// More distinct component types were registered than a
    /// [`Signature`](crate::Signature) can represent.
    #[error("cannot register component '{type_name}': all {capacity} component type ids are in use")]
    ComponentCapacityExceeded {
        /// Name of the component type that failed to register.
        type_name: &'static str,
        /// The configured maximum number of component types.
        capacity: usize,
    },

    /// The entity handle is stale (killed) or was never created by this
    /// registry.
    #[error("{0} is not alive")]
    EntityNotAlive(Entity),

    /// The entity does not carry the requested component.
    #[error("component '{component}' not present on {entity}")]
    ComponentNotFound {
        /// The entity that was queried.
        entity: Entity,
        /// Name of the missing component type.
        component: &'static str,
    },

    /// No system of the requested type is registered.
    #[error("system '{0}' is not registered")]
    SystemNotFound(&'static str),

    /// A pool slot was written past the end of the pool.
    #[error("pool index {index} out of range (len {len})")]
    PoolIndexOutOfRange {
        /// The requested slot.
        index: usize,
        /// The current pool length.
        len: usize,
    },
}

/// Convenience alias for ECS results.
pub type EcsResult<T> = Result<T, EcsError>;

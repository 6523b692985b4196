//! # rigel_ecs
//!
//! The entity-component-system core of the rigel engine.
//!
//! This crate provides:
//!
//! - [`Signature`]: fixed-width bit-set of component types.
//! - [`Component`] trait and [`ComponentTypeId`]: stable small ids per type.
//! - [`Entity`]: generational entity handles, and [`EntityAllocator`].
//! - [`Pool`]: entity-indexed storage for one component type.
//! - [`System`] trait and [`SystemMembership`]: required components and
//!   matched entities.
//! - [`World`]: entity lifecycle, component storage, tags and groups.
//! - [`Registry`]: owner of the world and the systems; applies staged
//!   changes once per frame in [`Registry::update`].
//!
//! ## Frame Discipline
//!
//! ```rust
//! use rigel_ecs::{Component, Registry, System, SystemMembership};
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Position(f32);
//! impl Component for Position {}
//!
//! struct Printer {
//!     membership: SystemMembership,
//! }
//!
//! impl System for Printer {
//!     fn membership(&self) -> &SystemMembership { &self.membership }
//!     fn membership_mut(&mut self) -> &mut SystemMembership { &mut self.membership }
//! }
//!
//! let mut registry = Registry::new();
//! registry.add_system(Printer {
//!     membership: SystemMembership::new().require::<Position>()?,
//! });
//!
//! let e = registry.create_entity();
//! registry.add_component(e, Position(1.0))?;
//! assert!(registry.get_system::<Printer>()?.entities().is_empty());
//!
//! registry.update();
//! assert_eq!(registry.get_system::<Printer>()?.entities(), &[e]);
//! # Ok::<(), rigel_ecs::EcsError>(())
//! ```

pub mod component;
pub mod entity;
pub mod error;
pub mod pool;
pub mod registry;
pub mod signature;
pub mod system;
pub mod world;

pub use component::{Component, ComponentTypeId, ComponentTypeRegistry, component_name};
pub use entity::{Entity, EntityAllocator};
pub use error::{EcsError, EcsResult};
pub use pool::{AnyPool, Pool};
pub use registry::Registry;
pub use signature::{MAX_COMPONENTS, Signature};
pub use system::{AsAny, System, SystemMembership};
pub use world::World;

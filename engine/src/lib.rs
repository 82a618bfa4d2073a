//! An entity-component-system core for real-time simulations.
//!
//! The [`ecs::World`] owns entities, entity classes and systems. It keeps an index from
//! component type to entities plus a cache of entity groups keyed by
//! [`ecs::ComponentTypeGroup`], and drives the per-frame execution of registered systems.
//!
//! ```rust,ignore
//! use sol_ecs::ecs::{EntityClass, World, WorldId};
//!
//! let mut world = World::new(WorldId::new(0));
//! world.add_entity_class(EntityClass::new("bullet").with(Position::default()));
//! let bullet = world.instantiate_entity_class("bullet", "b1")?;
//!
//! let group = world.group::<Position>();
//! assert_eq!(world.entity_group(&group), &[bullet]);
//! ```

// Lets `#[derive(Component)]` expand to `::sol_ecs::...` paths inside this crate too.
extern crate self as sol_ecs;

pub mod ecs;
pub mod logging;

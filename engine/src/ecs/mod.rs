pub mod class;
pub mod component;
pub mod entity;
pub mod error;
pub mod system;
pub(crate) mod util;
pub mod world;

pub use class::{ClassLoader, EntityClass};
pub use component::{Component, ComponentTypeGroup, IntoGroup};
pub use entity::{Entity, EntityId, EntityMut};
pub use error::{Error, Result};
pub use system::{Context, System, SystemHandle};
pub use world::{Id as WorldId, World};

pub use sol_ecs_macros::Component;

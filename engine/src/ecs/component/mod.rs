//! Component management for the ECS.
//!
//! Components are the plain data records attached to entities. Each concrete component type is
//! given a dense numeric [`Id`] by the [`Registry`] the first time it is seen, and sets of those
//! ids form the [`ComponentTypeGroup`] signatures used to query the world.
//!
//! ## Architecture
//!
//! - [`Component`]: The trait that all component types must implement
//! - [`AnyComponent`]: The object-safe form a component takes once stored on an entity
//! - [`Id`]: A unique identifier for each registered component type
//! - [`Registry`]: Thread-safe registration and lookup of component types
//! - [`ComponentTypeGroup`]: A set of component types, used as a query signature
//!
//! ## Usage
//!
//! ```ignore
//! use sol_ecs::ecs::component::{Component, Registry};
//!
//! #[derive(Component, Clone, serde::Serialize)]
//! struct Position { x: f32, y: f32 }
//!
//! let registry = Registry::new();
//! let pos_id = registry.register::<Position>();
//! ```

use std::any::Any;

use serde::Serialize;

mod group;
mod registry;

pub use group::{ComponentTypeGroup, IntoGroup};
pub use registry::{Id, Info, Registry};

/// A trait representing a component in the ECS.
///
/// `Clone` lets entity classes stamp out fresh copies for every instance and `Serialize` lets
/// the world describe its entities in the debug dump.
pub trait Component: 'static + Clone + Serialize + Send + Sync {}

/// The type-erased view of a component stored on an entity.
///
/// Implemented for every [`Component`]; user code never implements it directly.
pub trait AnyComponent: Send + Sync + 'static {
    /// Borrow the component as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow the component as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert the boxed component into a boxed `Any` so it can be moved out by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clone the component into a new, independent box.
    fn clone_boxed(&self) -> Box<dyn AnyComponent>;

    /// Encode the component value as JSON.
    fn to_json(&self) -> serde_json::Value;

    /// The full Rust type name of the component.
    fn type_name(&self) -> &'static str;

    /// Register the component's type with the registry and return its id.
    fn register(&self, registry: &Registry) -> Id;
}

impl<C: Component> AnyComponent for C {
    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyComponent> {
        Box::new(self.clone())
    }

    fn to_json(&self) -> serde_json::Value {
        // Serialization into a `Value` only fails for maps with non-string keys.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    #[inline]
    fn register(&self, registry: &Registry) -> Id {
        registry.register::<C>()
    }
}

impl std::fmt::Debug for dyn AnyComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.type_name(), self.to_json())
    }
}

//! Entity classes: named templates of component values.
//!
//! A class is registered in a [`World`] under its name and stamped out as often as needed with
//! [`World::instantiate_entity_class`]. Every instance receives its own clones of the templated
//! components, so instances never share mutable state.
//!
//! ```rust,ignore
//! world.add_entity_class(
//!     EntityClass::new("Bullet")
//!         .with(Position { x: 0.0, y: 0.0 })
//!         .with(Velocity { dx: 4.0, dy: 0.0 }),
//! );
//! let bullet = world.instantiate_entity_class("Bullet", "bullet-1")?;
//! ```

use std::{any::TypeId as StdTypeId, fmt};

use crate::ecs::{
    component::{AnyComponent, Component},
    entity::Entity,
    util::short_type_name,
    world::World,
};

mod loader;

pub use loader::ClassLoader;

/// A named template of component values.
pub struct EntityClass {
    name: String,
    components: Vec<(StdTypeId, Box<dyn AnyComponent>)>,
}

impl EntityClass {
    /// Create an empty class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }

    /// Add a component value to the template. A later value of the same type replaces the
    /// earlier one.
    pub fn with<C: Component>(mut self, component: C) -> Self {
        self.insert_boxed(Box::new(component));
        self
    }

    pub(crate) fn insert_boxed(&mut self, component: Box<dyn AnyComponent>) {
        let type_id = component.as_any().type_id();
        match self.components.iter_mut().find(|(id, _)| *id == type_id) {
            Some((_, existing)) => *existing = component,
            None => self.components.push((type_id, component)),
        }
    }

    /// The name of the class.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of templated components.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the class templates no components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over the templated component values in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &dyn AnyComponent> + '_ {
        self.components.iter().map(|(_, component)| component.as_ref())
    }

    /// Get the templated value of type `C`, if any.
    pub fn get<C: Component>(&self) -> Option<&C> {
        let type_id = StdTypeId::of::<C>();
        self.components
            .iter()
            .find(|(id, _)| *id == type_id)
            .and_then(|(_, component)| component.as_any().downcast_ref::<C>())
    }

    /// Create a new unattached entity named `name` carrying fresh clones of every templated
    /// component.
    pub fn instantiate(&self, world: &mut World, name: impl Into<String>) -> Entity {
        let mut entity = world.create_entity(name);
        self.fill(&mut entity);
        entity
    }

    /// Clone every templated component into `entity`.
    pub(crate) fn fill(&self, entity: &mut Entity) {
        for (_, component) in &self.components {
            entity.insert_boxed(component.clone_boxed());
        }
    }

    /// Encode the templated values as a JSON object keyed by short component type name.
    pub(crate) fn components_json(&self) -> serde_json::Value {
        let map = self
            .components
            .iter()
            .map(|(_, component)| (short_type_name(component.type_name()), component.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl Clone for EntityClass {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            components: self
                .components
                .iter()
                .map(|(id, component)| (*id, component.clone_boxed()))
                .collect(),
        }
    }
}

impl fmt::Debug for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityClass")
            .field("name", &self.name)
            .field("components", &self.components_json())
            .finish()
    }
}

use crate::ecs::{
    component::{Component, ComponentTypeGroup},
    entity::{Entity, EntityId},
};

/// A mutable reference to an active entity.
///
/// Component values can be read and changed in place, but the set of components cannot: adding
/// or removing components on an entity the world owns goes through
/// [`World::add_component`](crate::ecs::World::add_component) and
/// [`World::remove_component`](crate::ecs::World::remove_component) so the world's indices are
/// updated along with the entity.
///
/// The lifetime `'w` ties the reference to the borrow of the `World`.
pub struct EntityMut<'w> {
    entity: &'w mut Entity,
}

impl<'w> EntityMut<'w> {
    /// Create a new EntityMut for an entity owned by the world.
    #[inline]
    pub(crate) fn new(entity: &'w mut Entity) -> Self {
        Self { entity }
    }

    /// Get the id of the referenced entity.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// Get the display name of the referenced entity.
    #[inline]
    pub fn name(&self) -> &str {
        self.entity.name()
    }

    /// Get a reference to a component on this entity.
    /// Returns `None` if the component is not present on the entity.
    #[inline]
    pub fn get<C: Component>(&self) -> Option<&C> {
        self.entity.get::<C>()
    }

    /// Get a mutable reference to a component on this entity.
    /// Returns `None` if the component is not present on the entity.
    #[inline]
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.entity.get_mut::<C>()
    }

    /// Apply `f` to the component of type `C` if present. Returns whether it was present.
    #[inline]
    pub fn modify<C: Component>(&mut self, f: impl FnOnce(&mut C)) -> bool {
        self.entity.modify(f)
    }

    /// Determine if the entity carries a component of type `C`.
    #[inline]
    pub fn has<C: Component>(&self) -> bool {
        self.entity.has::<C>()
    }

    /// The set of component types currently carried by the entity.
    #[inline]
    pub fn signature(&self) -> ComponentTypeGroup {
        self.entity.signature()
    }

    /// Read-only access to the whole entity.
    #[inline]
    pub fn entity(&self) -> &Entity {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::Serialize;

    use super::*;
    use crate::ecs::{
        Component, component,
        entity::{EntityId, Index},
        world,
    };

    #[derive(Component, Clone, Debug, PartialEq, Serialize)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Clone, Debug, PartialEq, Serialize)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[test]
    fn mutates_values_in_place() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let mut entity = Entity::new(
            EntityId::new(Index::from(3)),
            "mover",
            world::Id::new(0),
            world::Origin::next(),
            registry,
        )
        .with(Position { x: 0.0, y: 0.0 })
        .with(Velocity { dx: 1.0, dy: 2.0 });

        // When
        let mut entity_mut = EntityMut::new(&mut entity);
        let vel = entity_mut.get::<Velocity>().cloned().unwrap();
        entity_mut.modify::<Position>(|pos| {
            pos.x += vel.dx;
            pos.y += vel.dy;
        });

        // Then
        assert_eq!(entity_mut.id(), EntityId::new(Index::from(3)));
        assert_eq!(entity_mut.name(), "mover");
        assert!(entity_mut.has::<Velocity>());
        assert_eq!(entity.get::<Position>(), Some(&Position { x: 1.0, y: 2.0 }));
    }
}

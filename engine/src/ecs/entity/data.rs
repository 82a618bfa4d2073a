use std::{collections::HashMap, fmt, sync::Arc};

use crate::ecs::{
    component::{self, AnyComponent, Component, ComponentTypeGroup},
    entity::EntityId,
    world,
};

/// A named bag of components with a unique identity.
///
/// Entities are created by [`World::create_entity`](crate::ecs::World::create_entity) and start
/// out unattached: the caller owns the value and may add or remove components freely. Once the
/// entity is moved into the world with [`World::add_entity`](crate::ecs::World::add_entity) it is
/// indexed, and from then on its component set only changes through the world so the indices
/// stay consistent.
pub struct Entity {
    /// The identity of the entity.
    id: EntityId,

    /// Display name, not guaranteed unique.
    name: String,

    /// The world that created this entity.
    world: world::Id,

    /// The exact world instance that created this entity.
    origin: world::Origin,

    /// The component type registry shared with the owning world.
    registry: Arc<component::Registry>,

    /// At most one component per type.
    components: HashMap<component::Id, Box<dyn AnyComponent>>,
}

impl Entity {
    /// Construct a new, empty entity. Only the world hands out ids, so this stays crate-private.
    pub(crate) fn new(
        id: EntityId,
        name: impl Into<String>,
        world: world::Id,
        origin: world::Origin,
        registry: Arc<component::Registry>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            world,
            origin,
            registry,
            components: HashMap::new(),
        }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Get the display name of this entity.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the id of the world that created this entity.
    #[inline]
    pub fn world(&self) -> world::Id {
        self.world
    }

    #[inline]
    pub(crate) fn origin(&self) -> world::Origin {
        self.origin
    }

    /// Iterate over the components of this entity as `(type id, value)` pairs.
    pub fn components(&self) -> impl Iterator<Item = (component::Id, &dyn AnyComponent)> + '_ {
        self.components
            .iter()
            .map(|(id, component)| (*id, component.as_ref()))
    }

    /// Iterate over the component type ids carried by this entity.
    pub fn component_ids(&self) -> impl Iterator<Item = component::Id> + '_ {
        self.components.keys().copied()
    }

    /// The number of components carried by this entity.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the entity carries no components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The set of component types currently carried by this entity, computed fresh on every call.
    pub fn signature(&self) -> ComponentTypeGroup {
        self.component_ids().collect()
    }

    /// Add a component, replacing and returning any previous value of the same type.
    pub fn add_component<C: Component>(&mut self, component: C) -> Option<C> {
        let id = self.registry.register::<C>();
        self.components
            .insert(id, Box::new(component))
            .and_then(|previous| previous.into_any().downcast::<C>().ok())
            .map(|previous| *previous)
    }

    /// Builder form of [`add_component`](Self::add_component).
    pub fn with<C: Component>(mut self, component: C) -> Self {
        self.add_component(component);
        self
    }

    /// Add the component produced by `make` if the entity has no component of type `C` yet.
    /// Returns whether a component was added.
    pub fn add_component_if_absent<C: Component>(&mut self, make: impl FnOnce() -> C) -> bool {
        let id = self.registry.register::<C>();
        if self.components.contains_key(&id) {
            return false;
        }
        self.components.insert(id, Box::new(make()));
        true
    }

    /// Remove and return the component of type `C`, if present.
    pub fn remove_component<C: Component>(&mut self) -> Option<C> {
        let id = self.registry.get::<C>()?;
        self.remove_by_id(id)
            .and_then(|component| component.into_any().downcast::<C>().ok())
            .map(|component| *component)
    }

    /// Get a reference to the component of type `C`, if present.
    pub fn get<C: Component>(&self) -> Option<&C> {
        let id = self.registry.get::<C>()?;
        self.components.get(&id)?.as_any().downcast_ref::<C>()
    }

    /// Get a mutable reference to the component of type `C`, if present.
    pub fn get_mut<C: Component>(&mut self) -> Option<&mut C> {
        let id = self.registry.get::<C>()?;
        self.components.get_mut(&id)?.as_any_mut().downcast_mut::<C>()
    }

    /// Apply `f` to the component of type `C` if present. Returns whether it was present.
    pub fn modify<C: Component>(&mut self, f: impl FnOnce(&mut C)) -> bool {
        match self.get_mut::<C>() {
            Some(component) => {
                f(component);
                true
            }
            None => false,
        }
    }

    /// Determine if the entity carries a component of type `C`.
    pub fn has<C: Component>(&self) -> bool {
        self.registry
            .get::<C>()
            .is_some_and(|id| self.components.contains_key(&id))
    }

    /// Determine if the entity carries a component with the given type id.
    #[inline]
    pub fn has_id(&self, id: component::Id) -> bool {
        self.components.contains_key(&id)
    }

    /// Insert an already boxed component. Used when stamping entities out of entity classes.
    pub(crate) fn insert_boxed(&mut self, component: Box<dyn AnyComponent>) -> component::Id {
        let id = component.register(&self.registry);
        self.components.insert(id, component);
        id
    }

    /// Remove a component by its type id.
    pub(crate) fn remove_by_id(&mut self, id: component::Id) -> Option<Box<dyn AnyComponent>> {
        self.components.remove(&id)
    }

    /// Encode the component values as a JSON object keyed by short component type name.
    pub(crate) fn components_json(&self) -> serde_json::Value {
        let mut ids: Vec<_> = self.component_ids().collect();
        ids.sort();
        let map = ids
            .into_iter()
            .filter_map(|id| {
                let component = self.components.get(&id)?;
                Some((self.registry.short_name(id), component.to_json()))
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("world", &self.world)
            .field("components", &self.components_json())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;
    use crate::ecs::{Component, entity::Index};

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

    fn entity(registry: &Arc<component::Registry>) -> Entity {
        Entity::new(
            EntityId::new(Index::from(0)),
            "test",
            world::Id::new(1),
            world::Origin::next(),
            Arc::clone(registry),
        )
    }

    #[test]
    fn add_and_get_components() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let mut entity = entity(&registry);

        // When
        entity.add_component(Position { x: 1.0, y: 2.0 });

        // Then
        assert_eq!(entity.get::<Position>(), Some(&Position { x: 1.0, y: 2.0 }));
        assert!(entity.has::<Position>());
        assert!(!entity.has::<Velocity>());
        assert_eq!(entity.get::<Velocity>(), None);
        assert_eq!(entity.len(), 1);
    }

    #[test]
    fn add_replaces_existing_component_of_same_type() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let mut entity = entity(&registry).with(Position { x: 1.0, y: 1.0 });

        // When
        let previous = entity.add_component(Position { x: 5.0, y: 5.0 });

        // Then
        assert_eq!(previous, Some(Position { x: 1.0, y: 1.0 }));
        assert_eq!(entity.get::<Position>(), Some(&Position { x: 5.0, y: 5.0 }));
        assert_eq!(entity.len(), 1);
    }

    #[test]
    fn remove_component_returns_value() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let mut entity = entity(&registry)
            .with(Position { x: 1.0, y: 2.0 })
            .with(Velocity { dx: 0.5, dy: 0.0 });

        // When
        let removed = entity.remove_component::<Velocity>();

        // Then
        assert_eq!(removed, Some(Velocity { dx: 0.5, dy: 0.0 }));
        assert!(!entity.has::<Velocity>());
        assert_eq!(entity.remove_component::<Velocity>(), None);
    }

    #[test]
    fn signature_tracks_current_components() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let mut entity = entity(&registry).with(Position { x: 0.0, y: 0.0 });
        let pos_only = ComponentTypeGroup::of::<Position>(&registry);
        let both = ComponentTypeGroup::of::<(Position, Velocity)>(&registry);

        // Then
        assert_eq!(entity.signature(), pos_only);

        // When
        entity.add_component(Velocity { dx: 1.0, dy: 1.0 });

        // Then
        assert_eq!(entity.signature(), both);
        assert!(entity.signature().contains(&pos_only));
    }

    #[test]
    fn modify_and_add_if_absent() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let mut entity = entity(&registry);

        // When
        let missing = entity.modify::<Position>(|p| p.x = 9.0);
        let added = entity.add_component_if_absent(|| Position { x: 4.0, y: 3.0 });
        let added_again = entity.add_component_if_absent(|| Position { x: 7.0, y: 7.0 });
        let present = entity.modify::<Position>(|p| p.x += 1.0);

        // Then
        assert!(!missing);
        assert!(added);
        assert!(!added_again);
        assert!(present);
        assert_eq!(entity.get::<Position>(), Some(&Position { x: 5.0, y: 3.0 }));
    }

    #[test]
    fn components_json_uses_short_names() {
        // Given
        let registry = Arc::new(component::Registry::new());
        let entity = entity(&registry).with(Position { x: 1.0, y: 2.0 });

        // Then
        assert_eq!(
            entity.components_json(),
            serde_json::json!({ "Position": { "x": 1.0, "y": 2.0 } })
        );
    }
}

//! The World is the central container for all entities, entity classes, and systems in the ECS.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: Hands out entity ids and recycles freed slots with a new generation
//! - **Entity Slots**: The authoritative set of active entities, indexed by slot
//! - **Component Registry**: Maps component types to dense ids, shareable between worlds
//! - **Index**: The per-type entity sets plus the cache of materialized entity groups
//! - **Entity Classes**: Named component templates
//! - **Systems**: The ordered list of systems plus the factory table used to build them
//!
//! # Frames
//!
//! A frame is one call to [`World::update`]. Every system is updated in registration order and
//! then the end-of-frame flush runs. Removals requested during the frame (of entities with
//! [`World::remove_entity`], of components with [`World::remove_component`]) are only marked,
//! so every system of the frame sees the same population; the flush applies them all at once.
//! Additions take effect immediately.
//!
//! # Example
//!
//! ```ignore
//! use sol_ecs::ecs::{world, EntityClass, World};
//!
//! let mut world = World::new(world::Id::new(1));
//! world.add_entity_class(EntityClass::new("Bullet").with(Position { x: 0.0, y: 0.0 }));
//! world.register_system::<Movement>();
//! world.add_system::<Movement>()?;
//!
//! let ship = world.create_entity("ship").with(Position { x: 5.0, y: 5.0 });
//! world.add_entity(ship)?;
//! world.instantiate_entity_class("Bullet", "bullet-1")?;
//!
//! while !world.is_termination_requested() {
//!     world.update();
//! }
//! world.end();
//! ```
mod dump;
pub(crate) mod index;
pub(crate) mod sparse;

use std::{
    any::{TypeId as StdTypeId, type_name},
    collections::{HashMap, HashSet},
    fmt::Display,
    marker::PhantomData,
    mem,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use log::{debug, error, warn};

use crate::ecs::{
    class::EntityClass,
    component::{self, Component, ComponentTypeGroup, IntoGroup},
    entity::{self, Entity, EntityId, EntityMut},
    error::{Error, Result},
    system::{self, AnySystem, Slot, System, SystemHandle, SystemInfo},
    util::short_type_name,
    world::index::Index,
};

/// A world identifier. This is a unique identifier for a world in the ECS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Create a new world identifier.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Id(id)
    }

    /// Get the raw identifier value.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.0
    }
}

/// Identifies one world instance for the lifetime of the process. Unlike [`Id`], which the host
/// chooses and may reuse, no two worlds ever share an origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Origin(u64);

impl Origin {
    /// Hand out the next unused origin.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Origin(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The World is the central container for entities, entity classes, and systems.
///
/// Each world is isolated from other worlds: entities created by one world cannot be added to
/// another.
pub struct World {
    /// The world's unique identifier.
    id: Id,

    /// Stamped on every entity the world creates.
    origin: Origin,

    /// Component type ids, possibly shared with other worlds.
    registry: Arc<component::Registry>,

    /// Entity id allocator.
    allocator: entity::Allocator,

    /// Active entities, indexed by slot.
    entities: Vec<Option<Entity>>,

    /// The number of active entities.
    entity_count: usize,

    /// Type sets and the group cache.
    index: Index,

    /// Entities marked for removal at the next flush.
    scheduled_removals: HashSet<EntityId>,

    /// Components marked for removal at the next flush.
    scheduled_component_removals: Vec<(EntityId, component::Id)>,

    /// Entity classes by name.
    classes: HashMap<String, EntityClass>,

    /// Systems in registration order.
    systems: Vec<Slot>,

    /// The next system id to hand out.
    next_system_id: u32,

    /// Constructors for systems added by type or name.
    factories: system::Registry,

    /// Set once any system or the host asks the simulation to stop.
    termination_requested: bool,

    /// Marker to make World !Send. Systems are not required to be Send, so the world they live
    /// in must stay on the thread that created it.
    _not_send: PhantomData<*mut ()>,
}

impl World {
    /// Create a new world with its own component registry.
    pub fn new(id: Id) -> Self {
        Self::with_registry(id, Arc::new(component::Registry::new()))
    }

    /// Create a new world using a shared component registry, so component ids agree with other
    /// worlds using the same registry.
    pub fn with_registry(id: Id, registry: Arc<component::Registry>) -> Self {
        Self {
            id,
            origin: Origin::next(),
            registry,
            allocator: entity::Allocator::new(),
            entities: Vec::new(),
            entity_count: 0,
            index: Index::new(),
            scheduled_removals: HashSet::new(),
            scheduled_component_removals: Vec::new(),
            classes: HashMap::new(),
            systems: Vec::new(),
            next_system_id: 0,
            factories: system::Registry::new(),
            termination_requested: false,
            _not_send: PhantomData,
        }
    }

    /// Get the world's unique identifier.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the component type registry.
    #[inline]
    pub fn registry(&self) -> &component::Registry {
        &self.registry
    }

    /// Get a shared handle to the component type registry, e.g. to build another world with it.
    #[inline]
    pub fn shared_registry(&self) -> Arc<component::Registry> {
        Arc::clone(&self.registry)
    }

    /// Build the group for the component types in `S`, registering any new types.
    #[inline]
    pub fn group<S: IntoGroup>(&self) -> ComponentTypeGroup {
        ComponentTypeGroup::of::<S>(&self.registry)
    }

    // Entities

    /// Create a new, unattached entity with a fresh identity. The caller owns it until it is
    /// passed to [`add_entity`](Self::add_entity).
    pub fn create_entity(&mut self, name: impl Into<String>) -> Entity {
        let id = self.allocator.alloc();
        Entity::new(id, name, self.id, self.origin, Arc::clone(&self.registry))
    }

    /// Move an entity into the world and index it. It is visible to every group it matches at
    /// once, including to systems later in the current frame.
    ///
    /// Entities created by any other world are rejected, even one sharing this world's id.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId> {
        if entity.origin() != self.origin {
            return Err(Error::ForeignEntity {
                world: self.id,
                owner: entity.world(),
            });
        }

        let id = entity.id();
        self.index.insert(id, &entity.signature());

        let slot = id.index();
        if slot >= self.entities.len() {
            self.entities.resize_with(slot + 1, || None);
        }
        self.entities[slot] = Some(entity);
        self.entity_count += 1;
        Ok(id)
    }

    /// Instantiate the entity class registered as `class`, name the entity `name`, and add it
    /// to the world.
    pub fn instantiate_entity_class(
        &mut self,
        class: &str,
        name: impl Into<String>,
    ) -> Result<EntityId> {
        if !self.classes.contains_key(class) {
            return Err(Error::UnknownEntityClass(class.to_string()));
        }
        let mut entity = self.create_entity(name);
        if let Some(class) = self.classes.get(class) {
            class.fill(&mut entity);
        }
        self.add_entity(entity)
    }

    /// Mark an entity for removal at the end of the frame. It stays visible everywhere until
    /// then. Returns false, with a warning, if the entity is not in the world.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if !self.contains(id) {
            warn!("Cannot remove entity {id}: it is not in world {:?}", self.id);
            return false;
        }
        self.scheduled_removals.insert(id);
        true
    }

    /// Purge every entity and component marked for removal. Returns the number of entities
    /// purged.
    ///
    /// Called by [`update`](Self::update) at the end of every frame. Calling it with nothing
    /// marked does nothing.
    pub fn remove_scheduled_entities(&mut self) -> usize {
        let mut components_removed = 0;
        for (id, type_id) in mem::take(&mut self.scheduled_component_removals) {
            if self.scheduled_removals.contains(&id) {
                continue;
            }
            let Some(entity) = active_mut(&mut self.entities, id) else {
                continue;
            };
            let old = entity.signature();
            if entity.remove_by_id(type_id).is_some() {
                self.index.change(id, &old, &entity.signature());
                components_removed += 1;
            }
        }

        let mut purged = 0;
        for id in mem::take(&mut self.scheduled_removals) {
            let Some(slot) = self.entities.get_mut(id.index()) else {
                continue;
            };
            if !slot.as_ref().is_some_and(|entity| entity.id() == id) {
                continue;
            }
            if let Some(entity) = slot.take() {
                self.index.remove(id, &entity.signature());
                self.allocator.free(id);
                self.entity_count -= 1;
                purged += 1;
            }
        }

        if purged > 0 || components_removed > 0 {
            debug!(
                "World {:?} purged {purged} entities and {components_removed} components, {} remain",
                self.id, self.entity_count
            );
        }
        purged
    }

    /// Add a component to an active entity, replacing any previous value of the same type, and
    /// re-index it immediately. Cancels a pending removal of that component type.
    ///
    /// Returns false, with a warning, if the entity is not in the world.
    pub fn add_component<C: Component>(&mut self, id: EntityId, component: C) -> bool {
        let type_id = self.registry.register::<C>();
        let Some(entity) = active_mut(&mut self.entities, id) else {
            warn!("Cannot add component to entity {id}: it is not in world {:?}", self.id);
            return false;
        };
        let old = entity.signature();
        entity.add_component(component);
        let new = entity.signature();
        if old != new {
            self.index.change(id, &old, &new);
        }
        self.scheduled_component_removals
            .retain(|(entity, pending)| !(*entity == id && *pending == type_id));
        true
    }

    /// Mark a component of an active entity for removal at the end of the frame. Returns false
    /// if the entity is not in the world or does not carry the component.
    pub fn remove_component<C: Component>(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entity(id) else {
            warn!("Cannot remove component from entity {id}: it is not in world {:?}", self.id);
            return false;
        };
        let Some(type_id) = self.registry.get::<C>() else {
            return false;
        };
        if !entity.has_id(type_id) {
            return false;
        }
        if !self.scheduled_component_removals.contains(&(id, type_id)) {
            self.scheduled_component_removals.push((id, type_id));
        }
        true
    }

    /// The ids of the active entities carrying every type in `group`.
    ///
    /// The first request for a group computes it and caches it for the lifetime of the world;
    /// later requests return the cached list, which is kept current as entities come and go.
    /// An empty group, or one naming a type no entity has carried, yields an empty list.
    #[inline]
    pub fn entity_group(&mut self, group: &ComponentTypeGroup) -> &[EntityId] {
        self.index.group(group)
    }

    /// Determine if `group` has been requested and is being maintained.
    #[inline]
    pub fn is_group_materialized(&self, group: &ComponentTypeGroup) -> bool {
        self.index.is_materialized(group)
    }

    /// The number of groups being maintained.
    #[inline]
    pub fn materialized_group_count(&self) -> usize {
        self.index.group_count()
    }

    /// The number of active entities carrying a component of type `C`.
    pub fn count_with<C: Component>(&self) -> usize {
        self.registry
            .get::<C>()
            .map_or(0, |type_id| self.index.type_count(type_id))
    }

    /// Get an active entity.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .get(id.index())?
            .as_ref()
            .filter(|entity| entity.id() == id)
    }

    /// Get mutable access to the component values of an active entity.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        active_mut(&mut self.entities, id).map(EntityMut::new)
    }

    /// The first active entity, by slot order, named `name`.
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities().find(|entity| entity.name() == name)
    }

    /// Iterate over all active entities, including those marked for removal this frame.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().flatten()
    }

    /// The number of active entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Determine if an entity is active in this world.
    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Determine if an entity is marked for removal at the end of the frame.
    #[inline]
    pub fn is_scheduled_for_removal(&self, id: EntityId) -> bool {
        self.scheduled_removals.contains(&id)
    }

    // Entity classes

    /// Register an entity class under its name, replacing any class of the same name. Entities
    /// already instantiated from the old class are not affected.
    pub fn add_entity_class(&mut self, class: EntityClass) {
        let name = class.name().to_string();
        if self.classes.insert(name.clone(), class).is_some() {
            debug!("Replaced entity class `{name}` in world {:?}", self.id);
        }
    }

    /// Get the entity class registered as `name`.
    #[inline]
    pub fn entity_class(&self, name: &str) -> Option<&EntityClass> {
        self.classes.get(name)
    }

    /// Iterate over all registered entity classes, in no particular order.
    pub fn entity_classes(&self) -> impl Iterator<Item = &EntityClass> + '_ {
        self.classes.values()
    }

    // Systems

    /// Register `T` to be built with `Default::default`.
    pub fn register_system<T: System + Default>(&mut self) {
        self.factories.register::<T>();
    }

    /// Register `T` to be built with a fallible constructor.
    pub fn register_system_with<T, E, F>(&mut self, constructor: F)
    where
        T: System,
        E: Display,
        F: Fn() -> std::result::Result<T, E> + 'static,
    {
        self.factories.register_with(constructor);
    }

    /// The system factory table.
    #[inline]
    pub fn system_factories(&self) -> &system::Registry {
        &self.factories
    }

    /// Build one `T` with its registered constructor, append it to the system list, and run its
    /// setup and start hooks.
    ///
    /// A missing or failing constructor is logged and returned as
    /// [`Error::SystemConstruction`]; the world keeps running without the system.
    pub fn add_system<T: System>(&mut self) -> Result<SystemHandle<T>> {
        let name = short_type_name(type_name::<T>());
        match self.factories.construct(StdTypeId::of::<T>()) {
            Some(Ok(system)) => Ok(SystemHandle::new(self.start_system(name, system))),
            Some(Err(reason)) => Err(construction_failed(&name, reason)),
            None => Err(construction_failed(
                &name,
                "no constructor registered".to_string(),
            )),
        }
    }

    /// Build the system registered under the short type name `name`, as
    /// [`add_system`](Self::add_system) does.
    pub fn add_system_named(&mut self, name: &str) -> Result<system::Id> {
        match self.factories.construct_named(name) {
            Some((type_id, Ok(system))) => {
                let name = self.factories.name_of(type_id).unwrap_or(name).to_string();
                Ok(self.start_system(name, system))
            }
            Some((_, Err(reason))) => Err(construction_failed(name, reason)),
            None => Err(construction_failed(
                name,
                "no constructor registered under this name".to_string(),
            )),
        }
    }

    /// Append an already built system and run its setup and start hooks.
    pub fn insert_system<T: System>(&mut self, system: T) -> SystemHandle<T> {
        let name = short_type_name(type_name::<T>());
        SystemHandle::new(self.start_system(name, Box::new(system)))
    }

    fn start_system(&mut self, name: String, system: Box<dyn AnySystem>) -> system::Id {
        let id = system::Id::new(self.next_system_id);
        self.next_system_id += 1;

        // Systems added by this one's hooks land after it.
        let at = self.systems.len();
        let mut slot = Slot::new(id, name, system);
        slot.start(self);
        debug!("Started system `{}` ({id:?}) in world {:?}", slot.name(), self.id);
        self.systems.insert(at, slot);
        id
    }

    /// Get a system by handle.
    ///
    /// Systems are detached from the world while they run, so this returns `None` when called
    /// from inside a system hook for a system other than one added during that hook.
    pub fn system<T: System>(&self, handle: SystemHandle<T>) -> Option<&T> {
        self.slot(handle.id())?.system().as_any().downcast_ref::<T>()
    }

    /// Get a system mutably by handle. See [`system`](Self::system).
    pub fn system_mut<T: System>(&mut self, handle: SystemHandle<T>) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find(|slot| slot.id() == handle.id())?
            .system_mut()
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Describe every system in registration order.
    pub fn systems(&self) -> impl Iterator<Item = SystemInfo<'_>> + '_ {
        self.systems.iter().map(Slot::info)
    }

    /// The short type names of every system in registration order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.systems.iter().map(Slot::name)
    }

    /// The lifecycle state of a system.
    pub fn system_state(&self, id: system::Id) -> Option<system::State> {
        self.slot(id).map(Slot::state)
    }

    fn slot(&self, id: system::Id) -> Option<&Slot> {
        self.systems.iter().find(|slot| slot.id() == id)
    }

    // Frame loop

    /// Run one frame: update every system in registration order, then purge everything marked
    /// for removal.
    ///
    /// Systems added during the frame are started at once and first updated next frame.
    pub fn update(&mut self) {
        let mut systems = mem::take(&mut self.systems);
        for slot in systems.iter_mut() {
            slot.update(self);
        }
        let added = mem::replace(&mut self.systems, systems);
        self.systems.extend(added);

        self.remove_scheduled_entities();
    }

    /// Run every system's end hook in registration order. Ended systems are no longer updated.
    ///
    /// Systems added by an end hook are ended in one extra pass. Systems added during that
    /// pass are kept but not ended.
    pub fn end(&mut self) {
        let mut ended = mem::take(&mut self.systems);
        for slot in ended.iter_mut() {
            slot.end(self);
        }

        let mut late = mem::take(&mut self.systems);
        for slot in late.iter_mut() {
            slot.end(self);
        }
        ended.append(&mut late);

        let stray = mem::take(&mut self.systems);
        if !stray.is_empty() {
            warn!(
                "{} systems added while ending world {:?} were not ended",
                stray.len(),
                self.id
            );
        }
        ended.extend(stray);
        self.systems = ended;
        debug!("World {:?} ended", self.id);
    }

    /// Ask the host loop to stop. Other systems still run for the current frame.
    pub fn request_termination(&mut self) {
        if !self.termination_requested {
            debug!("Termination requested for world {:?}", self.id);
        }
        self.termination_requested = true;
    }

    /// Determine if termination has been requested.
    #[inline]
    pub fn is_termination_requested(&self) -> bool {
        self.termination_requested
    }
}

/// The active entity with the given id, borrowed straight from the slot list so other world
/// fields stay available to the caller.
fn active_mut(entities: &mut [Option<Entity>], id: EntityId) -> Option<&mut Entity> {
    entities
        .get_mut(id.index())?
        .as_mut()
        .filter(|entity| entity.id() == id)
}

fn construction_failed(name: &str, reason: String) -> Error {
    error!(
        "Could not construct system `{name}`: {reason}. Systems need a constructor registered \
         with `World::register_system::<{name}>()` (requires `Default`) or \
         `World::register_system_with(|| -> Result<{name}, E>)`"
    );
    Error::SystemConstruction {
        system: name.to_string(),
        reason,
    }
}

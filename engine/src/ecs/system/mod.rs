//! Systems: the per-frame processing units of the ECS.
//!
//! # Overview
//!
//! A system is a type implementing [`System`]. It declares once, at registration, the
//! [`ComponentTypeGroup`] it is interested in, and is then driven by the
//! [`World`] through a fixed lifecycle:
//!
//! ```text
//!   Constructed ──start──► Started ──update──► Updating ─┐
//!                                                 ▲       │ update (every frame)
//!                                                 └───────┘
//!                                       │
//!                                       └──end──► Ended
//! ```
//!
//! - **start** runs as part of [`World::add_system`]: the interest group is recorded, then
//!   [`System::on_setup`] and [`System::on_start`] are called.
//! - **update** runs once per [`World::update`], in registration order, calling
//!   [`System::on_update`] with a [`Context`] for the system's group.
//! - **end** runs once at [`World::end`], calling [`System::on_end`].
//!
//! Systems hold no entities themselves; they read them through the world each frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use sol_ecs::ecs::{component, ComponentTypeGroup, Context, System};
//!
//! #[derive(Default)]
//! struct Movement;
//!
//! impl System for Movement {
//!     fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup {
//!         ComponentTypeGroup::of::<(Position, Velocity)>(registry)
//!     }
//!
//!     fn on_update(&mut self, ctx: &mut Context<'_>) {
//!         ctx.for_each(|mut entity| {
//!             let vel = entity.get::<Velocity>().cloned().unwrap_or_default();
//!             entity.modify::<Position>(|pos| {
//!                 pos.x += vel.dx;
//!                 pos.y += vel.dy;
//!             });
//!         });
//!     }
//! }
//!
//! world.register_system::<Movement>();
//! let movement = world.add_system::<Movement>()?;
//! ```
//!
//! # Construction
//!
//! Systems are built through an explicit factory table ([`Registry`]) rather than by
//! inspecting types at runtime. Host code registers a constructor per system type, either
//! `Default` or a fallible closure, and can then add the system by type or by name.

use std::{any::Any, fmt, marker::PhantomData};

use log::warn;

use crate::ecs::{
    component::{self, ComponentTypeGroup},
    entity::{EntityId, EntityMut},
    world::World,
};

pub mod registry;

pub use registry::Registry;

/// A system identifier, unique within a world and assigned in registration order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new system Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value of this id.
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// A processing unit driven by the [`World`] once per frame.
pub trait System: 'static {
    /// Declare the component types this system works on. Called once, when the system is added.
    fn interest(&self, registry: &component::Registry) -> ComponentTypeGroup;

    /// Called once when the system is added, before [`on_start`](Self::on_start).
    fn on_setup(&mut self, _world: &mut World) {}

    /// Called once when the system is added, after [`on_setup`](Self::on_setup).
    fn on_start(&mut self, _world: &mut World) {}

    /// Called once per [`World::update`].
    fn on_update(&mut self, ctx: &mut Context<'_>);

    /// Called once at [`World::end`].
    fn on_end(&mut self, _world: &mut World) {}
}

/// The lifecycle state of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Built, but not yet started.
    Constructed,
    /// Setup and start hooks have run.
    Started,
    /// Updated at least once.
    Updating,
    /// The end hook has run; the system is no longer driven.
    Ended,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Constructed => write!(f, "constructed"),
            State::Started => write!(f, "started"),
            State::Updating => write!(f, "updating"),
            State::Ended => write!(f, "ended"),
        }
    }
}

/// Per-update access handed to [`System::on_update`].
pub struct Context<'w> {
    world: &'w mut World,
    interest: &'w ComponentTypeGroup,
}

impl<'w> Context<'w> {
    #[inline]
    pub(crate) fn new(world: &'w mut World, interest: &'w ComponentTypeGroup) -> Self {
        Self { world, interest }
    }

    /// The world being updated.
    #[inline]
    pub fn world(&mut self) -> &mut World {
        self.world
    }

    /// The component types the system declared interest in.
    #[inline]
    pub fn interest(&self) -> &ComponentTypeGroup {
        self.interest
    }

    /// A snapshot of the ids of the entities matching the system's interest group.
    ///
    /// The snapshot is detached from the world, so the system may add or remove entities while
    /// walking it.
    pub fn entities(&mut self) -> Vec<EntityId> {
        self.world.entity_group(self.interest).to_vec()
    }

    /// Call `f` for each entity matching the system's interest group.
    pub fn for_each(&mut self, mut f: impl FnMut(EntityMut<'_>)) {
        for id in self.entities() {
            if let Some(entity) = self.world.entity_mut(id) {
                f(entity);
            }
        }
    }

    /// Ask the host loop to stop the simulation. Other systems still run for this frame.
    #[inline]
    pub fn request_termination(&mut self) {
        self.world.request_termination();
    }
}

/// A typed handle to a system added to a world.
pub struct SystemHandle<T> {
    id: Id,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SystemHandle<T> {
    #[inline]
    pub(crate) const fn new(id: Id) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The untyped id of the system.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }
}

impl<T> Clone for SystemHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SystemHandle<T> {}

impl<T> PartialEq for SystemHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SystemHandle<T> {}

impl<T> fmt::Debug for SystemHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemHandle<{}>({})", std::any::type_name::<T>(), self.id.0)
    }
}

/// Read-only description of a registered system.
#[derive(Debug, Clone, Copy)]
pub struct SystemInfo<'a> {
    /// The system's id.
    pub id: Id,
    /// The short type name of the system.
    pub name: &'a str,
    /// The component types the system declared interest in.
    pub interest: &'a ComponentTypeGroup,
    /// The system's lifecycle state.
    pub state: State,
}

/// A [`System`] that can be downcast back to its concrete type.
pub(crate) trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: System> AnySystem for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A system owned by the world, along with its lifecycle bookkeeping.
pub(crate) struct Slot {
    id: Id,
    name: String,
    interest: ComponentTypeGroup,
    state: State,
    system: Box<dyn AnySystem>,
}

impl Slot {
    pub(crate) fn new(id: Id, name: impl Into<String>, system: Box<dyn AnySystem>) -> Self {
        Self {
            id,
            name: name.into(),
            interest: ComponentTypeGroup::EMPTY,
            state: State::Constructed,
            system,
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn interest(&self) -> &ComponentTypeGroup {
        &self.interest
    }

    #[inline]
    pub(crate) fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub(crate) fn system(&self) -> &dyn AnySystem {
        self.system.as_ref()
    }

    #[inline]
    pub(crate) fn system_mut(&mut self) -> &mut dyn AnySystem {
        self.system.as_mut()
    }

    pub(crate) fn info(&self) -> SystemInfo<'_> {
        SystemInfo {
            id: self.id,
            name: &self.name,
            interest: &self.interest,
            state: self.state,
        }
    }

    /// Record the interest group, then run the setup and start hooks.
    pub(crate) fn start(&mut self, world: &mut World) {
        if self.state != State::Constructed {
            warn!("System `{}` is already {}, not starting it again", self.name, self.state);
            return;
        }
        self.interest = self.system.interest(world.registry());
        self.system.on_setup(world);
        self.system.on_start(world);
        self.state = State::Started;
    }

    /// Run the update hook for one frame.
    pub(crate) fn update(&mut self, world: &mut World) {
        match self.state {
            State::Started | State::Updating => {
                self.state = State::Updating;
                let mut ctx = Context::new(world, &self.interest);
                self.system.on_update(&mut ctx);
            }
            State::Constructed => {
                warn!("System `{}` was never started, skipping update", self.name);
            }
            State::Ended => {}
        }
    }

    /// Run the end hook. A system only ends once.
    pub(crate) fn end(&mut self, world: &mut World) {
        if self.state == State::Ended {
            return;
        }
        self.system.on_end(world);
        self.state = State::Ended;
    }
}

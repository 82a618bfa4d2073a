//! The system factory table.
//!
//! The [`Registry`] maps each system type to a constructor closure, so a [`World`] can build
//! systems by type or by name without any runtime type inspection.
//!
//! [`World`]: crate::ecs::World

use std::{
    any::{TypeId as StdTypeId, type_name},
    collections::HashMap,
    convert::Infallible,
    fmt::Display,
};

use crate::ecs::{
    system::{AnySystem, System},
    util::short_type_name,
};

type Constructor = Box<dyn Fn() -> Result<Box<dyn AnySystem>, String>>;

struct Entry {
    name: String,
    construct: Constructor,
}

/// A table of system constructors.
///
/// # Examples
///
/// ```rust,ignore
/// let mut factories = Registry::new();
/// factories.register::<Movement>();
/// factories.register_with(|| Spawner::from_env());
///
/// assert!(factories.contains::<Movement>());
/// assert!(factories.contains_name("Spawner"));
/// ```
#[derive(Default)]
pub struct Registry {
    /// Constructors by system type.
    entries: HashMap<StdTypeId, Entry>,

    /// Short type names to system types, for data-driven registration.
    names: HashMap<String, StdTypeId>,
}

impl Registry {
    /// Create an empty factory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system built with `Default::default`.
    pub fn register<T: System + Default>(&mut self) {
        self.register_with(|| Ok::<_, Infallible>(T::default()));
    }

    /// Register a system built with a fallible constructor. Registering the same type again
    /// replaces its constructor.
    pub fn register_with<T, E, F>(&mut self, constructor: F)
    where
        T: System,
        E: Display,
        F: Fn() -> Result<T, E> + 'static,
    {
        let name = short_type_name(type_name::<T>());
        let construct: Constructor = Box::new(move || {
            constructor()
                .map(|system| Box::new(system) as Box<dyn AnySystem>)
                .map_err(|err| err.to_string())
        });
        let type_id = StdTypeId::of::<T>();
        self.names.insert(name.clone(), type_id);
        self.entries.insert(type_id, Entry { name, construct });
    }

    /// Determine if a constructor is registered for `T`.
    pub fn contains<T: System>(&self) -> bool {
        self.entries.contains_key(&StdTypeId::of::<T>())
    }

    /// Determine if a constructor is registered under the short type name `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// The short type names of all registered systems, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.keys().map(String::as_str)
    }

    /// The number of registered constructors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no constructors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the constructor for the given type. Returns `None` if the type is not registered.
    pub(crate) fn construct(
        &self,
        type_id: StdTypeId,
    ) -> Option<Result<Box<dyn AnySystem>, String>> {
        self.entries.get(&type_id).map(|entry| (entry.construct)())
    }

    /// Run the constructor registered under `name`, returning the system's type alongside the
    /// result. Returns `None` if the name is not registered.
    pub(crate) fn construct_named(
        &self,
        name: &str,
    ) -> Option<(StdTypeId, Result<Box<dyn AnySystem>, String>)> {
        let type_id = *self.names.get(name)?;
        self.construct(type_id).map(|result| (type_id, result))
    }

    /// The short type name registered for `type_id`.
    pub(crate) fn name_of(&self, type_id: StdTypeId) -> Option<&str> {
        self.entries.get(&type_id).map(|entry| entry.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{
        component::{self, ComponentTypeGroup},
        system::Context,
    };

    #[derive(Default)]
    struct Idle;

    impl System for Idle {
        fn interest(&self, _registry: &component::Registry) -> ComponentTypeGroup {
            ComponentTypeGroup::EMPTY
        }

        fn on_update(&mut self, _ctx: &mut Context<'_>) {}
    }

    struct Counter {
        start: u32,
    }

    impl System for Counter {
        fn interest(&self, _registry: &component::Registry) -> ComponentTypeGroup {
            ComponentTypeGroup::EMPTY
        }

        fn on_update(&mut self, _ctx: &mut Context<'_>) {
            self.start += 1;
        }
    }

    #[test]
    fn register_default_constructor() {
        // Given
        let mut registry = Registry::new();

        // When
        registry.register::<Idle>();

        // Then
        assert!(registry.contains::<Idle>());
        assert!(registry.contains_name("Idle"));
        assert!(!registry.contains::<Counter>());
        assert_eq!(registry.name_of(StdTypeId::of::<Idle>()), Some("Idle"));
        assert!(matches!(
            registry.construct(StdTypeId::of::<Idle>()),
            Some(Ok(_))
        ));
    }

    #[test]
    fn constructor_results_are_passed_through() {
        // Given
        let mut registry = Registry::new();
        registry.register_with(|| Ok::<_, String>(Counter { start: 7 }));

        // When
        let (type_id, built) = registry.construct_named("Counter").unwrap();

        // Then
        assert_eq!(type_id, StdTypeId::of::<Counter>());
        let system = built.ok().unwrap();
        let counter = system.as_any().downcast_ref::<Counter>().unwrap();
        assert_eq!(counter.start, 7);
    }

    #[test]
    fn failing_constructor_reports_reason() {
        // Given
        let mut registry = Registry::new();
        registry.register_with(|| Err::<Counter, _>("missing seed"));

        // When
        let built = registry.construct(StdTypeId::of::<Counter>()).unwrap();

        // Then
        assert_eq!(built.err(), Some("missing seed".to_string()));
        assert!(registry.construct_named("Idle").is_none());
    }
}

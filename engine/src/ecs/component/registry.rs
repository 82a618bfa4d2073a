//! Registry of component types.
//!
//! This module provides [`Registry`], a thread-safe registry that hands out a dense numeric
//! [`Id`] for every component type it sees. Ids start at zero and grow by one per new type, which
//! keeps them small enough to be used directly as bit positions in a
//! [`ComponentTypeGroup`](super::ComponentTypeGroup).
//!
//! # Thread Safety
//!
//! The registry uses lock-free reads via `DashMap` and minimal locking for writes. Multiple
//! worlds can share the same registry (through an `Arc`) so their component ids agree.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = Registry::new();
//!
//! let pos_id = registry.register::<Position>();
//! assert_eq!(registry.register::<Position>(), pos_id);
//! assert_eq!(registry.info(pos_id).unwrap().short_name(), "Position");
//! ```

use std::{
    any::TypeId as StdTypeId,
    sync::{
        RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::ecs::util::short_type_name;

/// A component identifier: a dense, zero-based index assigned by a [`Registry`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this ID for use in indexable storage (e.g., Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// Metadata about a registered component type.
#[derive(Debug, Clone)]
pub struct Info {
    /// The registered id.
    id: Id,

    /// The Rust TypeId for runtime type checking.
    type_id: StdTypeId,

    /// The full Rust type name.
    name: &'static str,

    /// The type name without its module path, used in dumps and configuration files.
    short_name: String,
}

impl Info {
    fn new<T: 'static>(id: Id) -> Self {
        let name = std::any::type_name::<T>();
        Self {
            id,
            type_id: StdTypeId::of::<T>(),
            name,
            short_name: short_type_name(name),
        }
    }

    /// Get the component id.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the Rust TypeId.
    #[inline]
    pub fn type_id(&self) -> StdTypeId {
        self.type_id
    }

    /// Get the full Rust type name.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the type name without its module path.
    #[inline]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }
}

/// A thread-safe registry of component types.
pub struct Registry {
    /// Map from Rust TypeId to our Id. Lock-free reads via sharded concurrent hashmap.
    type_map: DashMap<StdTypeId, Id>,

    /// Registered type metadata, indexed by id. Protected by RwLock for rare writes.
    types: RwLock<Vec<Option<Info>>>,

    /// Next available type identifier.
    next_id: AtomicU32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("len", &self.len())
            .finish()
    }
}

impl Registry {
    /// Create a new, empty registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            type_map: DashMap::new(),
            types: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Register a component type, returning its id.
    ///
    /// Registration is idempotent: a type that is already known returns its existing id.
    pub fn register<T: 'static>(&self) -> Id {
        let std_type_id = StdTypeId::of::<T>();

        // Fast path: already registered (lock-free read)
        if let Some(existing_id) = self.type_map.get(&std_type_id) {
            return *existing_id;
        }

        // Slow path: use the entry API so a racing registration resolves to one id
        match self.type_map.entry(std_type_id) {
            dashmap::Entry::Occupied(occupied) => *occupied.get(),
            dashmap::Entry::Vacant(vacant) => {
                let id_value = self.next_id.fetch_add(1, Ordering::Relaxed);
                let id = Id(id_value);

                let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
                let index = id_value as usize;
                if index >= types.len() {
                    types.resize(index + 1, None);
                }
                types[index] = Some(Info::new::<T>(id));
                vacant.insert(id);

                id
            }
        }
    }

    /// Get the id for a type, if registered.
    #[inline]
    pub fn get<T: 'static>(&self) -> Option<Id> {
        self.get_by_type_id(StdTypeId::of::<T>())
    }

    /// Get the id for a Rust `TypeId`, if registered.
    #[inline]
    pub fn get_by_type_id(&self, type_id: StdTypeId) -> Option<Id> {
        self.type_map.get(&type_id).map(|entry| *entry.value())
    }

    /// Get type info by id.
    #[inline]
    pub fn info(&self, id: Id) -> Option<Info> {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types.get(id.index()).and_then(|opt| opt.clone())
    }

    /// Get the short (module-less) type name for an id, or a placeholder for unknown ids.
    pub fn short_name(&self, id: Id) -> String {
        self.info(id)
            .map(|info| info.short_name)
            .unwrap_or_else(|| format!("#{}", id.index()))
    }

    /// Get the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.next_id.load(Ordering::Relaxed) as usize
    }

    /// Check if the registry is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

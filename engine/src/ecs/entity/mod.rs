//! Entity management for the ECS.
//!
//! An entity is a named bag of components with a unique identity. This module provides the
//! identity types, the allocator that hands them out, and the [`Entity`] bag itself.
//!
//! # Architecture
//!
//! - **[`EntityId`]**: The identity of an entity, combining a slot [`Index`] and a
//!   [`Generation`]. The index identifies the slot, while the generation tracks how many times
//!   that slot has been reused. Two ids are equal only if both parts match, so a handle to a
//!   removed entity never resolves to the entity that later reuses its slot.
//!
//! - **[`Allocator`]**: Hands out ids and recycles the slots of removed entities. When a slot is
//!   freed its generation is incremented before it goes back into the dead pool.
//!
//! - **[`Entity`]**: The component bag. An entity is created unattached (owned by the caller),
//!   becomes active once moved into a [`World`](crate::ecs::World), and is dropped when the
//!   world purges it at the end of a frame.
//!
//! - **[`EntityMut`]**: Mutable access to the component values of an active entity, without the
//!   ability to change which components it carries.
//!
//! # Generation Tracking
//!
//! ```rust,ignore
//! let entity = allocator.alloc(); // EntityId { index: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc();  // EntityId { index: 0, generation: 1 }
//! // The original id no longer matches anything in the world
//! ```

mod data;
mod reference;

use std::collections::VecDeque;

pub use data::Entity;
pub use reference::EntityMut;

/// The generation of an entity slot, used to track whether an id still refers to the live
/// occupant of that slot. Starts at `FIRST` and is incremented each time the slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity slot.
    const FIRST: Self = Self(0);

    /// Get the next generation from the current.
    #[inline]
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Get the raw generation value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// An entity slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(u32);

impl From<u32> for Index {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// The identity of an entity.
///
/// A world holds at most one active entity per slot index; the generation tells whether an id
/// refers to that entity or to an earlier occupant of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    /// The slot index of the entity.
    index: Index,

    /// The generation of the slot when the entity was allocated.
    generation: Generation,
}

impl EntityId {
    /// Construct a new id with just an index. This will default to the first generation.
    ///
    /// This is primarily used for testing.
    #[inline]
    pub(crate) fn new(index: impl Into<Index>) -> Self {
        Self::new_with_generation(index.into(), Generation::FIRST)
    }

    /// Construct a new id with an index and known generation.
    #[inline]
    pub(crate) const fn new_with_generation(index: Index, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// Get the generation of this id.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the slot index of this id for indexable storage (e.g. Vec).
    #[inline]
    pub fn index(&self) -> usize {
        self.index.0 as usize
    }

    /// Get an id with the same index but the next generation.
    #[inline]
    pub fn genned(&self) -> Self {
        Self::new_with_generation(self.index, self.generation.next())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index.0, self.generation.0)
    }
}

/// Implement ordering for EntityId based on index then generation.
impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Implement ordering for EntityId based on index then generation.
impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.index.cmp(&other.index) {
            std::cmp::Ordering::Equal => self.generation.cmp(&other.generation),
            ord => ord,
        }
    }
}

/// An allocator for entity ids.
///
/// Allocates unique ids and recycles freed slots to avoid index exhaustion. When a slot is
/// freed, its generation is incremented before being placed in the dead pool, invalidating any
/// stale ids.
///
/// The allocator is owned by the World, which is single-threaded, so plain collections are
/// enough here.
#[derive(Default, Debug)]
pub struct Allocator {
    /// Current generation for each slot index.
    generations: Vec<Generation>,

    /// Slot indices available for reuse, oldest first.
    dead_pool: VecDeque<Index>,
}

impl Allocator {
    /// Construct a new allocator starting from index 0.
    #[inline]
    pub const fn new() -> Self {
        Self {
            generations: Vec::new(),
            dead_pool: VecDeque::new(),
        }
    }

    /// Allocate a new id, either by reusing a freed slot from the dead pool or by growing the
    /// slot space.
    pub fn alloc(&mut self) -> EntityId {
        if let Some(index) = self.dead_pool.pop_front() {
            return EntityId::new_with_generation(index, self.generations[index.0 as usize]);
        }

        let index = Index(self.generations.len() as u32);
        self.generations.push(Generation::FIRST);
        EntityId::new(index)
    }

    /// Free an id's slot for reuse. Freeing an id that is not current for its slot does nothing.
    pub fn free(&mut self, id: EntityId) -> bool {
        if !self.is_current(id) {
            return false;
        }
        let slot = &mut self.generations[id.index()];
        *slot = slot.next();
        self.dead_pool.push_back(id.index);
        true
    }

    /// Determine if the id matches the current generation of its slot.
    #[inline]
    pub fn is_current(&self, id: EntityId) -> bool {
        self.generations.get(id.index()) == Some(&id.generation)
    }

    /// The number of slots ever allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_uniqueness() {
        // Given
        let mut allocator = Allocator::default();

        // When
        let mut ids: Vec<_> = (0..200).map(|_| allocator.alloc()).collect();

        // Then - No dupes generated
        let pre_len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(pre_len, ids.len());
    }

    #[test]
    fn allocator_reuse() {
        // Given
        let mut allocator = Allocator::default();
        let ids: Vec<_> = (0..10).map(|_| allocator.alloc()).collect();

        // When
        for id in ids {
            assert!(allocator.free(id));
        }
        let mut reused: Vec<_> = (0..10).map(|_| allocator.alloc()).collect();

        // Then - Slots are reused with incremented generation
        reused.sort();
        for (i, id) in reused.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(id.generation().value(), 1);
        }
        assert_eq!(allocator.capacity(), 10);
    }

    #[test]
    fn stale_id_is_not_current() {
        // Given
        let mut allocator = Allocator::default();
        let id = allocator.alloc();

        // When
        allocator.free(id);
        let reused = allocator.alloc();

        // Then
        assert_eq!(reused.index(), id.index());
        assert!(!allocator.is_current(id));
        assert!(allocator.is_current(reused));
    }

    #[test]
    fn double_free_is_ignored() {
        // Given
        let mut allocator = Allocator::default();
        let id = allocator.alloc();

        // When
        let first = allocator.free(id);
        let second = allocator.free(id);

        // Then - Only one slot was returned to the pool
        assert!(first);
        assert!(!second);
        let a = allocator.alloc();
        let b = allocator.alloc();
        assert_ne!(a.index(), b.index());
    }

    #[test]
    fn allocator_multiple_generations() {
        // Given
        let mut allocator = Allocator::default();
        let id = allocator.alloc();

        // When - Free and reallocate multiple times
        allocator.free(id);
        let gen1 = allocator.alloc();
        allocator.free(gen1);
        let gen2 = allocator.alloc();

        // Then - Same slot, incrementing generations
        assert_eq!(gen1.index(), id.index());
        assert_eq!(gen1.generation().value(), 1);
        assert_eq!(gen2.index(), id.index());
        assert_eq!(gen2.generation().value(), 2);
    }

    #[test]
    fn id_ordering_and_equality() {
        // Given
        let e1 = EntityId::new(Index(1));
        let e2 = EntityId::new(Index(2));
        let e1_gen1 = e1.genned();

        // Then - Ordered by index first, then generation
        assert!(e1 < e2);
        assert!(e1 < e1_gen1);
        assert!(e1_gen1 < e2);
        assert_eq!(e1, EntityId::new(Index(1)));
        assert_ne!(e1, e1_gen1);
        assert_eq!(e1_gen1.to_string(), "1v1");
    }
}

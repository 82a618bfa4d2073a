use std::hash::{Hash, Hasher};

use fixedbitset::FixedBitSet;

use crate::{
    all_tuples,
    ecs::component::{Component, Id, Registry},
};

/// A set of component types, used as a query signature and as an entity's signature.
///
/// The ids are kept as a sorted, de-duplicated vector, which defines equality and hashing, and
/// mirrored in a bitset (bit N set means component id N is a member) so the subset test used
/// on every index update is a handful of word operations.
///
/// Groups are immutable values: operations that combine groups return new groups.
#[derive(Debug, Clone, Default)]
pub struct ComponentTypeGroup {
    /// Sorted member ids.
    ids: Vec<Id>,
    /// One bit per member id.
    bits: FixedBitSet,
}

impl ComponentTypeGroup {
    /// A group with no members.
    pub const EMPTY: Self = Self {
        ids: Vec::new(),
        bits: FixedBitSet::new(),
    };

    /// Construct a new group from the given component ids. Order and duplicates are ignored.
    pub fn new(ids: impl Into<Vec<Id>>) -> Self {
        let mut ids = ids.into();
        ids.sort();
        ids.dedup();
        ids.shrink_to_fit();

        let mut bits = FixedBitSet::with_capacity(ids.last().map_or(0, |id| id.index() + 1));
        for id in &ids {
            bits.insert(id.index());
        }

        Self { ids, bits }
    }

    /// Build the group for a component type or tuple of component types, registering any type
    /// the registry has not seen yet.
    #[inline]
    pub fn of<S: IntoGroup>(registry: &Registry) -> Self {
        S::into_group(registry)
    }

    /// The member ids in ascending order.
    #[inline]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Iterate over the member ids in ascending order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.ids.iter().copied()
    }

    /// Determine if the given component id is a member of this group.
    #[inline]
    pub fn has(&self, id: Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Determine if every member of `other` is also a member of this group.
    ///
    /// An entity whose signature `contains` a query group belongs to that query's results.
    #[inline]
    pub fn contains(&self, other: &ComponentTypeGroup) -> bool {
        other.bits.is_subset(&self.bits)
    }

    /// A new group holding the members of both groups.
    pub fn union(&self, other: &ComponentTypeGroup) -> Self {
        let mut ids = Vec::with_capacity(self.ids.len() + other.ids.len());
        ids.extend_from_slice(&self.ids);
        ids.extend_from_slice(&other.ids);
        Self::new(ids)
    }

    /// Returns true if this group has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl PartialEq for ComponentTypeGroup {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Eq for ComponentTypeGroup {}

impl Hash for ComponentTypeGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ids.hash(state);
    }
}

impl From<Vec<Id>> for ComponentTypeGroup {
    #[inline]
    fn from(value: Vec<Id>) -> Self {
        ComponentTypeGroup::new(value)
    }
}

impl FromIterator<Id> for ComponentTypeGroup {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        ComponentTypeGroup::new(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Trait for converting a type into a [`ComponentTypeGroup`].
pub trait IntoGroup {
    /// Convert the type into a group using the given registry.
    fn into_group(registry: &Registry) -> ComponentTypeGroup;
}

/// The empty tuple is the empty group.
impl IntoGroup for () {
    fn into_group(_registry: &Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::EMPTY
    }
}

/// A single component type is a group of one.
impl<C: Component> IntoGroup for C {
    fn into_group(registry: &Registry) -> ComponentTypeGroup {
        ComponentTypeGroup::new([registry.register::<C>()])
    }
}

/// [`IntoGroup`] implementation for tuples of other [`IntoGroup`] types.
macro_rules! tuple_group {
    ($($name: ident),*) => {
        impl<$($name: IntoGroup),*> IntoGroup for ($($name,)*) {
            fn into_group(registry: &Registry) -> ComponentTypeGroup {
                let mut ids = Vec::new();
                $(
                    ids.extend(<$name>::into_group(registry).ids());
                )*
                ComponentTypeGroup::new(ids)
            }
        }
    }
}

all_tuples!(tuple_group);

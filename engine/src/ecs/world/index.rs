//! The component type index and the entity group cache.
//!
//! The [`Index`] answers "which entities carry type `t`" and "which entities carry every type in
//! group `g`". Type sets are maintained for every type ever carried. Group member lists are only
//! built on first request and from then on are kept current by the same insert and remove hooks
//! that maintain the type sets, so no group is ever recomputed from scratch.

use std::collections::{HashMap, HashSet};

use crate::ecs::{
    component::{self, ComponentTypeGroup},
    entity::EntityId,
    world::sparse::SparseIndex,
};

/// The members of one cached group: a dense id list plus each member's position in it.
#[derive(Debug, Default, Clone)]
pub(crate) struct Members {
    ids: Vec<EntityId>,
    positions: SparseIndex,
}

impl Members {
    fn from_ids(ids: Vec<EntityId>) -> Self {
        let mut positions = SparseIndex::new();
        for (position, id) in ids.iter().enumerate() {
            positions.insert(id.index(), position);
        }
        Self { ids, positions }
    }

    /// Append `id` unless it is already a member.
    pub(crate) fn insert(&mut self, id: EntityId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.positions.insert(id.index(), self.ids.len());
        self.ids.push(id);
        true
    }

    /// Swap-remove `id`, moving the last member into its position.
    pub(crate) fn remove(&mut self, id: EntityId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        self.positions.remove(id.index());
        self.ids.swap_remove(position);
        if let Some(moved) = self.ids.get(position) {
            self.positions.insert(moved.index(), position);
        }
        true
    }

    #[inline]
    pub(crate) fn contains(&self, id: EntityId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        let position = self.positions.get(id.index())?;
        (self.ids.get(position) == Some(&id)).then_some(position)
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[EntityId] {
        &self.ids
    }
}

/// Component type sets plus the lazily materialized group cache.
#[derive(Debug, Default)]
pub(crate) struct Index {
    /// For each component type ever carried, the active entities carrying it.
    by_type: HashMap<component::Id, HashSet<EntityId>>,

    /// For each group requested at least once, its current members.
    groups: HashMap<ComponentTypeGroup, Members>,
}

impl Index {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Index a newly active entity under each of its types and in every cached group its
    /// signature satisfies.
    pub(crate) fn insert(&mut self, id: EntityId, signature: &ComponentTypeGroup) {
        for type_id in signature.iter() {
            self.by_type.entry(type_id).or_default().insert(id);
        }
        for (group, members) in self.groups.iter_mut() {
            if signature.contains(group) {
                members.insert(id);
            }
        }
    }

    /// Remove an entity from each of its type sets and from every cached group its signature
    /// satisfies.
    pub(crate) fn remove(&mut self, id: EntityId, signature: &ComponentTypeGroup) {
        for type_id in signature.iter() {
            if let Some(set) = self.by_type.get_mut(&type_id) {
                set.remove(&id);
            }
        }
        for (group, members) in self.groups.iter_mut() {
            if signature.contains(group) {
                members.remove(id);
            }
        }
    }

    /// Move an active entity from `old` to `new` signature, touching only the type sets and
    /// groups whose membership actually changes.
    pub(crate) fn change(
        &mut self,
        id: EntityId,
        old: &ComponentTypeGroup,
        new: &ComponentTypeGroup,
    ) {
        for type_id in new.iter().filter(|t| !old.has(*t)) {
            self.by_type.entry(type_id).or_default().insert(id);
        }
        for type_id in old.iter().filter(|t| !new.has(*t)) {
            if let Some(set) = self.by_type.get_mut(&type_id) {
                set.remove(&id);
            }
        }
        for (group, members) in self.groups.iter_mut() {
            match (old.contains(group), new.contains(group)) {
                (false, true) => {
                    members.insert(id);
                }
                (true, false) => {
                    members.remove(id);
                }
                _ => {}
            }
        }
    }

    /// The members of `group`, materializing and caching it on first request.
    ///
    /// The empty group matches nothing and is never cached.
    pub(crate) fn group(&mut self, group: &ComponentTypeGroup) -> &[EntityId] {
        if group.is_empty() {
            return &[];
        }
        if !self.groups.contains_key(group) {
            let members = Members::from_ids(self.intersect(group));
            self.groups.insert(group.clone(), members);
        }
        self.groups.get(group).map(Members::as_slice).unwrap_or(&[])
    }

    /// Determine if `group` has been materialized.
    #[inline]
    pub(crate) fn is_materialized(&self, group: &ComponentTypeGroup) -> bool {
        self.groups.contains_key(group)
    }

    /// The number of materialized groups.
    #[inline]
    pub(crate) fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// The number of active entities carrying the given type.
    pub(crate) fn type_count(&self, type_id: component::Id) -> usize {
        self.by_type.get(&type_id).map_or(0, HashSet::len)
    }

    /// Intersect the type sets of every member of `group`, smallest set first. The result is
    /// sorted by id so freshly materialized groups have a stable order.
    fn intersect(&self, group: &ComponentTypeGroup) -> Vec<EntityId> {
        let mut sets = Vec::with_capacity(group.len());
        for type_id in group.iter() {
            match self.by_type.get(&type_id) {
                Some(set) if !set.is_empty() => sets.push(set),
                _ => return Vec::new(),
            }
        }
        sets.sort_by_key(|set| set.len());

        let Some((smallest, rest)) = sets.split_first() else {
            return Vec::new();
        };
        let mut ids: Vec<EntityId> = smallest
            .iter()
            .filter(|id| rest.iter().all(|set| set.contains(*id)))
            .copied()
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::Index as Slot;

    fn id(index: u32) -> EntityId {
        EntityId::new(Slot::from(index))
    }

    fn group(ids: &[u32]) -> ComponentTypeGroup {
        ids.iter().map(|i| component::Id::new(*i)).collect()
    }

    #[test]
    fn members_swap_remove_keeps_positions() {
        // Given
        let mut members = Members::default();
        for i in 0..4 {
            members.insert(id(i));
        }

        // When
        let removed = members.remove(id(1));
        let removed_again = members.remove(id(1));

        // Then - The last member moved into the freed position
        assert!(removed);
        assert!(!removed_again);
        assert_eq!(members.as_slice(), &[id(0), id(3), id(2)]);
        assert!(members.contains(id(3)));
        assert!(members.remove(id(3)));
        assert_eq!(members.as_slice(), &[id(0), id(2)]);
        assert_eq!(members.as_slice().len(), 2);
    }

    #[test]
    fn members_ignore_stale_generations() {
        // Given
        let mut members = Members::default();
        members.insert(id(0));

        // When
        let stale = id(0).genned();

        // Then
        assert!(!members.contains(stale));
        assert!(!members.remove(stale));
        assert!(!members.insert(id(0)));
        assert_eq!(members.as_slice().len(), 1);
    }

    #[test]
    fn materializes_by_intersection() {
        // Given
        let mut index = Index::new();
        index.insert(id(0), &group(&[0, 1]));
        index.insert(id(1), &group(&[0]));
        index.insert(id(2), &group(&[0, 1, 2]));

        // When
        let both = index.group(&group(&[0, 1])).to_vec();

        // Then
        assert_eq!(both, vec![id(0), id(2)]);
        assert!(index.is_materialized(&group(&[0, 1])));
        assert_eq!(index.type_count(component::Id::new(0)), 3);
    }

    #[test]
    fn never_carried_type_yields_empty_group() {
        // Given
        let mut index = Index::new();
        index.insert(id(0), &group(&[0]));

        // Then
        assert!(index.group(&group(&[0, 9])).is_empty());
        assert!(index.group(&ComponentTypeGroup::EMPTY).is_empty());
        assert!(!index.is_materialized(&ComponentTypeGroup::EMPTY));
        assert_eq!(index.group_count(), 1);
    }

    #[test]
    fn cached_groups_follow_inserts_removes_and_changes() {
        // Given
        let mut index = Index::new();
        let pos_vel = group(&[0, 1]);
        index.insert(id(0), &group(&[0]));
        assert!(index.group(&pos_vel).is_empty());

        // When - An entity gains the missing type
        index.change(id(0), &group(&[0]), &group(&[0, 1]));
        // And - A matching entity is added
        index.insert(id(1), &group(&[0, 1, 2]));

        // Then
        assert_eq!(index.group(&pos_vel), &[id(0), id(1)]);

        // When - One loses a type and the other is removed
        index.change(id(0), &group(&[0, 1]), &group(&[1]));
        index.remove(id(1), &group(&[0, 1, 2]));

        // Then
        assert!(index.group(&pos_vel).is_empty());
        assert_eq!(index.type_count(component::Id::new(0)), 0);
        assert_eq!(index.type_count(component::Id::new(1)), 1);
    }
}

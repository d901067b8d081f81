//! Canonical entity storage, one store per entity kind.
//!
//! Each store maps identifiers to canonical data plus an optional live
//! mirror. The store itself is deliberately passive: tombstoning toggles a
//! flag and takes the mirror out, restoring puts one back. Keeping the
//! spatial index and the selection in step is the board's job, so every
//! side effect of a lifecycle change happens in exactly one place.

use std::collections::HashMap;

use crate::model::{EntityData, EntityId, Mirror};

/// Canonical record: data plus the optional live mirror.
#[derive(Debug, Clone)]
pub struct StoredEntity<T> {
    pub data: T,
    /// Present iff the entity belongs to the displayed layer and is not
    /// tombstoned.
    pub mirror: Option<Mirror>,
}

/// Canonical map for one entity kind.
#[derive(Debug, Clone)]
pub struct EntityStore<T: EntityData> {
    items: HashMap<EntityId, StoredEntity<T>>,
}

impl<T: EntityData> EntityStore<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Number of canonical entities, tombstoned ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains_key(&id)
    }

    /// Inserts a canonical entity. The caller spawns the mirror separately
    /// when the entity lands on the displayed layer.
    pub fn insert(&mut self, data: T) {
        self.items.insert(
            data.id(),
            StoredEntity {
                data,
                mirror: None,
            },
        );
    }

    pub fn get(&self, id: EntityId) -> Option<&StoredEntity<T>> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut StoredEntity<T>> {
        self.items.get_mut(&id)
    }

    /// Canonical data, tombstoned or not.
    pub fn data(&self, id: EntityId) -> Option<&T> {
        self.items.get(&id).map(|e| &e.data)
    }

    pub fn data_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.items.get_mut(&id).map(|e| &mut e.data)
    }

    /// Live mirror, if the entity has one.
    pub fn mirror(&self, id: EntityId) -> Option<&Mirror> {
        self.items.get(&id).and_then(|e| e.mirror.as_ref())
    }

    pub fn mirror_mut(&mut self, id: EntityId) -> Option<&mut Mirror> {
        self.items.get_mut(&id).and_then(|e| e.mirror.as_mut())
    }

    /// True for entities that exist and are not tombstoned.
    pub fn is_live(&self, id: EntityId) -> bool {
        self.items.get(&id).is_some_and(|e| !e.data.is_deleted())
    }

    /// Sets the tombstone and takes the mirror out.
    ///
    /// Returns the removed mirror (if any) so the caller can drop it from
    /// the spatial index. Already-tombstoned or unknown ids return `None`
    /// with the flag untouched.
    pub fn mark_deleted(&mut self, id: EntityId) -> Option<Mirror> {
        let entity = self.items.get_mut(&id)?;
        if entity.data.is_deleted() {
            return None;
        }
        entity.data.set_deleted(true);
        entity.mirror.take()
    }

    /// Clears the tombstone.
    ///
    /// Returns true if the entity existed and was tombstoned; the caller
    /// respawns the mirror when the entity belongs to the displayed layer.
    pub fn unmark_deleted(&mut self, id: EntityId) -> bool {
        match self.items.get_mut(&id) {
            Some(entity) if entity.data.is_deleted() => {
                entity.data.set_deleted(false);
                true
            }
            _ => false,
        }
    }

    /// Permanently removes a canonical entity.
    ///
    /// Only ever invoked from history cleanup; live entities are never
    /// purged directly.
    pub fn purge(&mut self, id: EntityId) -> Option<T> {
        self.items.remove(&id).map(|e| e.data)
    }

    /// Drops every mirror without touching canonical data (layer unload).
    pub fn despawn_all(&mut self) {
        for entity in self.items.values_mut() {
            entity.mirror = None;
        }
    }

    /// Iterates all canonical entities, tombstoned ones included.
    pub fn iter(&self) -> impl Iterator<Item = &StoredEntity<T>> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StoredEntity<T>> {
        self.items.values_mut()
    }

    /// Iterates the non-tombstoned entities of one layer.
    pub fn iter_layer(&self, layer: EntityId) -> impl Iterator<Item = &StoredEntity<T>> {
        self.items
            .values()
            .filter(move |e| e.data.parent_id() == layer && !e.data.is_deleted())
    }

    /// Iterates every live mirror.
    pub fn mirrors(&self) -> impl Iterator<Item = &Mirror> {
        self.items.values().filter_map(|e| e.mirror.as_ref())
    }

    /// Identifiers of every live mirror.
    pub fn mirror_ids(&self) -> Vec<EntityId> {
        self.items
            .values()
            .filter_map(|e| e.mirror.as_ref().map(|m| m.id))
            .collect()
    }

    /// Drops everything, canonical data included (document close).
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: EntityData> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

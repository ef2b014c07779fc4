use std::collections::BTreeMap;
use std::sync::Arc;

use foundation::TileCoordinate;
use parking_lot::{Mutex, MutexGuard};

use crate::entity::{Entity, EntityId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityCollectionError {
    DuplicateId(EntityId),
}

impl std::fmt::Display for EntityCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityCollectionError::DuplicateId(id) => {
                write!(f, "an entity with id {id} already exists in the collection")
            }
        }
    }
}

impl std::error::Error for EntityCollectionError {}

/// Id-keyed entity registry.
///
/// Entries live in a `BTreeMap`, so `values()` iterates in ascending id order.
#[derive(Debug, Default)]
pub struct EntityCollection {
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn add(&mut self, entity: Entity) -> Result<&mut Entity, EntityCollectionError> {
        use std::collections::btree_map::Entry;

        match self.entities.entry(entity.id.clone()) {
            Entry::Occupied(_) => Err(EntityCollectionError::DuplicateId(entity.id)),
            Entry::Vacant(slot) => Ok(slot.insert(entity)),
        }
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn get_by_id(&self, id: &EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_by_id_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn remove_by_id(&mut self, id: &EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    pub fn remove_all(&mut self) {
        self.entities.clear();
    }

    pub fn values(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Ids of every entity whose tile back-reference matches `tile`.
    pub fn ids_on_tile(&self, tile: &TileCoordinate) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.belongs_to(tile))
            .map(|e| e.id.clone())
            .collect()
    }
}

/// Cloneable handle to an `EntityCollection` shared between the synchroniser,
/// the viewer and the embedding application.
#[derive(Debug, Clone)]
pub struct SharedEntities {
    name: Arc<str>,
    inner: Arc<Mutex<EntityCollection>>,
}

impl SharedEntities {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            inner: Arc::new(Mutex::new(EntityCollection::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lock(&self) -> MutexGuard<'_, EntityCollection> {
        self.inner.lock()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.inner.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Both handles refer to the same collection.
    pub fn same_collection(&self, other: &SharedEntities) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityCollection, EntityCollectionError, SharedEntities};
    use crate::entity::{Entity, EntityId};
    use foundation::math::Cartographic;
    use foundation::{GeoRectangle, TileCoordinate};

    fn entity(id: &str, tile: Option<TileCoordinate>) -> Entity {
        let mut e = Entity::new(EntityId::new(id), Cartographic::from_degrees(0.0, 0.0, 0.0));
        e.tile = tile;
        e
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut c = EntityCollection::new();
        c.add(entity("a", None)).expect("first add");
        let err = c.add(entity("a", None)).unwrap_err();
        assert_eq!(err, EntityCollectionError::DuplicateId(EntityId::new("a")));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn finds_entities_by_tile() {
        let t1 = TileCoordinate::new(1, 0, 0, GeoRectangle::MAX);
        let t2 = TileCoordinate::new(1, 1, 0, GeoRectangle::MAX);

        let mut c = EntityCollection::new();
        c.add(entity("b", Some(t1))).unwrap();
        c.add(entity("a", Some(t1))).unwrap();
        c.add(entity("c", Some(t2))).unwrap();
        c.add(entity("d", None)).unwrap();

        assert_eq!(c.ids_on_tile(&t1), vec![EntityId::new("a"), EntityId::new("b")]);
        assert_eq!(c.ids_on_tile(&t2), vec![EntityId::new("c")]);
    }

    #[test]
    fn shared_handles_see_the_same_collection() {
        let a = SharedEntities::new("tiles");
        let b = a.clone();
        a.lock().add(entity("x", None)).unwrap();
        assert!(b.contains(&EntityId::new("x")));
        assert!(a.same_collection(&b));
        assert!(!a.same_collection(&SharedEntities::new("tiles")));
        assert_eq!(b.name(), "tiles");
    }
}

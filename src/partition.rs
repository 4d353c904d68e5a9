// Partition Store - collection/favorites split of the catalog
//
// Invariant kept by every operation:
//   collection ∩ favorites = ∅
//   collection ∪ favorites = catalog (as id sets)
//   no id appears twice in either list
//
// Persistence and re-rendering are the caller's job (see app.rs); this type
// only owns the two lists and the catalog they are derived from.

use crate::entity::{Entity, EntityId};
use std::collections::HashSet;

/// Which side of the partition an entity is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Collection,
    Favorites,
}

#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Full catalog in original fetch order, read-only after initialize
    catalog: Vec<Entity>,
    collection: Vec<Entity>,
    favorites: Vec<Entity>,
}

impl Partition {
    /// Split `catalog` using the ids found in `persisted`
    ///
    /// Matching is by id only and the live catalog record wins. Persisted
    /// ids absent from the catalog are dropped.
    pub fn initialize(catalog: Vec<Entity>, persisted: &[Entity]) -> Self {
        let saved: HashSet<EntityId> = persisted.iter().map(|e| e.id).collect();

        let (favorites, collection): (Vec<Entity>, Vec<Entity>) = catalog
            .iter()
            .cloned()
            .partition(|e| saved.contains(&e.id));

        Partition {
            catalog,
            collection,
            favorites,
        }
    }

    pub fn catalog(&self) -> &[Entity] {
        &self.catalog
    }

    pub fn collection(&self) -> &[Entity] {
        &self.collection
    }

    pub fn favorites(&self) -> &[Entity] {
        &self.favorites
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Locate an entity by id
    pub fn side_of(&self, id: EntityId) -> Option<Side> {
        if self.collection.iter().any(|e| e.id == id) {
            Some(Side::Collection)
        } else if self.favorites.iter().any(|e| e.id == id) {
            Some(Side::Favorites)
        } else {
            None
        }
    }

    /// Move an entity from collection to the end of favorites
    ///
    /// Returns false (and changes nothing) if the id is not in collection.
    pub fn add_to_favorites(&mut self, id: EntityId) -> bool {
        move_entity(&mut self.collection, &mut self.favorites, id)
    }

    /// Move an entity from favorites to the end of collection
    pub fn remove_from_favorites(&mut self, id: EntityId) -> bool {
        move_entity(&mut self.favorites, &mut self.collection, id)
    }

    /// Everything back to unfavorited, collection in original fetch order
    pub fn reset(&mut self) {
        self.favorites.clear();
        self.collection = self.catalog.clone();
    }

    /// Distinct ids in `persisted` that the catalog does not contain
    pub fn unknown_ids(&self, persisted: &[Entity]) -> Vec<EntityId> {
        let known: HashSet<EntityId> = self.catalog.iter().map(|e| e.id).collect();
        let mut unknown: Vec<EntityId> = persisted
            .iter()
            .map(|e| e.id)
            .filter(|id| !known.contains(id))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    /// Sum of base experience over favorites
    pub fn total_experience(&self) -> u64 {
        self.favorites
            .iter()
            .map(|e| u64::from(e.base_experience))
            .sum()
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }
}

fn move_entity(from: &mut Vec<Entity>, to: &mut Vec<Entity>, id: EntityId) -> bool {
    match from.iter().position(|e| e.id == id) {
        Some(index) => {
            let entity = from.remove(index);
            to.push(entity);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<Entity> {
        vec![
            Entity::new(1, "bulbasaur", 64),
            Entity::new(2, "ivysaur", 142),
            Entity::new(3, "venusaur", 263),
            Entity::new(4, "charmander", 62),
        ]
    }

    fn ids(entities: &[Entity]) -> Vec<EntityId> {
        entities.iter().map(|e| e.id).collect()
    }

    fn id_set(entities: &[Entity]) -> HashSet<EntityId> {
        entities.iter().map(|e| e.id).collect()
    }

    /// Disjoint, covering, no duplicates
    fn assert_invariant(p: &Partition) {
        let collection = id_set(p.collection());
        let favorites = id_set(p.favorites());

        assert_eq!(collection.len(), p.collection().len(), "duplicate in collection");
        assert_eq!(favorites.len(), p.favorites().len(), "duplicate in favorites");
        assert!(collection.is_disjoint(&favorites));

        let union: HashSet<EntityId> = collection.union(&favorites).copied().collect();
        assert_eq!(union, id_set(p.catalog()));
    }

    #[test]
    fn test_initialize_without_snapshot() {
        let p = Partition::initialize(catalog(), &[]);

        assert_eq!(ids(p.collection()), vec![1, 2, 3, 4]);
        assert!(p.favorites().is_empty());
        assert_eq!(p.total_experience(), 0);
        assert_invariant(&p);
    }

    #[test]
    fn test_initialize_with_snapshot() {
        let persisted = vec![Entity::new(3, "venusaur", 263), Entity::new(1, "bulbasaur", 64)];
        let p = Partition::initialize(catalog(), &persisted);

        // Catalog order, not snapshot order
        assert_eq!(ids(p.favorites()), vec![1, 3]);
        assert_eq!(ids(p.collection()), vec![2, 4]);
        assert_invariant(&p);
    }

    #[test]
    fn test_initialize_live_record_wins() {
        let stale = vec![Entity::new(2, "old-name", 1)];
        let p = Partition::initialize(catalog(), &stale);

        assert_eq!(p.favorites(), &[Entity::new(2, "ivysaur", 142)]);
    }

    #[test]
    fn test_initialize_drops_unknown_persisted_ids() {
        let persisted = vec![Entity::new(1, "bulbasaur", 64), Entity::new(999, "ghost", 10)];
        let p = Partition::initialize(catalog(), &persisted);

        assert_eq!(ids(p.favorites()), vec![1]);
        assert_eq!(p.side_of(999), None);
        assert_invariant(&p);
    }

    #[test]
    fn test_unknown_ids_are_distinct() {
        let persisted = vec![
            Entity::new(1, "bulbasaur", 64),
            Entity::new(1, "bulbasaur", 64),
            Entity::new(999, "ghost", 10),
            Entity::new(999, "ghost", 10),
            Entity::new(500, "stray", 1),
        ];
        let p = Partition::initialize(catalog(), &persisted);

        assert_eq!(p.unknown_ids(&persisted), vec![500, 999]);
        assert_eq!(ids(p.favorites()), vec![1]);
        assert!(p.unknown_ids(&[]).is_empty());
    }

    #[test]
    fn test_initialize_for_many_snapshots() {
        // Every subset of the catalog ids plus a stray id keeps the invariant
        let all = catalog();
        for mask in 0u32..(1 << all.len()) {
            let mut persisted: Vec<Entity> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, e)| e.clone())
                .collect();
            persisted.push(Entity::new(500, "stray", 1));

            let p = Partition::initialize(all.clone(), &persisted);
            assert_eq!(p.favorites_count(), mask.count_ones() as usize);
            assert_invariant(&p);
        }
    }

    #[test]
    fn test_add_to_favorites() {
        let mut p = Partition::initialize(catalog(), &[]);

        assert!(p.add_to_favorites(1));
        assert_eq!(ids(p.collection()), vec![2, 3, 4]);
        assert_eq!(ids(p.favorites()), vec![1]);
        assert_eq!(p.total_experience(), 64);
        assert_eq!(p.side_of(1), Some(Side::Favorites));
        assert_invariant(&p);
    }

    #[test]
    fn test_add_appends_in_insertion_order() {
        let mut p = Partition::initialize(catalog(), &[]);
        p.add_to_favorites(4);
        p.add_to_favorites(2);

        assert_eq!(ids(p.favorites()), vec![4, 2]);
    }

    #[test]
    fn test_add_not_in_collection_is_noop() {
        let mut p = Partition::initialize(catalog(), &[Entity::new(1, "bulbasaur", 64)]);

        assert!(!p.add_to_favorites(1)); // already a favorite
        assert!(!p.add_to_favorites(42)); // unknown
        assert_eq!(ids(p.favorites()), vec![1]);
        assert_invariant(&p);
    }

    #[test]
    fn test_add_then_remove_restores_partition() {
        let mut p = Partition::initialize(catalog(), &[Entity::new(3, "venusaur", 263)]);
        let before_collection = id_set(p.collection());
        let before_favorites = id_set(p.favorites());

        p.add_to_favorites(2);
        p.remove_from_favorites(2);

        assert_eq!(id_set(p.collection()), before_collection);
        assert_eq!(id_set(p.favorites()), before_favorites);
        assert_invariant(&p);
    }

    #[test]
    fn test_remove_appends_to_collection() {
        let mut p = Partition::initialize(catalog(), &[]);
        p.add_to_favorites(1);

        assert!(p.remove_from_favorites(1));
        assert_eq!(ids(p.collection()), vec![2, 3, 4, 1]);
        assert!(!p.remove_from_favorites(1));
    }

    #[test]
    fn test_total_experience_tracks_single_moves() {
        let mut p = Partition::initialize(catalog(), &[]);

        p.add_to_favorites(2);
        assert_eq!(p.total_experience(), 142);
        p.add_to_favorites(3);
        assert_eq!(p.total_experience(), 142 + 263);
        p.remove_from_favorites(2);
        assert_eq!(p.total_experience(), 263);
        assert_eq!(p.favorites_count(), 1);
    }

    #[test]
    fn test_reset_restores_original_order() {
        let mut p = Partition::initialize(catalog(), &[]);
        p.add_to_favorites(1);
        p.add_to_favorites(3);
        p.remove_from_favorites(1);

        p.reset();

        assert_eq!(ids(p.collection()), vec![1, 2, 3, 4]);
        assert!(p.favorites().is_empty());
        assert_invariant(&p);
    }

    #[test]
    fn test_empty_partition() {
        let mut p = Partition::default();

        assert!(p.is_empty());
        assert!(!p.add_to_favorites(1));
        p.reset();
        assert!(p.collection().is_empty());
    }
}

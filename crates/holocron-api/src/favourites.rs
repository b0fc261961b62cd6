//! Session-scoped favourites list.
//!
//! Entries are unique by id and kept in insertion order. Adding an id that is
//! already present replaces the stored entry in place, so the freshest fields
//! win while the position is kept.

use tracing::debug;

use crate::model::FavouriteEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavouritesStore {
    entries: Vec<FavouriteEntry>,
}

impl FavouritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: FavouriteEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            debug!(id = %entry.id, "favourites: replacing existing entry");
            *existing = entry;
        } else {
            debug!(id = %entry.id, name = %entry.name, "favourites: added");
            self.entries.push(entry);
        }
    }

    /// Removing an id that is not present is a no-op.
    pub fn remove(&mut self, id: &str) {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() != before {
            debug!(id, "favourites: removed");
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Remove `entry.id` if present, otherwise add `entry`. Returns whether
    /// the id is a favourite afterwards.
    pub fn toggle(&mut self, entry: FavouriteEntry) -> bool {
        if self.contains(&entry.id) {
            self.remove(&entry.id);
            false
        } else {
            self.add(entry);
            true
        }
    }

    pub fn list(&self) -> &[FavouriteEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&FavouriteEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fav(id: &str, name: &str) -> FavouriteEntry {
        FavouriteEntry {
            id: id.into(),
            name: name.into(),
            gender: "male".into(),
            height: "172".into(),
            home_planet: "Tatooine".into(),
        }
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut store = FavouritesStore::new();
        store.add(fav("1", "Luke Skywalker"));
        store.add(fav("4", "Darth Vader"));
        store.add(fav("2", "C-3PO"));
        let ids: Vec<&str> = store.list().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "4", "2"]);
    }

    #[test]
    fn duplicate_id_replaces_in_place() {
        let mut store = FavouritesStore::new();
        store.add(fav("1", "Luke"));
        store.add(fav("2", "C-3PO"));
        store.add(fav("1", "Luke Skywalker"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].name, "Luke Skywalker");
        assert_eq!(store.list()[1].id, "2");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = FavouritesStore::new();
        store.add(fav("1", "Luke Skywalker"));
        store.add(fav("5", "Leia Organa"));

        store.remove("1");
        let after_first = store.clone();
        store.remove("1");
        assert_eq!(store, after_first);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut store = FavouritesStore::new();
        store.add(fav("1", "Luke Skywalker"));
        store.remove("99");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_then_remove_restores_content() {
        let mut store = FavouritesStore::new();
        store.add(fav("3", "R2-D2"));
        let before = store.clone();

        store.add(fav("1", "Luke Skywalker"));
        store.remove("1");
        assert_eq!(store, before);
    }

    #[test]
    fn contains_and_toggle() {
        let mut store = FavouritesStore::new();
        assert!(!store.contains("1"));
        assert!(store.toggle(fav("1", "Luke Skywalker")));
        assert!(store.contains("1"));
        assert!(!store.toggle(fav("1", "Luke Skywalker")));
        assert!(store.is_empty());
    }
}

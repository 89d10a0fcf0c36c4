// ── Keyed collection ──
//
// Insertion-ordered storage where each item carries its own identity.
// Upserts replace by key; positions are never used for matching.

use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// An item that knows its logical identity.
pub trait Keyed {
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn key(&self) -> Self::Key;
}

/// Ordered collection with at most one item per key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedList<T: Keyed> {
    items: IndexMap<T::Key, T>,
}

impl<T: Keyed> Default for KeyedList<T> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }
}

impl<T: Keyed> KeyedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace by key. Returns `true` if the key was new.
    ///
    /// A replaced item keeps its original position.
    pub fn upsert(&mut self, item: T) -> bool {
        self.items.insert(item.key(), item).is_none()
    }

    /// Insert only when no item with the same key exists.
    /// Returns `true` if the item was added.
    pub fn insert_if_absent(&mut self, item: T) -> bool {
        let key = item.key();
        if self.items.contains_key(&key) {
            return false;
        }
        self.items.insert(key, item);
        true
    }

    /// Replace the whole contents. Later duplicates win.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.clear();
        for item in items {
            self.upsert(item);
        }
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.items.get(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.items.contains_key(key)
    }

    /// Remove by key, preserving the order of the remaining items.
    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        self.items.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.values().cloned().collect()
    }
}

impl<T: Keyed> FromIterator<T> for KeyedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.replace_all(iter);
        list
    }
}

impl<'a, T: Keyed> IntoIterator for &'a KeyedList<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, T::Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.values()
    }
}

// Serialized as a plain sequence; keys are derivable from the items.
impl<T: Keyed + Serialize> Serialize for KeyedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: &'static str,
        value: u32,
    }

    impl Keyed for Item {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.id
        }
    }

    fn item(id: &'static str, value: u32) -> Item {
        Item { id, value }
    }

    #[test]
    fn upsert_returns_true_for_new_key() {
        let mut list = KeyedList::new();
        assert!(list.upsert(item("a", 1)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut list: KeyedList<Item> = [item("a", 1), item("b", 2)].into_iter().collect();
        assert!(!list.upsert(item("a", 10)));

        let values: Vec<_> = list.iter().map(|i| (i.id, i.value)).collect();
        assert_eq!(values, vec![("a", 10), ("b", 2)]);
    }

    #[test]
    fn insert_if_absent_keeps_existing() {
        let mut list = KeyedList::new();
        assert!(list.insert_if_absent(item("a", 1)));
        assert!(!list.insert_if_absent(item("a", 2)));
        assert_eq!(list.get(&"a").map(|i| i.value), Some(1));
    }

    #[test]
    fn replace_all_dedupes_by_key() {
        let mut list = KeyedList::new();
        list.upsert(item("z", 0));
        list.replace_all([item("a", 1), item("b", 2), item("a", 3)]);

        assert_eq!(list.len(), 2);
        assert!(!list.contains(&"z"));
        assert_eq!(list.get(&"a").map(|i| i.value), Some(3));
    }

    #[test]
    fn remove_preserves_order() {
        let mut list: KeyedList<Item> =
            [item("a", 1), item("b", 2), item("c", 3)].into_iter().collect();
        assert!(list.remove(&"a").is_some());
        let ids: Vec<_> = list.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}

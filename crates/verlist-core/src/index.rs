//! Ordered index primitive underneath the registry.
//!
//! The registry only needs exact lookup, insert, remove and in-order
//! traversal. Any balanced tree or ordered map can provide those;
//! [`BTreeIndex`] is the default and is backed by the standard `BTreeMap`.
//!
//! Key order is the key type's `Ord`. To index by a custom comparison, wrap
//! the key in a newtype that implements `Ord` accordingly.

use crate::entry::Entry;
use std::collections::BTreeMap;

/// An ordered container of entries, unique by key.
pub trait OrderedIndex<K, V> {
    /// In-order iterator over stored entries.
    type Iter<'a>: Iterator<Item = &'a Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    /// Store an entry under its key.
    ///
    /// Returns the entry previously stored under that key, if any.
    fn insert(&mut self, entry: Entry<K, V>) -> Option<Entry<K, V>>;

    /// Remove and return the entry stored under `key`.
    fn remove(&mut self, key: &K) -> Option<Entry<K, V>>;

    /// Exact-key lookup.
    fn get(&self, key: &K) -> Option<&Entry<K, V>>;

    /// Exact-key lookup with mutable access.
    fn get_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>>;

    /// Iterate entries in key order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Check if the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a key is stored.
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

/// `BTreeMap`-backed ordered index.
#[derive(Debug, Clone)]
pub struct BTreeIndex<K, V> {
    entries: BTreeMap<K, Entry<K, V>>,
}

impl<K: Ord, V> Default for BTreeIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> BTreeIndex<K, V> {
    /// Create a new empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone, V> OrderedIndex<K, V> for BTreeIndex<K, V> {
    type Iter<'a> = std::collections::btree_map::Values<'a, K, Entry<K, V>>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, entry: Entry<K, V>) -> Option<Entry<K, V>> {
        self.entries.insert(entry.key().clone(), entry)
    }

    fn remove(&mut self, key: &K) -> Option<Entry<K, V>> {
        self.entries.remove(key)
    }

    fn get(&self, key: &K) -> Option<&Entry<K, V>> {
        self.entries.get(key)
    }

    fn get_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.entries.values()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

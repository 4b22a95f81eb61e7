//! The versioned registry.
//!
//! A registry keeps one entry per key in an ordered index and reconciles
//! changes through a [`Reconcile`] callback according to a fixed [`Policy`].
//!
//! Generation updates work by version stamping:
//! - [`Registry::begin_update`] advances the current version
//! - every entry re-added before [`Registry::end_update`] is stamped with it
//! - `end_update` sweeps whatever still carries an older stamp

use crate::entry::{Entry, Version};
use crate::index::{BTreeIndex, OrderedIndex};
use crate::policy::Policy;
use crate::reconcile::Reconcile;
use std::fmt::Debug;
use std::marker::PhantomData;

/// What became of an entry passed to [`Registry::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Added<K, V> {
    /// The key was new; the entry is now indexed
    Inserted,
    /// The entry took over the slot of an indexed entry with the same key
    Replaced,
    /// An indexed entry with the same key was kept.
    ///
    /// The incoming entry is handed back to the caller.
    Kept {
        /// The entry that was not indexed
        discarded: Entry<K, V>,
    },
}

impl<K, V> Added<K, V> {
    /// Whether the incoming entry ended up in the index.
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        !matches!(self, Added::Kept { .. })
    }

    /// Take back the entry the registry declined to index, if any.
    #[must_use]
    pub fn into_discarded(self) -> Option<Entry<K, V>> {
        match self {
            Added::Kept { discarded } => Some(discarded),
            Added::Inserted | Added::Replaced => None,
        }
    }
}

/// Outcome of [`Registry::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The entry left the index and went to the callback
    Removed,
    /// The policy forbids removal; the entry is still indexed
    Retained,
    /// No entry with that key
    NotFound,
}

/// A keyed, ordered, versioned collection.
///
/// Single-threaded: every operation takes `&mut self` (or `&self` for reads)
/// and runs the callback synchronously before returning.
#[derive(Debug)]
pub struct Registry<K, V, C = (), I = BTreeIndex<K, V>> {
    index: I,
    version: Version,
    callback: C,
    policy: Policy,
    _entries: PhantomData<fn() -> (K, V)>,
}

impl<K, V, C> Registry<K, V, C>
where
    K: Ord + Clone + Debug,
    C: Reconcile<K, V>,
{
    /// Create an empty registry on the default `BTreeMap` index.
    #[must_use]
    pub fn new(policy: Policy, callback: C) -> Self {
        Self::with_index(BTreeIndex::new(), policy, callback)
    }
}

impl<K, V, C, I> Registry<K, V, C, I>
where
    K: Clone + Debug,
    C: Reconcile<K, V>,
    I: OrderedIndex<K, V>,
{
    /// Create a registry on top of the given index.
    ///
    /// Entries already in `index` keep their stamps. The registry resumes at
    /// the newest generation found among them, so the next sweep treats every
    /// unpinned entry as un-refreshed.
    #[must_use]
    pub fn with_index(index: I, policy: Policy, callback: C) -> Self {
        let version = index
            .iter()
            .map(Entry::version)
            .filter(|v| *v != Version::Pinned)
            .max()
            .unwrap_or(Version::INITIAL);
        Self {
            index,
            version,
            callback,
            policy,
            _entries: PhantomData,
        }
    }

    /// The policy fixed at construction.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// The current generation.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The reconciliation callback.
    #[must_use]
    pub fn callback(&self) -> &C {
        &self.callback
    }

    /// Mutable access to the reconciliation callback.
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    /// Add an entry, reconciling with any indexed entry under the same key.
    ///
    /// The entry is stamped with the current generation. Insertion is visible
    /// immediately whether or not an update is in progress.
    #[must_use = "a kept collision hands the incoming entry back to the caller"]
    pub fn add(&mut self, mut entry: Entry<K, V>) -> Added<K, V> {
        entry.stamp_current(self.version);
        self.place(entry)
    }

    /// Add an entry that generation sweeps never remove.
    ///
    /// It can still leave through [`delete`](Self::delete) or
    /// [`flush_all`](Self::flush_all), or by being re-added unpinned.
    #[must_use = "a kept collision hands the incoming entry back to the caller"]
    pub fn add_pinned(&mut self, mut entry: Entry<K, V>) -> Added<K, V> {
        entry.pin();
        self.place(entry)
    }

    fn place(&mut self, entry: Entry<K, V>) -> Added<K, V> {
        if self.policy.keeps_existing() {
            if let Some(kept) = self.index.get_mut(entry.key()) {
                kept.stamp_current(entry.version());
                tracing::debug!(
                    policy = %self.policy,
                    key = ?kept.key(),
                    version = %kept.version(),
                    "Kept existing entry"
                );
                self.callback.on_keep(kept, &entry);
                return Added::Kept { discarded: entry };
            }
        }

        // Under keep-old and no-delete the key is known to be free here.
        let key = entry.key().clone();
        match self.index.insert(entry) {
            Some(old) => {
                if let Some(current) = self.index.get_mut(&key) {
                    tracing::debug!(
                        policy = %self.policy,
                        key = ?key,
                        old_version = %old.version(),
                        version = %current.version(),
                        "Replaced entry"
                    );
                    self.callback.on_replace(current, old);
                }
                Added::Replaced
            }
            None => {
                if let Some(inserted) = self.index.get(&key) {
                    tracing::debug!(key = ?key, version = %inserted.version(), "Inserted entry");
                    self.callback.on_insert(inserted);
                }
                Added::Inserted
            }
        }
    }

    /// Remove an indexed entry right away.
    ///
    /// Under [`Policy::NoDelete`] this is a no-op that reports
    /// [`Removal::Retained`]; use [`detach`](Self::detach) to take the entry
    /// out by hand.
    pub fn delete(&mut self, key: &K) -> Removal {
        if !self.index.contains_key(key) {
            return Removal::NotFound;
        }
        if !self.policy.removes() {
            tracing::debug!(policy = %self.policy, key = ?key, "Delete suppressed");
            return Removal::Retained;
        }
        match self.index.remove(key) {
            Some(old) => {
                tracing::debug!(key = ?key, version = %old.version(), "Deleted entry");
                self.callback.on_remove(old);
                Removal::Removed
            }
            None => Removal::NotFound,
        }
    }

    /// Take an entry out of the index without consulting policy or callback.
    ///
    /// Ownership passes to the caller.
    pub fn detach(&mut self, key: &K) -> Option<Entry<K, V>> {
        let entry = self.index.remove(key)?;
        tracing::debug!(key = ?key, version = %entry.version(), "Detached entry");
        Some(entry)
    }

    /// Exact-key lookup.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<&Entry<K, V>> {
        self.index.get(key)
    }

    /// Exact-key lookup with access to the payload.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
        self.index.get_mut(key)
    }

    /// Stamp an indexed entry with the current generation without re-adding it.
    ///
    /// Pinned entries stay pinned. Returns `false` if the key is not indexed.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get_mut(key) {
            Some(entry) => {
                if !entry.is_pinned() {
                    entry.stamp_current(self.version);
                }
                true
            }
            None => false,
        }
    }

    /// Start a new generation.
    pub fn begin_update(&mut self) {
        let next = self.version.next();
        if next == self.version {
            tracing::warn!(version = %self.version, "Generation counter saturated");
        }
        self.version = next;
        tracing::debug!(version = %self.version, "Began update");
    }

    /// Finish the current generation, sweeping entries not refreshed since
    /// [`begin_update`](Self::begin_update).
    ///
    /// Returns the number of entries removed. Under [`Policy::NoDelete`]
    /// nothing is removed and the callback is not called.
    pub fn end_update(&mut self) -> usize {
        let current = self.version;
        self.sweep(|entry| entry.version().is_stale(current))
    }

    /// Remove every entry, pinned ones included.
    ///
    /// Subject to the same policy suppression as a sweep.
    pub fn flush_all(&mut self) -> usize {
        self.sweep(|_| true)
    }

    fn sweep(&mut self, mut doomed: impl FnMut(&Entry<K, V>) -> bool) -> usize {
        let before_len = self.index.len();
        if !self.policy.removes() {
            tracing::debug!(
                policy = %self.policy,
                version = %self.version,
                len = before_len,
                "Sweep suppressed"
            );
            return 0;
        }

        let stale: Vec<K> = self
            .index
            .iter()
            .filter(|entry| doomed(*entry))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in &stale {
            if let Some(old) = self.index.remove(key) {
                self.callback.on_remove(old);
                removed += 1;
            }
        }

        tracing::debug!(
            version = %self.version,
            before_len,
            after_len = self.index.len(),
            removed,
            "Finished sweep"
        );
        removed
    }

    /// Iterate indexed entries in key order.
    pub fn iter(&self) -> I::Iter<'_> {
        self.index.iter()
    }

    /// Get the number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

//! Reconciliation callbacks.
//!
//! The registry calls exactly one method per structural change. Entries the
//! callback is responsible for arrive by value and are freed when it drops
//! them; entries that stay indexed arrive by reference.
//!
//! | Change | Method | Replace | KeepOld | NoDelete |
//! |--------|--------|---------|---------|----------|
//! | insert | [`on_insert`](Reconcile::on_insert) | notify | notify | notify |
//! | collision | [`on_replace`](Reconcile::on_replace) / [`on_keep`](Reconcile::on_keep) | drop old | nothing | copy into kept |
//! | removal | [`on_remove`](Reconcile::on_remove) | drop old | drop old | never called |

use crate::entry::Entry;

/// Caller-supplied reaction to registry changes.
///
/// Every method has a no-op default, so `()` is a valid callback for any
/// policy. The callback lives beside the index, not inside it, so it cannot
/// reach back into the registry that is invoking it.
pub trait Reconcile<K, V> {
    /// A new key entered the index.
    fn on_insert(&mut self, entry: &Entry<K, V>) {
        let _ = entry;
    }

    /// Under [`Policy::Replace`](crate::Policy::Replace), `current` took the
    /// slot previously held by `old`.
    ///
    /// `old` is owned here; dropping it frees it. Anything worth carrying over
    /// can be moved into `current` first.
    fn on_replace(&mut self, current: &mut Entry<K, V>, old: Entry<K, V>) {
        let _ = current;
        drop(old);
    }

    /// Under [`Policy::KeepOld`](crate::Policy::KeepOld) or
    /// [`Policy::NoDelete`](crate::Policy::NoDelete), `kept` stayed indexed
    /// and `incoming` was turned away.
    ///
    /// The registry has already refreshed `kept`'s version. A no-op is correct
    /// for keep-old. For no-delete the callback should copy whatever it needs
    /// from `incoming` into `kept`. `incoming` goes back to the caller of
    /// `add` afterwards.
    fn on_keep(&mut self, kept: &mut Entry<K, V>, incoming: &Entry<K, V>) {
        let _ = (kept, incoming);
    }

    /// An entry left the index through a sweep, `delete` or `flush_all`.
    fn on_remove(&mut self, old: Entry<K, V>) {
        drop(old);
    }
}

impl<K, V> Reconcile<K, V> for () {}

impl<K, V, R: Reconcile<K, V> + ?Sized> Reconcile<K, V> for &mut R {
    fn on_insert(&mut self, entry: &Entry<K, V>) {
        (**self).on_insert(entry);
    }

    fn on_replace(&mut self, current: &mut Entry<K, V>, old: Entry<K, V>) {
        (**self).on_replace(current, old);
    }

    fn on_keep(&mut self, kept: &mut Entry<K, V>, incoming: &Entry<K, V>) {
        (**self).on_keep(kept, incoming);
    }

    fn on_remove(&mut self, old: Entry<K, V>) {
        (**self).on_remove(old);
    }
}

impl<K, V, R: Reconcile<K, V> + ?Sized> Reconcile<K, V> for Box<R> {
    fn on_insert(&mut self, entry: &Entry<K, V>) {
        (**self).on_insert(entry);
    }

    fn on_replace(&mut self, current: &mut Entry<K, V>, old: Entry<K, V>) {
        (**self).on_replace(current, old);
    }

    fn on_keep(&mut self, kept: &mut Entry<K, V>, incoming: &Entry<K, V>) {
        (**self).on_keep(kept, incoming);
    }

    fn on_remove(&mut self, old: Entry<K, V>) {
        (**self).on_remove(old);
    }
}

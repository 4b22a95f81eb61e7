//! Registry entries and their version stamps.
//!
//! An entry pairs an immutable key with a caller payload. The registry stamps
//! every entry it accepts with the generation that was current at the time;
//! a sweep removes entries whose stamp fell behind.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A generation stamp.
///
/// `Generation` values order numerically. `Pinned` orders above every
/// generation, so a pinned entry is never considered stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// Stamped during the given generation
    Generation(u64),
    /// Exempt from generation sweeps
    Pinned,
}

impl Version {
    /// The generation a fresh registry starts in.
    pub const INITIAL: Self = Self::Generation(0);

    /// The following generation. `Pinned` stays pinned.
    ///
    /// Saturates at `u64::MAX`: past that point `next` returns `self`, and
    /// sweeps in a registry stuck there remove nothing. The registry logs a
    /// warning when it happens.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Generation(n) => Self::Generation(n.saturating_add(1)),
            Self::Pinned => Self::Pinned,
        }
    }

    /// Whether an entry stamped with `self` is stale relative to `current`.
    #[must_use]
    pub fn is_stale(self, current: Self) -> bool {
        self < current
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Generation(a), Self::Generation(b)) => a.cmp(b),
            (Self::Generation(_), Self::Pinned) => Ordering::Less,
            (Self::Pinned, Self::Generation(_)) => Ordering::Greater,
            (Self::Pinned, Self::Pinned) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::Generation(n) => write!(f, "g{n}"),
            Version::Pinned => write!(f, "pinned"),
        }
    }
}

/// A keyed record stored in a registry.
///
/// The key cannot change once the entry exists, so an indexed entry can never
/// drift away from its slot. The payload is public and may be edited freely,
/// including from within a reconciliation callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    key: K,
    version: Version,
    /// Caller payload
    pub value: V,
}

impl<K, V> Entry<K, V> {
    /// Create a new, unstamped entry.
    #[must_use]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            version: Version::INITIAL,
            value,
        }
    }

    /// The entry's key.
    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The generation this entry was last stamped with.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Whether the entry is exempt from sweeps.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.version == Version::Pinned
    }

    /// Split the entry into its key and payload.
    #[must_use]
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Stamp the entry with the registry's current generation.
    pub(crate) fn stamp_current(&mut self, current: Version) {
        self.version = current;
    }

    pub(crate) fn pin(&mut self) {
        self.version = Version::Pinned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering() {
        assert!(Version::Generation(1) < Version::Generation(2));
        assert!(Version::Generation(u64::MAX) < Version::Pinned);
        assert_eq!(Version::Pinned.next(), Version::Pinned);
        assert_eq!(Version::INITIAL.next(), Version::Generation(1));
    }

    #[test]
    fn staleness_is_strict() {
        let current = Version::Generation(3);
        assert!(Version::Generation(2).is_stale(current));
        assert!(!Version::Generation(3).is_stale(current));
        assert!(!Version::Pinned.is_stale(current));
    }

    #[test]
    fn stamp_and_pin() {
        let mut entry = Entry::new("a", 1);
        assert_eq!(entry.version(), Version::INITIAL);

        entry.stamp_current(Version::Generation(5));
        assert_eq!(entry.version(), Version::Generation(5));

        entry.pin();
        assert!(entry.is_pinned());
        assert_eq!(entry.into_parts(), ("a", 1));
    }

    #[test]
    fn version_display() {
        assert_eq!(Version::Generation(7).to_string(), "g7");
        assert_eq!(Version::Pinned.to_string(), "pinned");
    }
}

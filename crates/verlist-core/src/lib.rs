//! # verlist core
//!
//! A keyed, ordered, versioned registry with generation-based reconciliation.
//!
//! This crate provides:
//! - Entries carrying an immutable key, a registry-managed version stamp and a payload
//! - An ordered index abstraction with a `BTreeMap`-backed default
//! - Three fixed retention policies (replace, keep-old, no-delete)
//! - A reconciliation callback trait whose signatures encode entry ownership
//! - The registry itself, with `begin_update`/`end_update` generation sweeps

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entry;
pub mod index;
pub mod policy;
pub mod reconcile;
pub mod registry;

pub use entry::{Entry, Version};
pub use index::{BTreeIndex, OrderedIndex};
pub use policy::{ParsePolicyError, Policy};
pub use reconcile::Reconcile;
pub use registry::{Added, Registry, Removal};

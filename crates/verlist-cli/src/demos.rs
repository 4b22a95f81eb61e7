//! Walkthroughs of each retention policy.

use crate::config::{DemoConfig, Generation};
use verlist_core::{Entry, OrderedIndex, Policy, Reconcile, Registry};

type Node = Entry<String, i64>;

/// Frees replaced and removed entries.
#[derive(Debug, Default)]
struct Replacing;

impl Reconcile<String, i64> for Replacing {
    fn on_insert(&mut self, entry: &Node) {
        tracing::info!(key = %entry.key(), "adding new entry");
    }

    fn on_replace(&mut self, current: &mut Node, old: Node) {
        tracing::info!(
            key = %current.key(),
            old = old.value,
            new = current.value,
            "replacing old entry"
        );
    }

    fn on_remove(&mut self, old: Node) {
        tracing::info!(key = %old.key(), "freeing old entry");
    }
}

/// Ignores colliding entries; the caller frees them.
#[derive(Debug, Default)]
struct Ignoring;

impl Reconcile<String, i64> for Ignoring {
    fn on_insert(&mut self, entry: &Node) {
        tracing::info!(key = %entry.key(), "must be adding new entry");
    }

    fn on_keep(&mut self, kept: &mut Node, incoming: &Node) {
        tracing::info!(
            key = %kept.key(),
            ignored = incoming.value,
            "ignoring new entry"
        );
    }

    fn on_remove(&mut self, old: Node) {
        tracing::info!(key = %old.key(), "must be removing the original entry");
    }
}

/// Copies colliding payloads into the original entry.
#[derive(Debug, Default)]
struct Copying;

impl Reconcile<String, i64> for Copying {
    fn on_insert(&mut self, entry: &Node) {
        tracing::info!(key = %entry.key(), "adding new entry");
    }

    fn on_keep(&mut self, kept: &mut Node, incoming: &Node) {
        tracing::info!(
            key = %kept.key(),
            old = kept.value,
            new = incoming.value,
            "updating old entry"
        );
        kept.value = incoming.value;
    }
}

/// Logs every change; used by `replay` under whichever policy is configured.
#[derive(Debug, Default)]
struct Tally {
    inserted: usize,
    replaced: usize,
    kept: usize,
    removed: usize,
}

impl Reconcile<String, i64> for Tally {
    fn on_insert(&mut self, entry: &Node) {
        self.inserted += 1;
        tracing::info!(key = %entry.key(), value = entry.value, "insert");
    }

    fn on_replace(&mut self, current: &mut Node, old: Node) {
        self.replaced += 1;
        tracing::info!(key = %current.key(), old = old.value, new = current.value, "replace");
    }

    fn on_keep(&mut self, kept: &mut Node, incoming: &Node) {
        self.kept += 1;
        tracing::info!(key = %kept.key(), kept = kept.value, ignored = incoming.value, "keep");
    }

    fn on_remove(&mut self, old: Node) {
        self.removed += 1;
        tracing::info!(key = %old.key(), value = old.value, "remove");
    }
}

fn print_registry<C, I>(reg: &Registry<String, i64, C, I>, message: &str)
where
    C: Reconcile<String, i64>,
    I: OrderedIndex<String, i64>,
{
    println!("{message}");
    if reg.is_empty() {
        println!("registry is empty");
    }
    for entry in reg.iter() {
        println!(
            "registry contains: {}, value {} ({})",
            entry.key(),
            entry.value,
            entry.version()
        );
    }
}

/// The new entry completely replaces the old one.
pub fn plain(config: &DemoConfig) {
    let mut reg = Registry::new(Policy::Replace, Replacing);

    let _ = reg.add(Entry::new(config.key.clone(), config.initial_value));
    print_registry(&reg, "original values");

    reg.begin_update();
    let _ = reg.add(Entry::new(config.key.clone(), config.update_value));
    reg.end_update();

    print_registry(
        &reg,
        &format!("new values, expect value to be {}", config.update_value),
    );
}

/// The first entry wins; later ones are handed back and dropped.
pub fn keep_old(config: &DemoConfig) {
    let mut reg = Registry::new(Policy::KeepOld, Ignoring);

    let _ = reg.add(Entry::new(config.key.clone(), config.initial_value));
    print_registry(&reg, "original values");

    println!("now update some info in the entry");
    reg.begin_update();
    if let Some(discarded) = reg
        .add(Entry::new(config.key.clone(), config.update_value))
        .into_discarded()
    {
        println!("freeing discarded entry with value {}", discarded.value);
    }
    reg.end_update();

    print_registry(&reg, "new values");
    if let Some(found) = reg.find(&config.key) {
        println!(
            "lookup value ({}) should match the original ({})",
            found.value, config.initial_value
        );
    }

    // Not re-adding the entry in the next generation removes it.
    reg.begin_update();
    reg.end_update();
    print_registry(&reg, "expect the registry to be empty");
}

/// The original entry stays in place; the callback copies new data into it.
pub fn no_delete(config: &DemoConfig) {
    let mut reg = Registry::new(Policy::NoDelete, Copying);

    let _ = reg.add(Entry::new(config.key.clone(), config.initial_value));
    print_registry(&reg, "original values");

    println!("now update some info in the entry");
    reg.begin_update();
    let discarded = reg
        .add(Entry::new(config.key.clone(), config.update_value))
        .into_discarded();
    println!(
        "incoming entry handed back to caller: {}",
        discarded.is_some()
    );
    reg.end_update();

    print_registry(&reg, "new values");
    if let Some(found) = reg.find(&config.key) {
        println!(
            "lookup value ({}) should match the new one ({})",
            found.value, config.update_value
        );
    }

    // Removal must be done by hand.
    if let Some(original) = reg.detach(&config.key) {
        println!("detached original entry {}", original.key());
    }
    print_registry(&reg, "expect the registry to be empty");
}

/// Apply each configured generation under the configured policy.
pub fn replay(config: &DemoConfig) {
    let mut reg = Registry::new(config.policy, Tally::default());
    tracing::info!(policy = %config.policy, generations = config.generations.len(), "Replaying");

    for (n, generation) in config.generations.iter().enumerate() {
        apply_generation(&mut reg, generation);
        print_registry(&reg, &format!("after generation {n}"));
    }

    let tally = reg.callback();
    println!(
        "inserted {}, replaced {}, kept {}, removed {}",
        tally.inserted, tally.replaced, tally.kept, tally.removed
    );
}

fn apply_generation(reg: &mut Registry<String, i64, Tally>, generation: &Generation) -> usize {
    reg.begin_update();
    for (key, value) in generation {
        let _ = reg.add(Entry::new(key.clone(), *value));
    }
    reg.end_update()
}

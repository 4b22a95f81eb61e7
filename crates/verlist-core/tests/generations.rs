use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use verlist_core::{Entry, Policy, Reconcile, Registry};

#[derive(Debug, Default)]
struct Ledger {
    removed: Vec<u16>,
    replaced: usize,
    kept: usize,
}

impl Reconcile<u16, u32> for Ledger {
    fn on_replace(&mut self, _current: &mut Entry<u16, u32>, _old: Entry<u16, u32>) {
        self.replaced += 1;
    }

    fn on_keep(&mut self, _kept: &mut Entry<u16, u32>, _incoming: &Entry<u16, u32>) {
        self.kept += 1;
    }

    fn on_remove(&mut self, old: Entry<u16, u32>) {
        self.removed.push(*old.key());
    }
}

fn generation_strategy() -> impl Strategy<Value = BTreeMap<u16, u32>> {
    proptest::collection::btree_map(0_u16..64, any::<u32>(), 0..24)
}

fn policy_strategy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        Just(Policy::Replace),
        Just(Policy::KeepOld),
        Just(Policy::NoDelete),
    ]
}

fn load(reg: &mut Registry<u16, u32, Ledger>, generation: &BTreeMap<u16, u32>) {
    for (&key, &value) in generation {
        let _ = reg.add(Entry::new(key, value));
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn inserted_entries_are_found(generation in generation_strategy(), policy in policy_strategy()) {
        let mut reg = Registry::new(policy, Ledger::default());
        load(&mut reg, &generation);

        prop_assert_eq!(reg.len(), generation.len());
        for (key, value) in &generation {
            prop_assert_eq!(reg.find(key).map(|e| e.value), Some(*value));
        }
    }

    #[test]
    fn generation_sweep_converges_to_new_set(
        first in generation_strategy(),
        second in generation_strategy(),
        policy in prop_oneof![Just(Policy::Replace), Just(Policy::KeepOld)],
    ) {
        let mut reg = Registry::new(policy, Ledger::default());
        load(&mut reg, &first);

        reg.begin_update();
        load(&mut reg, &second);
        let removed = reg.end_update();

        let first_keys: BTreeSet<u16> = first.keys().copied().collect();
        let second_keys: BTreeSet<u16> = second.keys().copied().collect();
        let expected_removed: Vec<u16> = first_keys.difference(&second_keys).copied().collect();

        let indexed: BTreeSet<u16> = reg.iter().map(|e| *e.key()).collect();
        prop_assert_eq!(&indexed, &second_keys);
        prop_assert_eq!(removed, expected_removed.len());
        prop_assert_eq!(&reg.callback().removed, &expected_removed);

        let collisions = first_keys.intersection(&second_keys).count();
        match policy {
            Policy::Replace => {
                prop_assert_eq!(reg.callback().replaced, collisions);
                for (key, value) in &second {
                    prop_assert_eq!(reg.find(key).map(|e| e.value), Some(*value));
                }
            }
            Policy::KeepOld | Policy::NoDelete => {
                prop_assert_eq!(reg.callback().kept, collisions);
                for key in first_keys.intersection(&second_keys) {
                    prop_assert_eq!(reg.find(key).map(|e| e.value), first.get(key).copied());
                }
            }
        }
    }

    #[test]
    fn no_delete_never_shrinks(
        first in generation_strategy(),
        second in generation_strategy(),
    ) {
        let mut reg = Registry::new(Policy::NoDelete, Ledger::default());
        load(&mut reg, &first);

        reg.begin_update();
        load(&mut reg, &second);
        prop_assert_eq!(reg.end_update(), 0);

        let union: BTreeSet<u16> = first.keys().chain(second.keys()).copied().collect();
        prop_assert_eq!(reg.len(), union.len());
        prop_assert!(reg.callback().removed.is_empty());
    }

    #[test]
    fn iteration_is_ordered(generation in generation_strategy()) {
        let mut reg = Registry::new(Policy::Replace, Ledger::default());
        load(&mut reg, &generation);

        let keys: Vec<u16> = reg.iter().map(|e| *e.key()).collect();
        let expected: Vec<u16> = generation.keys().copied().collect();
        prop_assert_eq!(keys, expected);
    }
}

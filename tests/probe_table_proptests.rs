// ProbeTable property tests (consolidated).
//
// Property 1: grow preserves the live set.
//  - Build a table from random inserts and erases (without growing), then
//    grow once.
//  - Invariant: capacity doubles, len is unchanged, every key live before
//    the call is found with its original value, tombstones are gone.
//
// Property 2: first insert wins and erase/reinsert takes the new value.
//  - Model: the first value inserted per key since its last erase.
//
// Property 3: both traversals agree.
//  - `first`/`next_entry` and `iter` yield the same entries, each live key
//    once, in strictly ascending slot order.
use hashbrown::HashMap;
use probe_map::{LoadFactor, ProbeTable};
use proptest::prelude::*;

fn ops() -> impl Strategy<Value = Vec<(bool, u8, u32)>> {
    // (insert?, key id, value)
    proptest::collection::vec((any::<bool>(), 0u8..24, any::<u32>()), 1..80)
}

fn key(id: u8) -> String {
    format!("k{}", id)
}

// Property 1: grow keeps every live entry.
proptest! {
    #[test]
    fn prop_grow_preserves_live_entries(ops in ops()) {
        let mut t: ProbeTable<u32> = ProbeTable::with_capacity(32).unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();
        for (ins, id, v) in ops {
            let k = key(id);
            if ins {
                if t.insert(&k, v).unwrap().is_inserted() {
                    model.insert(k, v);
                }
            } else if t.erase(&k) {
                model.remove(&k);
            }
        }

        let len_before = t.len();
        let dead_before = t.tombstones();
        let report = t.grow().unwrap();
        prop_assert_eq!(report.old_capacity, 32);
        prop_assert_eq!(report.new_capacity, 64);
        prop_assert_eq!(report.discarded_tombstones, dead_before);
        prop_assert_eq!(t.len(), len_before);
        prop_assert_eq!(t.len(), model.len());
        prop_assert_eq!(t.tombstones(), 0);
        for (k, v) in &model {
            prop_assert_eq!(t.search(k).map(|e| e.value()), Some(*v));
        }
    }
}

// Property 2: first insert wins until the key is erased.
proptest! {
    #[test]
    fn prop_first_insert_wins(ops in ops()) {
        let mut t: ProbeTable<u32> = ProbeTable::with_capacity(4).unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();
        let policy = LoadFactor::default();
        for (ins, id, v) in ops {
            let k = key(id);
            if ins {
                let out = t.insert_with_policy(&k, v, &policy).unwrap();
                prop_assert_eq!(out.is_inserted(), !model.contains_key(&k));
                model.entry(k.clone()).or_insert(v);
            } else {
                prop_assert_eq!(t.erase(&k), model.remove(&k).is_some());
            }
            prop_assert_eq!(t.get(&k), model.get(&k).copied());
        }
        prop_assert_eq!(t.len(), model.len());
    }
}

// Property 3: cursor walk and iter agree.
proptest! {
    #[test]
    fn prop_traversals_agree(ops in ops(), cap in 24usize..40) {
        let mut t: ProbeTable<u32> = ProbeTable::with_capacity(cap).unwrap();
        for (ins, id, v) in ops {
            let k = key(id);
            if ins { t.insert(&k, v).unwrap(); } else { t.erase(&k); }
        }

        let via_iter: Vec<(String, u32)> =
            t.iter().map(|e| (e.key().to_string(), e.value())).collect();
        prop_assert_eq!(via_iter.len(), t.len());

        let mut via_walk = Vec::new();
        let mut slots = Vec::new();
        let mut next = t.first().map(|e| (e.key().to_string(), e.value()));
        while let Some(kv) = next {
            slots.push(t.cursor().unwrap());
            via_walk.push(kv);
            next = t.next_entry().map(|e| (e.key().to_string(), e.value()));
        }
        prop_assert!(slots.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(via_walk, via_iter);
    }
}

#![cfg(test)]

// Property tests for ProbeTable kept inside the crate so they can inspect
// slot layout directly.

use crate::hash::home_slot;
use crate::probe_table::{InsertOutcome, ProbeTable};
use crate::slot::SlotState;
use crate::TableError;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, u32),
    Erase(usize),
    Search(usize),
    Get(String),
    Grow,
    Iterate,
    Walk,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<String>, Vec<OpI>)> {
    // Mixed-case keys so case-folded collisions show up often.
    let pool = proptest::collection::vec("[a-dA-D]{0,3}", 1..=10);
    (1usize..=8, pool).prop_flat_map(|(cap, pool)| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let get_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<u32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Erase),
            2 => idx.clone().prop_map(OpI::Search),
            1 => prop_oneof![get_pool, "[a-dA-D]{0,3}".prop_map(|s| s)].prop_map(OpI::Get),
            1 => Just(OpI::Grow),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Walk),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (cap, pool.clone(), ops))
    })
}

// Every live key must be reachable from its home slot without crossing an
// empty slot.
fn probe_chains_intact(t: &ProbeTable<u32>) -> bool {
    let cap = t.capacity();
    t.iter().all(|e| {
        let home = home_slot(e.key(), cap);
        (0..cap)
            .map(|step| (home + step) % cap)
            .take_while(|&i| t.slot_state(i) != Some(SlotState::Empty))
            .any(|i| t.entry_at(i).map(|x| x.key()) == Some(e.key()))
    })
}

// Property: State-machine equivalence against hashbrown::HashMap.
// Invariants exercised across random operation sequences:
// - First insert wins; duplicates report AlreadyPresent and keep the value.
// - Inserts fail with Full only when every slot is live.
// - Erase makes the key absent; absent erases change nothing.
// - Grow doubles capacity, keeps every live entry, clears tombstones.
// - `iter` and the cursor walk both yield exactly the live set in slot order.
// - len parity and live + dead <= capacity after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((cap, pool, ops) in arb_scenario()) {
        let mut sut: ProbeTable<u32> = ProbeTable::with_capacity(cap).unwrap();
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i, v) => {
                    let k = &pool[i];
                    let live_before = sut.len();
                    let full = sut.occupancy().live == sut.capacity();
                    match sut.insert(k, v) {
                        Ok(InsertOutcome::Inserted { slot }) => {
                            prop_assert!(!model.contains_key(k));
                            prop_assert_eq!(sut.cursor(), Some(slot));
                            model.insert(k.clone(), v);
                        }
                        Ok(InsertOutcome::AlreadyPresent { .. }) => {
                            prop_assert!(model.contains_key(k));
                            prop_assert_eq!(sut.len(), live_before);
                        }
                        Err(TableError::Full { capacity }) => {
                            prop_assert!(full);
                            prop_assert!(!model.contains_key(k));
                            prop_assert_eq!(capacity, sut.capacity());
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {}", other),
                    }
                }
                OpI::Erase(i) => {
                    let k = &pool[i];
                    let dead_before = sut.tombstones();
                    let erased = sut.erase(k);
                    prop_assert_eq!(erased, model.remove(k).is_some());
                    if erased {
                        prop_assert_eq!(sut.tombstones(), dead_before + 1);
                    } else {
                        prop_assert_eq!(sut.tombstones(), dead_before);
                    }
                    prop_assert!(sut.get(k).is_none());
                }
                OpI::Search(i) => {
                    let k = &pool[i];
                    let found = sut.search(k).map(|e| (e.key().to_string(), e.value()));
                    prop_assert_eq!(found.as_ref().map(|(_, v)| *v), model.get(k).copied());
                    if let Some((key, _)) = found {
                        prop_assert_eq!(&key, k);
                        let c = sut.cursor().unwrap();
                        prop_assert_eq!(sut.slot_state(c), Some(SlotState::Live));
                    }
                }
                OpI::Get(s) => {
                    prop_assert_eq!(sut.get(&s), model.get(&s).copied());
                    prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
                }
                OpI::Grow => {
                    // Keep capacities small enough for the walk checks.
                    if sut.capacity() < 64 {
                        let old = sut.capacity();
                        let r = sut.grow().unwrap();
                        prop_assert_eq!(r.new_capacity, old * 2);
                        prop_assert_eq!(r.rehashed, model.len());
                        prop_assert_eq!(sut.tombstones(), 0);
                        prop_assert_eq!(sut.cursor(), None);
                        for (k, v) in &model {
                            prop_assert_eq!(sut.get(k), Some(*v));
                        }
                    }
                }
                OpI::Iterate => {
                    let s_keys: BTreeSet<_> = sut.iter().map(|e| e.key().to_string()).collect();
                    let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                    prop_assert_eq!(s_keys, m_keys);
                }
                OpI::Walk => {
                    let mut walked = Vec::new();
                    let mut next = sut.first().map(|e| (e.key().to_string(), e.value()));
                    while let Some(kv) = next {
                        walked.push((sut.cursor().unwrap(), kv));
                        next = sut.next_entry().map(|e| (e.key().to_string(), e.value()));
                    }
                    prop_assert!(walked.windows(2).all(|w| w[0].0 < w[1].0));
                    let via_iter: Vec<_> = sut.iter().map(|e| (e.key().to_string(), e.value())).collect();
                    let via_walk: Vec<_> = walked.into_iter().map(|(_, kv)| kv).collect();
                    prop_assert_eq!(via_walk, via_iter);
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(sut.len() + sut.tombstones() <= sut.capacity());
            prop_assert!(probe_chains_intact(&sut));
        }
    }
}

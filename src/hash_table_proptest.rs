#![cfg(test)]

// Property tests for the hash engine and its linked overlay, kept inside the
// crate so they can check table and link invariants after every step.

use crate::config::{LinkOrder, TableConfig};
use crate::hash_map::HashMap;
use crate::linked_hash_map::LinkedHashMap;
use crate::traits::Map;
use proptest::prelude::*;
use std::collections::HashMap as StdHashMap;
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations so shrinking moves toward earlier keys and shorter
// op lists.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    PutFirst(usize, i32),
    Remove(usize),
    Get(usize),
    Touch(usize),
    PollFirst,
    PollLast,
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=10).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::PutFirst(i, v)),
            3 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            2 => idx.clone().prop_map(Op::Touch),
            1 => Just(Op::PollFirst),
            1 => Just(Op::PollLast),
            1 => Just(Op::Clear),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Every key lands in one bucket.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

fn run_unordered<S: BuildHasher>(
    mut sut: HashMap<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: StdHashMap<String, i32> = StdHashMap::new();
    for op in ops {
        let before = sut.mod_count();
        match op {
            Op::Insert(i, v) | Op::PutFirst(i, v) => {
                let k = pool[i].clone();
                let fresh = !model.contains_key(&k);
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
                prop_assert_eq!(sut.mod_count() != before, fresh, "only fresh keys are structural");
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let expected = model.remove(k);
                prop_assert_eq!(sut.remove(k.as_str()), expected);
                if expected.is_none() {
                    prop_assert_eq!(sut.mod_count(), before, "absent removal changes nothing");
                }
            }
            Op::Get(i) | Op::Touch(i) => {
                let k = pool[i].as_str();
                prop_assert_eq!(sut.get(k), model.get(k));
            }
            Op::PollFirst | Op::PollLast => {}
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Iterate => {
                let mut got: Vec<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                let mut want: Vec<_> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
                got.sort();
                want.sort();
                prop_assert_eq!(got, want);
            }
        }
        prop_assert!(sut.mod_count() >= before);
        prop_assert_eq!(sut.len(), model.len());
        sut.assert_invariants();
    }
    Ok(())
}

// Property: HashMap agrees with std's HashMap on every answer; the counter
// moves exactly on structural change; table invariants hold after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_hash_map_matches_model((pool, ops) in arb_scenario()) {
        let config = TableConfig::new(2, 0.75);
        let sut = HashMap::with_config(config).expect("valid config");
        run_unordered(sut, &pool, ops)?;
    }

    #[test]
    fn prop_hash_map_matches_model_with_collisions((pool, ops) in arb_scenario()) {
        run_unordered(HashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}

fn position(model: &[(String, i32)], k: &str) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

fn run_linked(order: LinkOrder, pool: &[String], ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut sut: LinkedHashMap<String, i32> = LinkedHashMap::with_order(order);
    let mut model: Vec<(String, i32)> = Vec::new();
    let access = order == LinkOrder::Access;
    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let old = match position(&model, &k) {
                    Some(p) => {
                        let old = core::mem::replace(&mut model[p].1, v);
                        if access {
                            let e = model.remove(p);
                            model.push(e);
                        }
                        Some(old)
                    }
                    None => {
                        model.push((k.clone(), v));
                        None
                    }
                };
                prop_assert_eq!(sut.insert(k, v), old);
            }
            Op::PutFirst(i, v) => {
                let k = pool[i].clone();
                let old = position(&model, &k).map(|p| model.remove(p).1);
                model.insert(0, (k.clone(), v));
                prop_assert_eq!(sut.put_first(k, v), old);
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let expected = position(&model, k).map(|p| model.remove(p).1);
                prop_assert_eq!(sut.remove(k.as_str()), expected);
            }
            Op::Get(i) => {
                let k = &pool[i];
                let expected = position(&model, k).map(|p| model[p].1);
                prop_assert_eq!(sut.get(k.as_str()).copied(), expected);
            }
            Op::Touch(i) => {
                let k = &pool[i];
                let found = position(&model, k);
                let expected = found.map(|p| model[p].1);
                if let (true, Some(p)) = (access, found) {
                    let e = model.remove(p);
                    model.push(e);
                }
                prop_assert_eq!(sut.get_touch(k.as_str()).copied(), expected);
            }
            Op::PollFirst => {
                let expected = (!model.is_empty()).then(|| model.remove(0));
                prop_assert_eq!(sut.poll_first_entry(), expected);
            }
            Op::PollLast => {
                prop_assert_eq!(sut.poll_last_entry(), model.pop());
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
            Op::Iterate => {
                let back: Vec<_> = sut.reversed().iter().map(|(k, v)| (k.clone(), *v)).collect();
                let want: Vec<_> = model.iter().rev().cloned().collect();
                prop_assert_eq!(back, want);
            }
        }
        let got: Vec<_> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&got, &model);
        sut.assert_links();
    }
    Ok(())
}

// Property: LinkedHashMap iterates exactly like a Vec model of the link order,
// in both insertion and access order, forwards and reversed.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_linked_insertion_order((pool, ops) in arb_scenario()) {
        run_linked(LinkOrder::Insertion, &pool, ops)?;
    }

    #[test]
    fn prop_linked_access_order((pool, ops) in arb_scenario()) {
        run_linked(LinkOrder::Access, &pool, ops)?;
    }

    // Property: an LRU bound keeps the newest `max` keys and evicts from the head.
    #[test]
    fn prop_lru_keeps_most_recent(keys in proptest::collection::vec(0u8..16, 1..100), max in 1usize..6) {
        let mut sut: LinkedHashMap<u8, ()> = LinkedHashMap::lru(max);
        let mut model: Vec<u8> = Vec::new();
        for k in keys {
            if let Some(p) = model.iter().position(|&m| m == k) {
                model.remove(p);
            }
            model.push(k);
            if model.len() > max {
                model.remove(0);
            }
            sut.insert(k, ());
            prop_assert_eq!(sut.keys().copied().collect::<Vec<_>>(), model.clone());
            sut.assert_links();
        }
    }
}

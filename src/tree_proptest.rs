#![cfg(test)]

// Property tests for the red-black engine through TreeMap, checked against
// std's BTreeMap with the tree invariants asserted after every step.

use crate::comparator::{Natural, Reverse};
use crate::traits::Direction;
use crate::tree_map::TreeMap;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included};

#[derive(Clone, Debug)]
enum Op {
    Insert(i16, u8),
    Remove(i16),
    PollFirst,
    PollLast,
    Navigate(i16),
    Window(i16, i16),
    CursorRemoveEvery(usize),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    // Narrow key range so removals and navigation hit live keys often.
    let key = -40i16..40;
    let op = prop_oneof![
        8 => (key.clone(), any::<u8>()).prop_map(|(k, v)| Op::Insert(k, v)),
        4 => key.clone().prop_map(Op::Remove),
        1 => Just(Op::PollFirst),
        1 => Just(Op::PollLast),
        2 => key.clone().prop_map(Op::Navigate),
        2 => (key.clone(), key.clone()).prop_map(|(a, b)| Op::Window(a.min(b), a.max(b))),
        1 => (2usize..5).prop_map(Op::CursorRemoveEvery),
    ];
    proptest::collection::vec(op, 1..120)
}

fn pairs<'a>(it: impl Iterator<Item = (&'a i16, &'a u8)>) -> Vec<(i16, u8)> {
    it.map(|(k, v)| (*k, *v)).collect()
}

// Property: TreeMap answers like BTreeMap for point, navigation and window
// queries; removing through a cursor keeps the rest of the traversal intact;
// red-black invariants hold after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_tree_map_matches_btree(ops in arb_ops()) {
        let mut sut: TreeMap<i16, u8> = TreeMap::new();
        let mut model: BTreeMap<i16, u8> = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => prop_assert_eq!(sut.insert(k, v), model.insert(k, v)),
                Op::Remove(k) => {
                    let before = sut.mod_count();
                    let expected = model.remove(&k);
                    prop_assert_eq!(sut.remove(&k), expected);
                    if expected.is_none() {
                        prop_assert_eq!(sut.mod_count(), before);
                    }
                }
                Op::PollFirst => prop_assert_eq!(sut.poll_first_entry(), model.pop_first()),
                Op::PollLast => prop_assert_eq!(sut.poll_last_entry(), model.pop_last()),
                Op::Navigate(k) => {
                    prop_assert_eq!(sut.lower_key(&k), model.range(..k).next_back().map(|(k, _)| k));
                    prop_assert_eq!(sut.floor_key(&k), model.range(..=k).next_back().map(|(k, _)| k));
                    prop_assert_eq!(sut.ceiling_key(&k), model.range(k..).next().map(|(k, _)| k));
                    prop_assert_eq!(
                        sut.higher_key(&k),
                        model.range((Excluded(k), std::ops::Bound::Unbounded)).next().map(|(k, _)| k)
                    );
                }
                Op::Window(lo, hi) => {
                    let sub = sut.sub_map(lo, true, hi, false).expect("ordered bounds");
                    let want = pairs(model.range((Included(lo), Excluded(hi))));
                    prop_assert_eq!(pairs(sub.iter()), want.clone());
                    prop_assert_eq!(sub.len(), want.len());
                    let back: Vec<_> = want.iter().rev().cloned().collect();
                    prop_assert_eq!(pairs(sub.iter_in(Direction::Backward)), back);
                    prop_assert_eq!(sub.first_entry().map(|(k, _)| *k), want.first().map(|e| e.0));
                    prop_assert_eq!(sub.last_entry().map(|(k, _)| *k), want.last().map(|e| e.0));
                }
                Op::CursorRemoveEvery(n) => {
                    let mut cursor = sut.cursor(Direction::Forward);
                    let mut i = 0;
                    while cursor.has_next() {
                        let k = *cursor.next(&sut).expect("no foreign mutation").0;
                        if i % n == 0 {
                            cursor.remove(&mut sut).expect("remove after next");
                            model.remove(&k);
                        }
                        i += 1;
                    }
                }
            }
            prop_assert_eq!(pairs(sut.iter()), pairs(model.iter()));
            prop_assert_eq!(sut.len(), model.len());
            sut.assert_invariants();
        }
    }

    // Property: a reversed comparator yields exactly the reverse order, and
    // `descending_map` of a natural map matches it.
    #[test]
    fn prop_reverse_comparator_mirrors_descending(keys in proptest::collection::vec(any::<i32>(), 0..60)) {
        let natural: TreeMap<i32, ()> = keys.iter().map(|&k| (k, ())).collect();
        let mut reversed = TreeMap::with_comparator(Reverse(Natural));
        reversed.extend(keys.iter().map(|&k| (k, ())));
        reversed.assert_invariants();
        let a: Vec<_> = reversed.keys().copied().collect();
        let b: Vec<_> = natural.iter_in(Direction::Backward).map(|(k, _)| *k).collect();
        prop_assert_eq!(a, b);
    }

    // Property: building from sorted input gives the same map as inserting.
    #[test]
    fn prop_from_sorted_matches_inserts(keys in proptest::collection::btree_set(any::<u16>(), 0..200)) {
        let built = TreeMap::from_sorted(keys.iter().map(|&k| (k, k)), Natural).expect("sorted input");
        built.assert_invariants();
        let inserted: TreeMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        prop_assert!(built == inserted);
    }
}

use runtime_collections::prelude::*;
use runtime_collections::{CollectionError, LinkOrder, LinkedHashMap, LinkedHashSet};

fn keys<V>(m: &LinkedHashMap<&'static str, V>) -> Vec<&'static str> {
    m.keys().copied().collect()
}

#[test]
fn iterates_in_first_insertion_order() {
    let words = ["pear", "apple", "fig", "kiwi", "date", "lime", "plum"];
    let mut m = LinkedHashMap::new();
    for (i, w) in words.iter().enumerate() {
        m.insert(*w, i);
    }
    // Overwrites keep the original position.
    m.insert("pear", 100);
    m.insert("fig", 100);
    assert_eq!(keys(&m), words);
    assert_eq!(m.first_entry(), Some((&"pear", &100)));
    assert_eq!(m.last_entry(), Some((&"plum", &6)));
}

#[test]
fn access_order_moves_touched_entries_last() {
    let mut m = LinkedHashMap::with_order(LinkOrder::Access);
    for k in ["a", "b", "c"] {
        m.insert(k, ());
    }
    m.get_touch("a");
    assert_eq!(keys(&m), ["b", "c", "a"]);
    // Plain get never reorders.
    m.get("b");
    assert_eq!(keys(&m), ["b", "c", "a"]);
    m.insert("b", ());
    assert_eq!(keys(&m), ["c", "a", "b"]);
}

#[test]
fn access_reorder_is_structural() {
    let mut m = LinkedHashMap::with_order(LinkOrder::Access);
    m.insert(1, ());
    m.insert(2, ());
    let mods = m.mod_count();
    m.get_touch(&2);
    assert_eq!(m.mod_count(), mods, "touching the tail moves nothing");
    m.get_touch(&1);
    assert!(m.mod_count() > mods);
}

#[test]
fn lru_evicts_least_recently_used() {
    let mut cache = LinkedHashMap::lru(2);
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.get_touch("a");
    cache.insert("c", 3);
    assert_eq!(keys(&cache), ["a", "c"]);
    assert!(!cache.contains_key("b"));
}

#[test]
fn put_first_and_last_move_existing_keys() {
    let mut m: LinkedHashMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    assert_eq!(m.put_first("c", 30), Some(3));
    assert_eq!(keys(&m), ["c", "a", "b"]);
    assert_eq!(m.put_last("c", 31), Some(30));
    assert_eq!(keys(&m), ["a", "b", "c"]);
    assert_eq!(m.put_first("z", 0), None);
    assert_eq!(keys(&m), ["z", "a", "b", "c"]);
}

#[test]
fn reversed_of_reversed_is_the_map() {
    let mut m: LinkedHashMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let forward: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
    {
        let twice = m.reversed().reversed();
        let again: Vec<_> = twice.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(again, forward);
        assert_eq!(twice.len(), m.len());
    }
    {
        let r = m.reversed();
        let back: Vec<_> = r.iter().map(|(k, _)| *k).collect();
        assert_eq!(back, ["c", "b", "a"]);
        assert_eq!(r.first_entry(), Some((&"c", &3)));
    }
    // Mutations through a reversed view swap ends.
    let mut r = m.reversed_mut();
    r.put_first("d", 4).unwrap();
    assert_eq!(r.poll_last_entry(), Some(("a", 1)));
    let rr = r.reversed();
    assert_eq!(rr.poll_last_entry(), Some(("d", 4)));
    assert_eq!(keys(&m), ["b", "c"]);
}

#[test]
fn sequenced_set_ends() {
    let mut s: LinkedHashSet<i32> = LinkedHashSet::new();
    assert_eq!(s.get_first(), Err(CollectionError::NoSuchElement));
    assert_eq!(s.remove_last(), Err(CollectionError::NoSuchElement));
    s.insert(2);
    s.add_first(1);
    s.add_last(3);
    s.add_first(3);
    assert_eq!(s.iter().copied().collect::<Vec<_>>(), [3, 1, 2]);
    assert_eq!(s.reversed().iter().copied().collect::<Vec<_>>(), [2, 1, 3]);
    assert_eq!(s.poll_last(), Some(2));
    assert_eq!(s.remove_first(), Ok(3));
    assert_eq!(s.get_last(), Ok(&1));
}

#[test]
fn iter_mut_follows_link_order() {
    let mut m: LinkedHashMap<u32, u32> = (0..64).rev().map(|k| (k, 0)).collect();
    for (i, (_, v)) in m.iter_mut().enumerate() {
        *v = i as u32;
    }
    let got: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
    let want: Vec<_> = (0..64).rev().zip(0..64).collect();
    assert_eq!(got, want);
}

#[test]
fn owned_iteration_keeps_order() {
    let m: LinkedHashMap<&str, u8> = [("x", 1), ("y", 2)].into_iter().collect();
    let v: Vec<_> = m.into_iter().collect();
    assert_eq!(v, [("x", 1), ("y", 2)]);
}

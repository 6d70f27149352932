use runtime_collections::prelude::*;
use runtime_collections::{CollectionError, HashMap, HashSet, TableConfig, TreeMap};

#[test]
fn put_get_round_trip_with_none_values() {
    let mut m: HashMap<&str, Option<i32>> = HashMap::new();
    assert_eq!(m.insert("a", Some(1)), None);
    assert_eq!(m.insert("nothing", None), None);
    assert_eq!(m.get("a"), Some(&Some(1)));
    // A stored None is an entry, not an absence.
    assert_eq!(m.get("nothing"), Some(&None));
    assert!(m.contains_key("nothing"));
    assert_eq!(m.get("missing"), None);
    assert_eq!(m.len(), 2);
}

#[test]
fn optional_keys_hold_a_null_key() {
    let mut m: HashMap<Option<u8>, &str> = HashMap::new();
    m.insert(None, "null");
    m.insert(Some(0), "zero");
    assert_eq!(m.get(&None), Some(&"null"));
    assert_eq!(m.insert(None, "again"), Some("null"));
    assert_eq!(m.len(), 2);
}

#[test]
fn absent_removal_is_idempotent() {
    let mut m: HashMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
    let (len, mods) = (m.len(), m.mod_count());
    assert_eq!(m.remove(&42), None);
    assert_eq!(m.remove(&42), None);
    assert_eq!(m.len(), len);
    assert_eq!(m.mod_count(), mods);
}

#[test]
fn size_tracks_live_keys() {
    let mut m = HashMap::new();
    for i in 0..50u32 {
        m.insert(i % 20, i);
    }
    assert_eq!(m.len(), 20);
    for i in 0..10u32 {
        m.remove(&i);
    }
    assert_eq!(m.len(), 10);
    m.clear();
    assert!(m.is_empty());
}

#[test]
fn thousand_keys_from_capacity_eight() {
    let mut m = HashMap::with_capacity(8);
    assert!(m.capacity() <= 8);
    for k in 0..1000u32 {
        m.insert(k, k * 2);
    }
    assert_eq!(m.len(), 1000);
    for k in 0..1000u32 {
        assert_eq!(m.get(&k), Some(&(k * 2)));
    }
    assert!(m.capacity().is_power_of_two());
    assert!(m.len() as f32 <= m.capacity() as f32 * m.load_factor());
}

#[test]
fn invalid_load_factor_is_rejected() {
    for lf in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let r: Result<HashMap<u8, u8>, _> = HashMap::with_config(TableConfig::new(16, lf));
        assert!(
            matches!(r, Err(CollectionError::IllegalArgument { .. })),
            "load factor {lf} accepted"
        );
    }
}

#[test]
fn overwrite_is_not_structural() {
    let mut m: HashMap<&str, i32> = HashMap::new();
    m.insert("k", 1);
    let mods = m.mod_count();
    assert_eq!(m.insert("k", 2), Some(1));
    *m.get_mut("k").unwrap() += 1;
    assert_eq!(m.mod_count(), mods);
    assert_eq!(m.get("k"), Some(&3));
}

#[test]
fn copy_from_another_map() {
    let t: TreeMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
    let h: HashMap<i32, &str> = HashMap::from_map(&t);
    assert_eq!(h, t);
    assert_eq!(h.len(), 2);
}

#[test]
fn contract_traits_drive_any_map() {
    fn fill<M: MapMut<Key = u8, Value = u8>>(m: &mut M) {
        for k in 0..5 {
            m.put(k, k).unwrap();
        }
        m.remove(&0).unwrap();
    }
    let mut h: HashMap<u8, u8> = HashMap::new();
    let mut t: TreeMap<u8, u8> = TreeMap::new();
    fill(&mut h);
    fill(&mut t);
    assert_eq!(h, t);
    assert!(Map::contains_value(&h, &4));
    assert_eq!(
        MapMut::remove_matching(&mut h, &mut |_, v| *v > 2).unwrap().map(|(_, v)| v > 2),
        Some(true)
    );
    assert_eq!(h.len(), 3);
}

#[test]
fn sets_keep_first_element() {
    let mut s: HashSet<String> = HashSet::new();
    assert!(s.insert("a".to_string()));
    assert!(!s.insert("a".to_string()));
    assert!(s.contains("a"));
    assert_eq!(s.take("a"), Some("a".to_string()));
    assert!(!s.remove("a"));
    assert!(s.is_empty());
}

#[test]
fn retain_and_values_mut() {
    let mut m: HashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
    m.retain(|k, _| k % 2 == 0);
    for v in m.values_mut() {
        *v += 1;
    }
    assert_eq!(m.len(), 50);
    assert!(m.iter().all(|(k, v)| *v == k + 1));
}

#[test]
fn mutable_iteration_matches_shared_order() {
    let mut m: HashMap<String, usize> = (0..200).map(|i| (format!("k{i}"), i)).collect();
    // Freed slots get reused, so arena order drifts from bucket order.
    for i in (0..200).step_by(3) {
        m.remove(format!("k{i}").as_str());
    }
    for i in 200..260 {
        m.insert(format!("k{i}"), i);
    }
    let shared: Vec<usize> = m.values().copied().collect();
    let mutable: Vec<usize> = m.values_mut().map(|v| *v).collect();
    assert_eq!(shared, mutable);
    let keys: Vec<String> = m.keys().cloned().collect();
    let keys_mut: Vec<String> = m.iter_mut().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, keys_mut);
}

//! HashMap: the unordered map over the bucket-chain engine.
//!
//! Owns the hasher and hashes each key exactly once, on the way in; the
//! engine keeps that hash with the entry. Lookups and mutations run inside
//! the reentrancy guard since they call user `Hash`/`Eq`.

use core::borrow::Borrow;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;

use hashbrown::hash_map::DefaultHashBuilder;

use crate::config::TableConfig;
use crate::contract;
use crate::cursor::{Cursor, InstanceId, Traverse};
use crate::error::Result;
use crate::hash_table::{self, EntryId, HashTable, Insertion};
use crate::reentrancy::DebugReentrancy;
use crate::traits::{Direction, Map, MapMut};

#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: HashTable<K, V>,
    instance: InstanceId,
    reentrancy: DebugReentrancy,
}

impl<K, V> HashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Buckets for at least `capacity` entries' worth of slots, allocated on
    /// first insert.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Self::with_config_and_hasher(config, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(TableConfig::default(), hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        let mut config = TableConfig::default();
        config.initial_capacity = capacity;
        Self::from_parts(config, hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::new(config),
            instance: InstanceId::fresh(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Allocated bucket count; 0 until the first insertion.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    /// Structural modification counter.
    pub fn mod_count(&self) -> u64 {
        self.table.mod_count()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Mutable access to every value, in no particular order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.table.iter_mut().map(|(_, v)| v)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        self.table.iter_mut()
    }

    /// Keeps only the entries `keep` accepts. Each removal is structural.
    pub fn retain(&mut self, keep: impl FnMut(&K, &mut V) -> bool) {
        self.table.retain(keep);
    }

    /// A fail-fast cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor<EntryId> {
        Cursor::new(self, Direction::Forward)
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find<Q>(&self, q: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        self.table.find(self.make_hash(q), q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(q)?;
        self.table.entry(id).map(|e| &e.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(q)?;
        self.table.entry(id).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(q)?;
        self.table.entry_mut(id).map(|e| &mut e.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// O(n): values are not indexed.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Inserts or overwrites, returning the previous value. Overwriting an
    /// existing key is not a structural modification.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(&key);
        match self.table.insert(hash, key, value) {
            Insertion::Fresh(_) => None,
            Insertion::Replaced(_, old) => Some(old),
        }
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(q);
        self.table.remove(hash, q).map(|(_, k, v)| (k, v))
    }

    /// Makes room for `additional` more entries without intermediate rehashes.
    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Copies every entry of `source` into a map pre-sized to hold them.
    pub fn from_map<M>(source: &M) -> Self
    where
        M: Map<Key = K, Value = V> + ?Sized,
        K: Clone,
        V: Clone,
        S: Default,
    {
        let mut map = Self::from_parts(
            TableConfig::for_len(source.len(), crate::config::DEFAULT_LOAD_FACTOR),
            S::default(),
        );
        for (k, v) in source.iter() {
            map.insert(k.clone(), v.clone());
        }
        map
    }
}

/// Bucket-order iterator over a [`HashMap`].
pub struct Iter<'a, K, V> {
    inner: hash_table::Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`HashMap`].
pub struct IntoIter<K, V> {
    inner: hash_table::IntoEntries<K, V>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.table.into_entries(),
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> Map for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Key = K;
    type Value = V;
    type Iter<'a> = Iter<'a, K, V> where Self: 'a;

    fn len(&self) -> usize {
        self.table.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        HashMap::iter(self)
    }

    fn mod_count(&self) -> u64 {
        self.table.mod_count()
    }
}

impl<K, V, S> MapMut for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.insert(key, value))
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(HashMap::remove(self, key))
    }

    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&K, &V) -> bool,
    ) -> Result<Option<(K, V)>> {
        let hit = self.table.iter().find(|&(_, k, v)| pred(k, v)).map(|(id, _, _)| id);
        Ok(hit.and_then(|id| self.table.remove_id(id)))
    }

    fn clear(&mut self) -> Result<()> {
        HashMap::clear(self);
        Ok(())
    }
}

impl<K, V, S> Traverse for HashMap<K, V, S> {
    type Id = EntryId;
    type Item<'a> = (&'a K, &'a V) where Self: 'a;
    type Owned = (K, V);

    fn instance_id(&self) -> u64 {
        self.instance.get()
    }

    fn traverse_mod_count(&self) -> u64 {
        self.table.mod_count()
    }

    // Unordered: both directions walk bucket order.
    fn first_id(&self, _direction: Direction) -> Option<EntryId> {
        self.table.first_id()
    }

    fn next_id(&self, id: EntryId, _direction: Direction) -> Option<EntryId> {
        self.table.next_id(id)
    }

    fn item(&self, id: EntryId) -> Option<(&K, &V)> {
        self.table.entry(id).map(|e| (&e.key, &e.value))
    }

    fn remove_id(&mut self, id: EntryId) -> Option<(K, V)> {
        self.table.remove_id(id)
    }
}

impl<K, V, S, M> PartialEq<M> for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    M: Map<Key = K, Value = V>,
{
    fn eq(&self, other: &M) -> bool {
        contract::maps_equal(self, other)
    }
}

impl<K: Eq + Hash, V: Eq, S: BuildHasher> Eq for HashMap<K, V, S> {}

impl<K: Hash, V: Hash, S> Hash for HashMap<K, V, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::map_hash_code(self.iter()));
    }
}

impl<K: Debug, V: Debug, S> Debug for HashMap<K, V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Display, V: Display, S> Display for HashMap<K, V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_map(f, self.iter())
    }
}

#[cfg(test)]
impl<K, V, S> HashMap<K, V, S> {
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_key_is_one_entry() {
        let mut m: HashMap<Option<&str>, i32> = HashMap::new();
        assert_eq!(m.insert(None, 1), None);
        assert_eq!(m.insert(None, 2), Some(1));
        assert_eq!(m.insert(Some("a"), 3), None);
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(&None), Some(&2));
    }

    #[test]
    fn null_values_round_trip() {
        let mut m: HashMap<&str, Option<i32>> = HashMap::new();
        m.insert("k", None);
        assert_eq!(m.get("k"), Some(&None));
        assert!(m.contains_key("k"));
        assert!(m.contains_value(&None));
    }

    #[test]
    fn borrowed_lookup() {
        let mut m: HashMap<String, i32> = HashMap::new();
        m.insert("alpha".to_string(), 1);
        assert_eq!(m.get("alpha"), Some(&1));
        *m.get_mut("alpha").unwrap() += 1;
        assert_eq!(m.remove_entry("alpha"), Some(("alpha".to_string(), 2)));
        assert!(m.is_empty());
    }

    #[test]
    fn bad_config_is_rejected() {
        assert!(HashMap::<u8, u8>::with_config(TableConfig::new(4, 0.0)).is_err());
        let m = HashMap::<u8, u8>::with_config(TableConfig::new(4, 0.5)).unwrap();
        assert_eq!(m.load_factor(), 0.5);
    }

    #[test]
    fn lazily_allocates_default_capacity() {
        let mut m = HashMap::new();
        assert_eq!(m.capacity(), 0);
        m.insert(1, 1);
        assert_eq!(m.capacity(), 16);
    }

    #[test]
    fn from_map_presizes() {
        let src: HashMap<u32, u32> = (0..100).map(|i| (i, i)).collect();
        let copy: HashMap<u32, u32> = HashMap::from_map(&src);
        assert_eq!(copy, src);
        assert!(copy.capacity() as f32 * copy.load_factor() >= 100.0);
    }

    #[test]
    fn remove_matching_takes_first_hit() {
        let mut m: HashMap<u32, u32> = (0..10).map(|i| (i, i % 3)).collect();
        let hit = m.remove_matching(&mut |_, v| *v == 2).unwrap();
        let (k, v) = hit.expect("some value is 2");
        assert_eq!(v, 2);
        assert!(!m.contains_key(&k));
        assert_eq!(m.len(), 9);
        assert_eq!(m.remove_matching(&mut |_, v| *v == 7).unwrap(), None);
    }

    #[test]
    fn clone_is_independent() {
        let mut a: HashMap<u8, u8> = [(1, 1)].into_iter().collect();
        let b = a.clone();
        a.insert(2, 2);
        assert_eq!(b.len(), 1);
        assert_ne!(a.instance_id(), b.instance_id());
    }

    #[test]
    fn into_iter_yields_owned_entries() {
        let m: HashMap<String, u8> = [("x".to_string(), 1)].into_iter().collect();
        let all: Vec<(String, u8)> = m.into_iter().collect();
        assert_eq!(all, [("x".to_string(), 1)]);
    }
}

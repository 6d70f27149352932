//! HashSet: membership encoded as the keys of a `HashMap<T, ()>`.

use core::borrow::Borrow;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;

use hashbrown::hash_map::DefaultHashBuilder;

use crate::config::TableConfig;
use crate::contract;
use crate::cursor::{Cursor, Traverse};
use crate::error::Result;
use crate::hash_map::{self, HashMap};
use crate::hash_table::EntryId;
use crate::traits::{Collection, CollectionMut, Direction};

#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    map: HashMap<T, (), S>,
}

impl<T> HashSet<T> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self {
            map: HashMap::with_config(config)?,
        })
    }
}

impl<T> Default for HashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> HashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashMap::with_hasher(hasher),
        }
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self> {
        Ok(Self {
            map: HashMap::with_config_and_hasher(config, hasher)?,
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    pub fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.map.iter(),
        }
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.map.retain(|k, _| keep(k));
    }

    pub fn cursor(&self) -> Cursor<EntryId> {
        Cursor::new(self, Direction::Forward)
    }
}

impl<T, S> HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(q)
    }

    /// The stored element equal to `q`.
    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_key_value(q).map(|(k, _)| k)
    }

    /// Returns `true` if the element was not already present. An equal
    /// element already in the set is kept.
    pub fn insert(&mut self, item: T) -> bool {
        if self.map.contains_key(&item) {
            return false;
        }
        self.map.insert(item, ());
        true
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove_entry(q).is_some()
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.remove_entry(q).map(|(k, _)| k)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Copies every element of `source` into a set pre-sized to hold them.
    pub fn from_collection<C>(source: &C) -> Self
    where
        C: Collection<Item = T> + ?Sized,
        T: Clone,
        S: Default,
    {
        let config = TableConfig::for_len(source.len(), crate::config::DEFAULT_LOAD_FACTOR);
        let mut set = Self {
            map: HashMap::with_capacity_and_hasher(config.initial_capacity, S::default()),
        };
        for item in source.iter() {
            set.insert(item.clone());
        }
        set
    }
}

pub struct Iter<'a, T> {
    inner: hash_map::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

pub struct IntoIter<T> {
    inner: hash_map::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_hasher(S::default());
        set.extend(iter);
        set
    }
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T, S> Collection for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    type Item = T;
    type Iter<'a> = Iter<'a, T> where Self: 'a;

    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, item: &T) -> bool {
        HashSet::contains(self, item)
    }

    fn iter(&self) -> Iter<'_, T> {
        HashSet::iter(self)
    }

    fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }
}

impl<T, S> CollectionMut for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn add(&mut self, item: T) -> Result<bool> {
        Ok(self.insert(item))
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(HashSet::remove(self, item))
    }

    fn clear(&mut self) -> Result<()> {
        HashSet::clear(self);
        Ok(())
    }
}

impl<T, S> Traverse for HashSet<T, S> {
    type Id = EntryId;
    type Item<'a> = &'a T where Self: 'a;
    type Owned = T;

    fn instance_id(&self) -> u64 {
        self.map.instance_id()
    }

    fn traverse_mod_count(&self) -> u64 {
        self.map.traverse_mod_count()
    }

    fn first_id(&self, direction: Direction) -> Option<EntryId> {
        self.map.first_id(direction)
    }

    fn next_id(&self, id: EntryId, direction: Direction) -> Option<EntryId> {
        self.map.next_id(id, direction)
    }

    fn item(&self, id: EntryId) -> Option<&T> {
        self.map.item(id).map(|(k, _)| k)
    }

    fn remove_id(&mut self, id: EntryId) -> Option<T> {
        self.map.remove_id(id).map(|(k, _)| k)
    }
}

impl<T, S, C> PartialEq<C> for HashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
    C: Collection<Item = T>,
{
    fn eq(&self, other: &C) -> bool {
        contract::sets_equal(self, other)
    }
}

impl<T: Eq + Hash, S: BuildHasher> Eq for HashSet<T, S> {}

impl<T: Hash, S> Hash for HashSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::set_hash_code(self.iter()));
    }
}

impl<T: Debug, S> Debug for HashSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Display, S> Display for HashSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_seq(f, self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_change() {
        let mut s = HashSet::new();
        assert!(s.insert("a"));
        assert!(!s.insert("a"));
        assert_eq!(s.len(), 1);
        assert!(s.remove("a"));
        assert!(!s.remove("a"));
    }

    #[test]
    fn duplicate_insert_keeps_mod_count() {
        let mut s: HashSet<u32> = (0..4).collect();
        let mc = s.mod_count();
        s.insert(2);
        assert_eq!(s.mod_count(), mc);
    }

    #[test]
    fn take_returns_stored_element() {
        let mut s: HashSet<String> = ["x".to_string()].into_iter().collect();
        assert_eq!(s.get("x").map(String::as_str), Some("x"));
        assert_eq!(s.take("x"), Some("x".to_string()));
        assert!(s.is_empty());
    }

    #[test]
    fn equal_sets_hash_alike() {
        use std::collections::hash_map::DefaultHasher;
        let a: HashSet<u32> = (0..50).collect();
        let b: HashSet<u32> = (0..50).rev().collect();
        assert_eq!(a, b);
        let h = |s: &HashSet<u32>| {
            let mut h = DefaultHasher::new();
            s.hash(&mut h);
            h.finish()
        };
        assert_eq!(h(&a), h(&b));
    }

    #[test]
    fn retain_and_copy() {
        let mut s: HashSet<u32> = (0..10).collect();
        s.retain(|x| x % 2 == 1);
        let copy: HashSet<u32> = HashSet::from_collection(&s);
        assert_eq!(copy.len(), 5);
        assert_eq!(copy, s);
    }
}

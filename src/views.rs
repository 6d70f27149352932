//! Key, value and entry views over any [`Map`].
//!
//! A view owns nothing but its handle on the map: `KeySet<&M>` reads,
//! `KeySet<&mut M>` (alias [`KeySetMut`]) also removes through to the map.
//! Every answer comes from the map itself, so there is exactly one source of
//! truth. Adding through a view is refused because a key alone (or a value
//! alone) is not an entry.
//!
//! Views over a sequenced map are sequenced themselves and can be wrapped in
//! [`Reversed`].

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};

use crate::contract;
use crate::error::{CollectionError, Result};
use crate::reversed::Reversed;
use crate::traits::{
    Collection, CollectionMut, Direction, Map, MapMut, SequencedCollection,
    SequencedCollectionMut, SequencedMap, SequencedMapMut,
};

/// View constructors for every map.
pub trait MapViews: Map {
    fn key_set(&self) -> KeySet<&Self> {
        KeySet { map: self }
    }

    fn key_set_mut(&mut self) -> KeySet<&mut Self> {
        KeySet { map: self }
    }

    fn values_view(&self) -> Values<&Self> {
        Values { map: self }
    }

    fn values_view_mut(&mut self) -> Values<&mut Self> {
        Values { map: self }
    }

    fn entry_set(&self) -> EntrySet<&Self> {
        EntrySet { map: self }
    }

    fn entry_set_mut(&mut self) -> EntrySet<&mut Self> {
        EntrySet { map: self }
    }
}

impl<M: Map + ?Sized> MapViews for M {}

pub type KeySetMut<'a, M> = KeySet<&'a mut M>;
pub type ValuesMut<'a, M> = Values<&'a mut M>;
pub type EntrySetMut<'a, M> = EntrySet<&'a mut M>;

// ---- keys ----

pub struct KeySet<M> {
    map: M,
}

/// Projects the keys out of an entry iterator.
pub struct Keys<I>(I);

impl<'a, K: 'a, V: 'a, I: Iterator<Item = (&'a K, &'a V)>> Iterator for Keys<I> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.0.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<M: Map> KeySet<M> {
    pub fn map(&self) -> &M {
        &self.map
    }

    /// The view borrows the map for the whole walk, so `f` cannot change it.
    pub fn for_each(&self, f: impl FnMut(&M::Key)) {
        self.iter().for_each(f)
    }

    pub fn reversed(self) -> Reversed<Self>
    where
        M: SequencedMap,
    {
        Reversed::new(self)
    }
}

impl<M: Map> Collection for KeySet<M> {
    type Item = M::Key;
    type Iter<'a> = Keys<M::Iter<'a>> where Self: 'a;

    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, key: &M::Key) -> bool {
        self.map.contains_key(key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        Keys(self.map.iter())
    }

    fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }
}

impl<M: MapMut> CollectionMut for KeySet<M> {
    fn add(&mut self, _key: M::Key) -> Result<bool> {
        Err(CollectionError::unsupported("add through a key view"))
    }

    fn remove(&mut self, key: &M::Key) -> Result<bool> {
        Ok(self.map.remove(key)?.is_some())
    }

    fn clear(&mut self) -> Result<()> {
        self.map.clear()
    }
}

impl<M: SequencedMap> SequencedCollection for KeySet<M> {
    fn iter_in(&self, direction: Direction) -> Self::Iter<'_> {
        Keys(self.map.entries_in(direction))
    }
}

impl<M: SequencedMapMut> SequencedCollectionMut for KeySet<M> {
    fn add_first(&mut self, _key: M::Key) -> Result<()> {
        Err(CollectionError::unsupported("add_first through a key view"))
    }

    fn add_last(&mut self, _key: M::Key) -> Result<()> {
        Err(CollectionError::unsupported("add_last through a key view"))
    }

    fn poll_first(&mut self) -> Option<M::Key> {
        self.map.poll_first_entry().map(|(k, _)| k)
    }

    fn poll_last(&mut self) -> Option<M::Key> {
        self.map.poll_last_entry().map(|(k, _)| k)
    }
}

impl<M: Map, C: Collection<Item = M::Key>> PartialEq<C> for KeySet<M> {
    fn eq(&self, other: &C) -> bool {
        contract::sets_equal(self, other)
    }
}

impl<M: Map> Hash for KeySet<M>
where
    M::Key: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::set_hash_code(self.iter()));
    }
}

impl<M: Map> Debug for KeySet<M>
where
    M::Key: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<M: Map> Display for KeySet<M>
where
    M::Key: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_seq(f, self.iter())
    }
}

// ---- values ----

pub struct Values<M> {
    map: M,
}

pub struct ValueIter<I>(I);

impl<'a, K: 'a, V: 'a, I: Iterator<Item = (&'a K, &'a V)>> Iterator for ValueIter<I> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.0.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<M: Map> Values<M> {
    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn for_each(&self, f: impl FnMut(&M::Value)) {
        ValueIter(self.map.iter()).for_each(f)
    }

    pub fn reversed(self) -> Reversed<Self>
    where
        M: SequencedMap,
    {
        Reversed::new(self)
    }
}

impl<M: Map> Collection for Values<M>
where
    M::Value: PartialEq,
{
    type Item = M::Value;
    type Iter<'a> = ValueIter<M::Iter<'a>> where Self: 'a;

    fn len(&self) -> usize {
        self.map.len()
    }

    /// Linear scan.
    fn contains(&self, value: &M::Value) -> bool {
        self.map.contains_value(value)
    }

    fn iter(&self) -> Self::Iter<'_> {
        ValueIter(self.map.iter())
    }

    fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }
}

impl<M: MapMut> CollectionMut for Values<M>
where
    M::Value: PartialEq,
{
    fn add(&mut self, _value: M::Value) -> Result<bool> {
        Err(CollectionError::unsupported("add through a value view"))
    }

    /// Removes the first entry, in iteration order, holding an equal value.
    fn remove(&mut self, value: &M::Value) -> Result<bool> {
        Ok(self
            .map
            .remove_matching(&mut |_, v| v == value)?
            .is_some())
    }

    fn clear(&mut self) -> Result<()> {
        self.map.clear()
    }
}

impl<M: SequencedMap> SequencedCollection for Values<M>
where
    M::Value: PartialEq,
{
    fn iter_in(&self, direction: Direction) -> Self::Iter<'_> {
        ValueIter(self.map.entries_in(direction))
    }
}

impl<M: SequencedMapMut> SequencedCollectionMut for Values<M>
where
    M::Value: PartialEq,
{
    fn add_first(&mut self, _value: M::Value) -> Result<()> {
        Err(CollectionError::unsupported("add_first through a value view"))
    }

    fn add_last(&mut self, _value: M::Value) -> Result<()> {
        Err(CollectionError::unsupported("add_last through a value view"))
    }

    fn poll_first(&mut self) -> Option<M::Value> {
        self.map.poll_first_entry().map(|(_, v)| v)
    }

    fn poll_last(&mut self) -> Option<M::Value> {
        self.map.poll_last_entry().map(|(_, v)| v)
    }
}

impl<M: Map> Debug for Values<M>
where
    M::Value: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(ValueIter(self.map.iter())).finish()
    }
}

impl<M: Map> Display for Values<M>
where
    M::Value: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_seq(f, ValueIter(self.map.iter()))
    }
}

// ---- entries ----

/// The map's entries as a set of `(key, value)` pairs.
///
/// Entries are borrowed pairs rather than stored tuples, so this view has
/// its own methods instead of the [`Collection`] trait.
pub struct EntrySet<M> {
    map: M,
}

impl<M: Map> EntrySet<M> {
    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// True if `key` is present and maps to `value`.
    pub fn contains(&self, key: &M::Key, value: &M::Value) -> bool
    where
        M::Value: PartialEq,
    {
        self.map.get(key) == Some(value)
    }

    pub fn iter(&self) -> M::Iter<'_> {
        self.map.iter()
    }

    pub fn iter_in(&self, direction: Direction) -> M::Iter<'_>
    where
        M: SequencedMap,
    {
        self.map.entries_in(direction)
    }

    pub fn for_each(&self, mut f: impl FnMut(&M::Key, &M::Value)) {
        self.map.iter().for_each(|(k, v)| f(k, v))
    }

    pub fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }
}

impl<M: MapMut> EntrySet<M> {
    pub fn add(&mut self, _key: M::Key, _value: M::Value) -> Result<bool> {
        Err(CollectionError::unsupported("add through an entry view"))
    }

    /// Removes `key` only while it still maps to `value`.
    pub fn remove(&mut self, key: &M::Key, value: &M::Value) -> Result<bool>
    where
        M::Value: PartialEq,
    {
        if !self.contains(key, value) {
            return Ok(false);
        }
        Ok(self.map.remove(key)?.is_some())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.map.clear()
    }
}

impl<M: SequencedMapMut> EntrySet<M> {
    pub fn poll_first(&mut self) -> Option<(M::Key, M::Value)> {
        self.map.poll_first_entry()
    }

    pub fn poll_last(&mut self) -> Option<(M::Key, M::Value)> {
        self.map.poll_last_entry()
    }
}

impl<M: Map, N: Map<Key = M::Key, Value = M::Value>> PartialEq<EntrySet<N>> for EntrySet<M>
where
    M::Value: PartialEq,
{
    fn eq(&self, other: &EntrySet<N>) -> bool {
        contract::maps_equal(&self.map, &other.map)
    }
}

impl<M: Map> Hash for EntrySet<M>
where
    M::Key: Hash,
    M::Value: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::map_hash_code(self.map.iter()));
    }
}

impl<M: Map> Debug for EntrySet<M>
where
    M::Key: Debug,
    M::Value: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.map.iter()).finish()
    }
}

impl<M: Map> Display for EntrySet<M>
where
    M::Key: Display,
    M::Value: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (k, v)) in self.map.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HashMap, LinkedHashMap, TreeMap, TreeSet};

    fn linked() -> LinkedHashMap<&'static str, i32> {
        [("a", 1), ("b", 2), ("c", 1)].into_iter().collect()
    }

    #[test]
    fn key_view_reads_through() {
        let m = linked();
        let keys = m.key_set();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"b"));
        assert_eq!(keys.iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        let sorted: TreeSet<&str> = ["c", "b", "a"].into_iter().collect();
        assert!(keys == sorted);
        assert_eq!(keys.to_string(), "[a, b, c]");
    }

    #[test]
    fn removal_through_views_hits_the_map() {
        let mut m = linked();
        assert_eq!(m.key_set_mut().remove(&"b"), Ok(true));
        assert_eq!(m.key_set_mut().remove(&"zz"), Ok(false));
        assert_eq!(m.values_view_mut().remove(&1), Ok(true));
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["c"]);
        m.values_view_mut().clear().unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn adding_through_views_is_refused() {
        let mut m = linked();
        assert!(matches!(
            m.key_set_mut().add("z"),
            Err(CollectionError::Unsupported { .. })
        ));
        assert!(m.values_view_mut().add(9).is_err());
        assert!(m.entry_set_mut().add("z", 9).is_err());
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn entry_removal_needs_matching_value() {
        let mut m: HashMap<&str, i32> = [("a", 1)].into_iter().collect();
        assert_eq!(m.entry_set_mut().remove(&"a", &2), Ok(false));
        assert_eq!(m.len(), 1);
        assert_eq!(m.entry_set_mut().remove(&"a", &1), Ok(true));
        assert!(m.is_empty());
    }

    #[test]
    fn sequenced_views_reverse() {
        let m = linked();
        let back: Vec<_> = m.key_set().reversed().iter().copied().collect();
        assert_eq!(back, ["c", "b", "a"]);
        assert_eq!(m.values_view().reversed().get_first(), Ok(&1));

        let mut t: TreeMap<i32, i32> = (0..5).map(|i| (i, i * 10)).collect();
        let mut rk = t.key_set_mut().reversed();
        assert_eq!(rk.poll_first(), Some(4));
        assert_eq!(t.last_key(), Ok(&3));
    }

    #[test]
    fn for_each_visits_in_order() {
        let m = linked();
        let mut seen = Vec::new();
        m.entry_set().for_each(|k, v| seen.push((*k, *v)));
        assert_eq!(seen, [("a", 1), ("b", 2), ("c", 1)]);
        let mut total = 0;
        m.values_view().for_each(|v| total += v);
        assert_eq!(total, 4);
    }
}

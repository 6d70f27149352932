//! LinkedHashMap: the hash engine plus a doubly-linked order chain.
//!
//! Every table entry carries `before`/`after` ids, so the order chain lives
//! inside the same arena slots the bucket chains use and splicing is O(1).
//! In [`LinkOrder::Insertion`] an overwrite keeps the entry where it is; in
//! [`LinkOrder::Access`] an overwrite, [`get_touch`](LinkedHashMap::get_touch)
//! or [`get_mut`](LinkedHashMap::get_mut) moves it to the tail, and each move
//! counts as a structural change. With a `max_len` bound the eldest entry is
//! evicted after an insertion overflows it, which in access order gives an
//! LRU cache.
//!
//! The reentrancy guard covers hashing and probing only; relinking never calls
//! into user code.

use core::borrow::Borrow;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;

use hashbrown::hash_map::DefaultHashBuilder;
use log::trace;
use slotmap::SecondaryMap;

use crate::config::{LinkOrder, TableConfig};
use crate::contract;
use crate::cursor::{Cursor, InstanceId, Traverse};
use crate::error::Result;
use crate::hash_table::{EntryId, HashTable};
use crate::reentrancy::DebugReentrancy;
use crate::reversed::Reversed;
use crate::traits::{Direction, Map, MapMut, SequencedMap, SequencedMapMut};

/// A value threaded into the order chain.
#[derive(Debug, Clone)]
pub(crate) struct Linked<V> {
    value: V,
    before: Option<EntryId>,
    after: Option<EntryId>,
}

impl<V> Linked<V> {
    fn new(value: V) -> Self {
        Linked {
            value,
            before: None,
            after: None,
        }
    }

    #[inline]
    fn step(&self, direction: Direction) -> Option<EntryId> {
        match direction {
            Direction::Forward => self.after,
            Direction::Backward => self.before,
        }
    }
}

#[derive(Clone)]
pub struct LinkedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: HashTable<K, Linked<V>>,
    head: Option<EntryId>,
    tail: Option<EntryId>,
    order: LinkOrder,
    max_len: Option<usize>,
    instance: InstanceId,
    reentrancy: DebugReentrancy,
}

impl<K, V> LinkedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(
            TableConfig::new(capacity, crate::config::DEFAULT_LOAD_FACTOR),
            LinkOrder::Insertion,
            DefaultHashBuilder::default(),
        )
    }

    pub fn with_order(order: LinkOrder) -> Self {
        Self::from_parts(TableConfig::default(), order, DefaultHashBuilder::default())
    }

    pub fn with_config(config: TableConfig, order: LinkOrder) -> Result<Self> {
        Self::with_config_and_hasher(config, order, DefaultHashBuilder::default())
    }

    /// An access-ordered map that keeps at most `max_len` entries, evicting
    /// the least recently used one.
    pub fn lru(max_len: usize) -> Self {
        Self::with_order(LinkOrder::Access).with_max_len(max_len)
    }
}

impl<K, V> Default for LinkedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(TableConfig::default(), LinkOrder::Insertion, hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, order: LinkOrder, hasher: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config, order, hasher))
    }

    fn from_parts(config: TableConfig, order: LinkOrder, hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::new(config),
            head: None,
            tail: None,
            order,
            max_len: None,
            instance: InstanceId::fresh(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Bounds the map to `max_len` entries; extra entries are evicted from
    /// the head after each insertion.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.max_len = max_len;
        self.evict_overflow();
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    pub fn order(&self) -> LinkOrder {
        self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn mod_count(&self) -> u64 {
        self.table.mod_count()
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.head = None;
        self.tail = None;
    }

    fn links_mut(&mut self, id: EntryId) -> Option<&mut Linked<V>> {
        self.table.entry_mut(id).map(|e| &mut e.value)
    }

    fn link_last(&mut self, id: EntryId) {
        let tail = self.tail;
        if let Some(l) = self.links_mut(id) {
            l.before = tail;
            l.after = None;
        }
        match tail {
            Some(t) => {
                if let Some(l) = self.links_mut(t) {
                    l.after = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    fn link_first(&mut self, id: EntryId) {
        let head = self.head;
        if let Some(l) = self.links_mut(id) {
            l.after = head;
            l.before = None;
        }
        match head {
            Some(h) => {
                if let Some(l) = self.links_mut(h) {
                    l.before = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    fn unlink(&mut self, id: EntryId) {
        let Some(l) = self.links_mut(id) else {
            return;
        };
        let (before, after) = (l.before.take(), l.after.take());
        match before {
            Some(b) => {
                if let Some(l) = self.links_mut(b) {
                    l.after = after;
                }
            }
            None => self.head = after,
        }
        match after {
            Some(a) => {
                if let Some(l) = self.links_mut(a) {
                    l.before = before;
                }
            }
            None => self.tail = before,
        }
    }

    /// Moves an entry to the tail. A move is structural; staying put is not.
    fn move_to_last(&mut self, id: EntryId) {
        if self.tail != Some(id) {
            self.unlink(id);
            self.link_last(id);
            self.table.touch();
        }
    }

    fn move_to_first(&mut self, id: EntryId) {
        if self.head != Some(id) {
            self.unlink(id);
            self.link_first(id);
            self.table.touch();
        }
    }

    fn take(&mut self, id: EntryId) -> Option<(K, V)> {
        self.unlink(id);
        self.table.remove_id(id).map(|(k, l)| (k, l.value))
    }

    fn evict_overflow(&mut self) {
        let Some(max) = self.max_len else {
            return;
        };
        while self.len() > max {
            let Some(head) = self.head else {
                break;
            };
            self.take(head);
            trace!("linked map evicted eldest entry, {} left", self.len());
        }
    }

    fn end(&self, direction: Direction) -> Option<EntryId> {
        match direction {
            Direction::Forward => self.head,
            Direction::Backward => self.tail,
        }
    }

    fn entry_at(&self, id: Option<EntryId>) -> Option<(&K, &V)> {
        self.table.entry(id?).map(|e| (&e.key, &e.value.value))
    }

    pub fn first_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.head)
    }

    pub fn last_entry(&self) -> Option<(&K, &V)> {
        self.entry_at(self.tail)
    }

    pub fn poll_first_entry(&mut self) -> Option<(K, V)> {
        self.take(self.head?)
    }

    pub fn poll_last_entry(&mut self) -> Option<(K, V)> {
        self.take(self.tail?)
    }

    /// Iterates in link order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.iter_in(Direction::Forward)
    }

    pub fn iter_in(&self, direction: Direction) -> Iter<'_, K, V> {
        Iter {
            table: &self.table,
            next: self.end(direction),
            direction,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        KeysValues {
            fwd: self.iter(),
            back_left: self.len(),
            tail: self.tail,
        }
        .map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        KeysValues {
            fwd: self.iter(),
            back_left: self.len(),
            tail: self.tail,
        }
        .map(|(_, v)| v)
    }

    /// Mutable access in link order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let mut order = Vec::with_capacity(self.len());
        let mut cur = self.head;
        while let Some(id) = cur {
            order.push(id);
            cur = self.table.entry(id).and_then(|e| e.value.after);
        }
        let mut refs = SecondaryMap::with_capacity(order.len());
        for (id, k, l) in self.table.iter_mut_ids() {
            refs.insert(id, (k, &mut l.value));
        }
        IterMut {
            order: order.into_iter(),
            refs,
        }
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }

    /// Keeps only the entries `keep` accepts, visiting them in link order.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(e) = self.table.entry_mut(id) else {
                break;
            };
            cur = e.value.after;
            if !keep(&e.key, &mut e.value.value) {
                self.take(id);
            }
        }
    }

    /// A fail-fast cursor starting at the head (`Forward`) or tail (`Backward`).
    pub fn cursor(&self, direction: Direction) -> Cursor<EntryId> {
        Cursor::new(self, direction)
    }

    /// O(1) reverse-order view.
    pub fn reversed(&self) -> Reversed<&Self> {
        Reversed::new(self)
    }

    /// O(1) reverse-order view that mutates this map with first and last
    /// swapped.
    pub fn reversed_mut(&mut self) -> Reversed<&mut Self> {
        Reversed::new(self)
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn find<Q>(&self, q: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        self.table.find(self.hasher.hash_one(q), q)
    }

    /// Looks up without touching the order, even in access order.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry_at(self.find(q)).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entry_at(self.find(q))
    }

    /// Looks up and, in access order, moves the entry to the tail.
    pub fn get_touch<Q>(&mut self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(q)?;
        if self.order == LinkOrder::Access {
            self.move_to_last(id);
        }
        self.table.entry(id).map(|e| &e.value.value)
    }

    /// Mutable lookup; in access order this moves the entry to the tail.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.find(q)?;
        if self.order == LinkOrder::Access {
            self.move_to_last(id);
        }
        self.table.entry_mut(id).map(|e| &mut e.value.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    fn locate(&self, key: &K) -> (u64, Option<EntryId>) {
        let _g = self.reentrancy.enter();
        let hash = self.hasher.hash_one(key);
        (hash, self.table.find(hash, key))
    }

    /// Shared body of the three insertion flavors: overwrite in place or link
    /// a fresh entry, then let `place` position it.
    fn upsert(
        &mut self,
        key: K,
        value: V,
        place: fn(&mut Self, EntryId, bool),
    ) -> Option<V> {
        let (hash, found) = self.locate(&key);
        let old = match found {
            Some(id) => {
                let old = self
                    .links_mut(id)
                    .map(|l| core::mem::replace(&mut l.value, value));
                place(self, id, false);
                old
            }
            None => {
                let id = self.table.insert_fresh(hash, key, Linked::new(value));
                place(self, id, true);
                None
            }
        };
        if found.is_none() {
            self.evict_overflow();
        }
        old
    }

    /// Inserts or overwrites. A fresh key goes to the tail; an existing key
    /// stays put unless the map is in access order.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.upsert(key, value, |map, id, fresh| {
            if fresh {
                map.link_last(id);
            } else if map.order == LinkOrder::Access {
                map.move_to_last(id);
            }
        })
    }

    /// Inserts or overwrites, then moves the entry to the head.
    pub fn put_first(&mut self, key: K, value: V) -> Option<V> {
        self.upsert(key, value, |map, id, fresh| {
            if fresh {
                map.link_first(id);
            } else {
                map.move_to_first(id);
            }
        })
    }

    /// Inserts or overwrites, then moves the entry to the tail.
    pub fn put_last(&mut self, key: K, value: V) -> Option<V> {
        self.upsert(key, value, |map, id, fresh| {
            if fresh {
                map.link_last(id);
            } else {
                map.move_to_last(id);
            }
        })
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
        let id = self.find(q)?;
        self.take(id)
    }

    pub fn reserve(&mut self, additional: usize) {
        self.table.reserve(additional);
    }

    /// Copies `source` in its iteration order into a pre-sized map.
    pub fn from_map<M>(source: &M) -> Self
    where
        M: Map<Key = K, Value = V> + ?Sized,
        K: Clone,
        V: Clone,
        S: Default,
    {
        let mut map = Self::from_parts(
            TableConfig::for_len(source.len(), crate::config::DEFAULT_LOAD_FACTOR),
            LinkOrder::Insertion,
            S::default(),
        );
        for (k, v) in source.iter() {
            map.insert(k.clone(), v.clone());
        }
        map
    }
}

/// Link-order iterator over a [`LinkedHashMap`], in either direction.
pub struct Iter<'a, K, V> {
    table: &'a HashTable<K, Linked<V>>,
    next: Option<EntryId>,
    direction: Direction,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.table.entry(self.next?)?;
        self.next = e.value.step(self.direction);
        self.remaining -= 1;
        Some((&e.key, &e.value.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            table: self.table,
            next: self.next,
            direction: self.direction,
            remaining: self.remaining,
        }
    }
}

// Walks from both ends at once for keys()/values(); meets in the middle.
struct KeysValues<'a, K, V> {
    fwd: Iter<'a, K, V>,
    back_left: usize,
    tail: Option<EntryId>,
}

impl<'a, K, V> Iterator for KeysValues<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.back_left == 0 {
            return None;
        }
        self.back_left -= 1;
        self.fwd.next()
    }
}

impl<K, V> DoubleEndedIterator for KeysValues<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.back_left == 0 {
            return None;
        }
        self.back_left -= 1;
        let e = self.fwd.table.entry(self.tail?)?;
        self.tail = e.value.before;
        Some((&e.key, &e.value.value))
    }
}

/// Mutable link-order iterator.
pub struct IterMut<'a, K, V> {
    order: std::vec::IntoIter<EntryId>,
    refs: SecondaryMap<EntryId, (&'a K, &'a mut V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.refs.remove(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

/// Owning link-order iterator.
pub struct IntoIter<K, V> {
    table: HashTable<K, Linked<V>>,
    next: Option<EntryId>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let (k, l) = self.table.remove_id(self.next?)?;
        self.next = l.after;
        Some((k, l.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.table.len(), Some(self.table.len()))
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            next: self.head,
            table: self.table,
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
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

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
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

impl<K, V, S> Map for LinkedHashMap<K, V, S>
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
        LinkedHashMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        LinkedHashMap::contains_key(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        LinkedHashMap::iter(self)
    }

    fn mod_count(&self) -> u64 {
        self.table.mod_count()
    }
}

impl<K, V, S> MapMut for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.insert(key, value))
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(LinkedHashMap::remove(self, key))
    }

    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&K, &V) -> bool,
    ) -> Result<Option<(K, V)>> {
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(e) = self.table.entry(id) else {
                break;
            };
            if pred(&e.key, &e.value.value) {
                return Ok(self.take(id));
            }
            cur = e.value.after;
        }
        Ok(None)
    }

    fn clear(&mut self) -> Result<()> {
        LinkedHashMap::clear(self);
        Ok(())
    }
}

impl<K, V, S> SequencedMap for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn entries_in(&self, direction: Direction) -> Iter<'_, K, V> {
        self.iter_in(direction)
    }
}

impl<K, V, S> SequencedMapMut for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn put_first(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(LinkedHashMap::put_first(self, key, value))
    }

    fn put_last(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(LinkedHashMap::put_last(self, key, value))
    }

    fn poll_first_entry(&mut self) -> Option<(K, V)> {
        LinkedHashMap::poll_first_entry(self)
    }

    fn poll_last_entry(&mut self) -> Option<(K, V)> {
        LinkedHashMap::poll_last_entry(self)
    }
}

impl<K, V, S> Traverse for LinkedHashMap<K, V, S> {
    type Id = EntryId;
    type Item<'a> = (&'a K, &'a V) where Self: 'a;
    type Owned = (K, V);

    fn instance_id(&self) -> u64 {
        self.instance.get()
    }

    fn traverse_mod_count(&self) -> u64 {
        self.table.mod_count()
    }

    fn first_id(&self, direction: Direction) -> Option<EntryId> {
        self.end(direction)
    }

    fn next_id(&self, id: EntryId, direction: Direction) -> Option<EntryId> {
        self.table.entry(id)?.value.step(direction)
    }

    fn item(&self, id: EntryId) -> Option<(&K, &V)> {
        self.entry_at(Some(id))
    }

    fn remove_id(&mut self, id: EntryId) -> Option<(K, V)> {
        self.take(id)
    }
}

impl<K, V, S, M> PartialEq<M> for LinkedHashMap<K, V, S>
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

impl<K: Eq + Hash, V: Eq, S: BuildHasher> Eq for LinkedHashMap<K, V, S> {}

impl<K: Hash, V: Hash, S> Hash for LinkedHashMap<K, V, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::map_hash_code(self.iter()));
    }
}

impl<K: Debug, V: Debug, S> Debug for LinkedHashMap<K, V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Display, V: Display, S> Display for LinkedHashMap<K, V, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_map(f, self.iter())
    }
}

#[cfg(test)]
impl<K, V, S> LinkedHashMap<K, V, S> {
    /// Panics unless the order chain visits exactly the live entries and the
    /// back links mirror the forward ones.
    pub(crate) fn assert_links(&self) {
        let mut forward = Vec::new();
        let mut prev = None;
        let mut cur = self.head;
        while let Some(id) = cur {
            let l = &self.table.entry(id).expect("chained id is live").value;
            assert_eq!(l.before, prev, "back link mismatch");
            forward.push(id);
            prev = Some(id);
            cur = l.after;
        }
        assert_eq!(prev, self.tail, "tail is not the last chained entry");
        assert_eq!(forward.len(), self.len(), "chain does not cover the table");
        self.table.assert_invariants();
    }
}

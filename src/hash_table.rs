//! HashTable: the structural bucket-chain engine behind every hash collection.
//!
//! Entries live in a generational arena and are addressed by [`EntryId`]; the
//! bucket array only holds the id at the head of each chain, and each entry
//! holds the id of the next entry in its chain. Ids stay valid until their
//! entry is removed, which is what lets the linked overlay thread its order
//! chain through the same entries and lets cursors park on an entry between
//! calls.
//!
//! The table never hashes anything itself. Callers pass the precomputed hash
//! in and it is stored with the entry, so rehashing never calls back into user
//! `Hash` code; only `Eq` runs, and only while probing a chain.
//!
//! Invariants:
//! - `len == arena length == sum of chain lengths`.
//! - capacity is 0 (not yet allocated) or a power of two.
//! - after an insertion returns, `len <= threshold` unless the table is at
//!   [`MAX_CAPACITY`].
//! - `mod_count` changes on every structural change (insert of a new key,
//!   removal, clear) and on nothing else.

use core::borrow::Borrow;
use core::mem;

use log::trace;
use slotmap::{SecondaryMap, SlotMap};

use crate::config::{table_size_for, TableConfig, MAX_CAPACITY};

slotmap::new_key_type! {
    /// Stable identity of a hash table entry.
    pub struct EntryId;
}

#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    chain: Option<EntryId>,
}

/// Outcome of [`HashTable::insert`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Insertion<V> {
    /// A new entry was created.
    Fresh(EntryId),
    /// The key already existed; its value was overwritten in place.
    Replaced(EntryId, V),
}

#[derive(Clone)]
pub(crate) struct HashTable<K, V> {
    buckets: Vec<Option<EntryId>>,
    entries: SlotMap<EntryId, Entry<K, V>>,
    load_factor: f32,
    threshold: usize,
    // Bucket count to allocate on first insertion.
    pending_capacity: usize,
    mod_count: u64,
}

/// Folds the high half of the hash into the low half, which is all the
/// bucket mask keeps.
#[inline]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    ((hash ^ (hash >> 32)) as usize) & (capacity - 1)
}

fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    let t = capacity as f64 * load_factor as f64;
    if capacity >= MAX_CAPACITY || t >= usize::MAX as f64 {
        usize::MAX
    } else {
        t as usize
    }
}

impl<K, V> HashTable<K, V> {
    /// The config must already be validated.
    pub(crate) fn new(config: TableConfig) -> Self {
        Self {
            buckets: Vec::new(),
            entries: SlotMap::with_key(),
            load_factor: config.load_factor,
            threshold: 0,
            pending_capacity: table_size_for(config.initial_capacity),
            mod_count: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of buckets currently allocated.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    #[inline]
    pub(crate) fn mod_count(&self) -> u64 {
        self.mod_count
    }

    /// Counts a structural change made by an overlay (e.g. a reorder) that
    /// the table itself cannot see.
    #[inline]
    pub(crate) fn touch(&mut self) {
        self.mod_count += 1;
    }

    #[inline]
    pub(crate) fn entry(&self, id: EntryId) -> Option<&Entry<K, V>> {
        self.entries.get(id)
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, id: EntryId) -> Option<&mut Entry<K, V>> {
        self.entries.get_mut(id)
    }

    /// Looks up the entry whose key equals `q`, using the caller's hash of `q`.
    pub(crate) fn find<Q>(&self, hash: u64, q: &Q) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let mut cur = self.buckets[bucket_index(hash, self.buckets.len())];
        while let Some(id) = cur {
            let e = &self.entries[id];
            if e.hash == hash && e.key.borrow() == q {
                return Some(id);
            }
            cur = e.chain;
        }
        None
    }

    /// Inserts or overwrites. Only a fresh entry is a structural change.
    pub(crate) fn insert(&mut self, hash: u64, key: K, value: V) -> Insertion<V>
    where
        K: Eq,
    {
        if let Some(id) = self.find(hash, &key) {
            let old = mem::replace(&mut self.entries[id].value, value);
            return Insertion::Replaced(id, old);
        }
        Insertion::Fresh(self.insert_fresh(hash, key, value))
    }

    /// Appends an entry the caller knows is absent to the tail of its chain.
    pub(crate) fn insert_fresh(&mut self, hash: u64, key: K, value: V) -> EntryId {
        if self.buckets.is_empty() {
            self.rehash_to(self.pending_capacity);
        }
        let id = self.entries.insert(Entry {
            key,
            value,
            hash,
            chain: None,
        });
        let idx = bucket_index(hash, self.buckets.len());
        match self.buckets[idx] {
            None => self.buckets[idx] = Some(id),
            Some(head) => {
                let mut tail = head;
                while let Some(next) = self.entries[tail].chain {
                    tail = next;
                }
                self.entries[tail].chain = Some(id);
            }
        }
        self.mod_count += 1;
        if self.entries.len() > self.threshold {
            self.grow();
        }
        id
    }

    pub(crate) fn remove<Q>(&mut self, hash: u64, q: &Q) -> Option<(EntryId, K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let id = self.find(hash, q)?;
        self.remove_id(id).map(|(k, v)| (id, k, v))
    }

    /// Unlinks `id` from its bucket chain and frees it. A stale id is a no-op.
    pub(crate) fn remove_id(&mut self, id: EntryId) -> Option<(K, V)> {
        let (hash, next) = {
            let e = self.entries.get(id)?;
            (e.hash, e.chain)
        };
        let idx = bucket_index(hash, self.buckets.len());
        if self.buckets[idx] == Some(id) {
            self.buckets[idx] = next;
        } else {
            let mut cur = self.buckets[idx];
            while let Some(c) = cur {
                if self.entries[c].chain == Some(id) {
                    self.entries[c].chain = next;
                    break;
                }
                cur = self.entries[c].chain;
            }
        }
        let e = self.entries.remove(id)?;
        self.mod_count += 1;
        Some((e.key, e.value))
    }

    /// Drops every entry but keeps the bucket array.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.buckets.fill(None);
        self.mod_count += 1;
    }

    /// Ensures `additional` more entries fit without a rehash, jumping straight
    /// to the smallest sufficient capacity.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = self.len().saturating_add(additional);
        if needed <= self.threshold {
            return;
        }
        let target = table_size_for((needed as f64 / self.load_factor as f64).ceil() as usize);
        if self.buckets.is_empty() {
            self.pending_capacity = self.pending_capacity.max(target);
        } else if target > self.buckets.len() {
            self.rehash_to(target);
        }
    }

    /// Doubles the bucket array, or pins the threshold once at the ceiling.
    fn grow(&mut self) {
        let cap = self.buckets.len();
        if cap >= MAX_CAPACITY {
            self.threshold = usize::MAX;
            return;
        }
        self.rehash_to(cap * 2);
    }

    /// Redistributes every entry into `new_cap` buckets. Entries that share a
    /// new bucket keep their previous relative order.
    fn rehash_to(&mut self, new_cap: usize) {
        trace!(
            "hash table rehash: {} -> {} buckets, {} entries",
            self.buckets.len(),
            new_cap,
            self.entries.len()
        );
        let old = mem::replace(&mut self.buckets, vec![None; new_cap]);
        let mut tails: Vec<Option<EntryId>> = vec![None; new_cap];
        for head in old {
            let mut cur = head;
            while let Some(id) = cur {
                let e = &mut self.entries[id];
                cur = e.chain.take();
                let idx = bucket_index(e.hash, new_cap);
                match tails[idx] {
                    Some(tail) => self.entries[tail].chain = Some(id),
                    None => self.buckets[idx] = Some(id),
                }
                tails[idx] = Some(id);
            }
        }
        self.threshold = threshold_for(new_cap, self.load_factor);
    }

    /// First entry in bucket order.
    pub(crate) fn first_id(&self) -> Option<EntryId> {
        self.scan_from(0)
    }

    /// Entry after `id` in bucket order: the rest of its chain, then the
    /// following buckets.
    pub(crate) fn next_id(&self, id: EntryId) -> Option<EntryId> {
        let e = self.entries.get(id)?;
        if e.chain.is_some() {
            return e.chain;
        }
        self.scan_from(bucket_index(e.hash, self.buckets.len()) + 1)
    }

    fn scan_from(&self, bucket: usize) -> Option<EntryId> {
        self.buckets.get(bucket..)?.iter().find_map(|head| *head)
    }

    /// Removes every entry rejected by `keep`, in bucket order.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        let mut cur = self.first_id();
        while let Some(id) = cur {
            cur = self.next_id(id);
            let e = &mut self.entries[id];
            if !keep(&e.key, &mut e.value) {
                self.remove_id(id);
            }
        }
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            next: self.first_id(),
            remaining: self.len(),
        }
    }

    fn bucket_order(&self) -> Vec<EntryId> {
        let mut ids = Vec::with_capacity(self.len());
        let mut cur = self.first_id();
        while let Some(id) = cur {
            ids.push(id);
            cur = self.next_id(id);
        }
        ids
    }

    /// Mutable access to every entry, in the same bucket order as `iter`.
    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.bucket_order();
        let mut refs = SecondaryMap::with_capacity(order.len());
        for (id, e) in self.entries.iter_mut() {
            refs.insert(id, (&e.key, &mut e.value));
        }
        IterMut {
            order: order.into_iter(),
            refs,
        }
    }

    pub(crate) fn iter_mut_ids(&mut self) -> impl Iterator<Item = (EntryId, &K, &mut V)> {
        self.entries
            .iter_mut()
            .map(|(id, e)| (id, &e.key, &mut e.value))
    }

    /// Consumes the table, yielding its entries in bucket order.
    pub(crate) fn into_entries(self) -> IntoEntries<K, V> {
        let ids = self.bucket_order();
        IntoEntries {
            entries: self.entries,
            ids: ids.into_iter(),
        }
    }

    #[cfg(test)]
    pub(crate) fn chain_lengths(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .map(|head| {
                let mut n = 0;
                let mut cur = *head;
                while let Some(id) = cur {
                    n += 1;
                    cur = self.entries[id].chain;
                }
                n
            })
            .collect()
    }

    /// Panics if any structural invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let lengths = self.chain_lengths();
        assert_eq!(lengths.iter().sum::<usize>(), self.len(), "chains must cover every entry");
        let cap = self.capacity();
        assert!(cap == 0 || cap.is_power_of_two(), "capacity must be a power of two");
        if cap > 0 && cap < MAX_CAPACITY {
            assert!(self.len() <= self.threshold, "load factor exceeded");
        }
        for (b, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            while let Some(id) = cur {
                let e = &self.entries[id];
                assert_eq!(bucket_index(e.hash, cap), b, "entry chained in the wrong bucket");
                cur = e.chain;
            }
        }
    }
}

/// Bucket-order iterator over `(id, key, value)`.
pub(crate) struct Iter<'a, K, V> {
    table: &'a HashTable<K, V>,
    next: Option<EntryId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (EntryId, &'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.table.next_id(id);
        self.remaining -= 1;
        let e = &self.table.entries[id];
        Some((id, &e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Owning iterator returned by [`HashTable::into_entries`].
pub(crate) struct IterMut<'a, K, V> {
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

pub(crate) struct IntoEntries<K, V> {
    entries: SlotMap<EntryId, Entry<K, V>>,
    ids: std::vec::IntoIter<EntryId>,
}

impl<K, V> Iterator for IntoEntries<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let id = self.ids.next()?;
        self.entries.remove(id).map(|e| (e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoEntries<K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            table: self.table,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HashTable<&'static str, i32> {
        HashTable::new(TableConfig::default())
    }

    /// Invariant: allocation is lazy and sized from the config.
    #[test]
    fn allocates_on_first_insert() {
        let mut t = HashTable::<u32, ()>::new(TableConfig::new(8, 0.75));
        assert_eq!(t.capacity(), 0);
        t.insert(1, 1, ());
        assert_eq!(t.capacity(), 8);
        t.assert_invariants();
    }

    /// Invariant: overwriting an existing key is not structural.
    #[test]
    fn overwrite_keeps_mod_count() {
        let mut t = table();
        assert!(matches!(t.insert(7, "a", 1), Insertion::Fresh(_)));
        let mc = t.mod_count();
        match t.insert(7, "a", 2) {
            Insertion::Replaced(_, old) => assert_eq!(old, 1),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(t.mod_count(), mc);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: a shared hash still resolves by equality, and removal from
    /// the middle of a chain keeps the rest reachable.
    #[test]
    fn colliding_entries_chain() {
        let mut t = table();
        for (i, k) in ["a", "b", "c", "d"].into_iter().enumerate() {
            t.insert(0, k, i as i32);
        }
        assert_eq!(t.chain_lengths()[0], 4);
        let (_, k, v) = t.remove(0, "b").expect("present");
        assert_eq!((k, v), ("b", 1));
        for k in ["a", "c", "d"] {
            assert!(t.find(0, k).is_some(), "{k} lost after chain removal");
        }
        let order: Vec<_> = t.iter().map(|(_, k, _)| *k).collect();
        assert_eq!(order, ["a", "c", "d"], "chain order is insertion order");
        t.assert_invariants();
    }

    /// Invariant: absent removal changes nothing.
    #[test]
    fn absent_removal_is_idempotent() {
        let mut t = table();
        t.insert(1, "a", 1);
        let mc = t.mod_count();
        assert!(t.remove(2, "z").is_none());
        assert!(t.remove(1, "z").is_none());
        assert_eq!(t.mod_count(), mc);
        assert_eq!(t.len(), 1);
    }

    /// Invariant: growth doubles and keeps per-bucket relative order.
    #[test]
    fn grows_past_threshold() {
        let mut t = HashTable::<u64, u64>::new(TableConfig::new(4, 0.75));
        for k in 0..4u64 {
            t.insert(k, k, k);
        }
        assert_eq!(t.capacity(), 8, "4 entries exceed 4 * 0.75");
        t.assert_invariants();
        // Hashes 1 and 9 share bucket 1 at capacity 8 and split at 16.
        t.insert(9, 9, 9);
        t.insert(17, 17, 17);
        let before: Vec<_> = t.iter().map(|(_, k, _)| *k).filter(|k| k % 8 == 1).collect();
        assert_eq!(before, [1, 9, 17]);
        t.reserve(20);
        assert!(t.capacity() >= 32);
        let after: Vec<_> = t.iter().map(|(_, k, _)| *k).filter(|k| k % 16 == 1).collect();
        assert_eq!(after, [1, 17], "relative order survives the split");
        t.assert_invariants();
    }

    /// Invariant: clear keeps capacity, empties chains, counts as structural.
    #[test]
    fn clear_keeps_capacity() {
        let mut t = table();
        for (i, k) in ["a", "b", "c"].into_iter().enumerate() {
            t.insert(i as u64, k, 0);
        }
        let cap = t.capacity();
        let mc = t.mod_count();
        t.clear();
        assert_eq!(t.len(), 0);
        assert_eq!(t.capacity(), cap);
        assert!(t.mod_count() > mc);
        assert!(t.first_id().is_none());
        t.assert_invariants();
    }

    /// Invariant: ids are stable across rehash and dead after removal.
    #[test]
    fn ids_survive_rehash() {
        let mut t = HashTable::<u64, u64>::new(TableConfig::new(2, 0.75));
        let first = match t.insert(5, 5, 50) {
            Insertion::Fresh(id) => id,
            other => panic!("unexpected {other:?}"),
        };
        for k in 0..100u64 {
            t.insert(k * 31, k * 31 + 1000, k);
        }
        assert_eq!(t.entry(first).map(|e| e.value), Some(50));
        t.remove_id(first);
        assert!(t.entry(first).is_none());
        assert!(t.remove_id(first).is_none());
    }

    /// Invariant: retain visits every entry once and removes the rejected ones.
    #[test]
    fn retain_filters() {
        let mut t = HashTable::<u64, u64>::new(TableConfig::default());
        for k in 0..50u64 {
            t.insert(k % 7, k, k);
        }
        t.retain(|k, v| {
            *v += 1;
            k % 2 == 0
        });
        assert_eq!(t.len(), 25);
        assert!(t.iter().all(|(_, k, v)| k % 2 == 0 && *v == k + 1));
        t.assert_invariants();
    }

    #[test]
    fn into_entries_drains_everything() {
        let mut t = table();
        t.insert(3, "x", 1);
        t.insert(3, "y", 2);
        let mut all: Vec<_> = t.into_entries().collect();
        all.sort();
        assert_eq!(all, [("x", 1), ("y", 2)]);
    }
}

//! TreeMap: the sorted map over the red-black engine, plus range windows.
//!
//! Every comparison goes through the map's [`Comparator`]; with the default
//! [`Natural`] comparator that is `Ord`, and lookups accept any borrowed form
//! of the key the comparator can order.
//!
//! Range views ([`SubMap`], [`SubMapMut`]) are a borrow of the map plus a
//! [`Window`] of owned bounds. They hold no entries: size, bounds checks and
//! navigation are answered against the shared tree on every call, clamped to
//! the window. A mutable window rejects insertions outside its bounds and
//! ignores removals outside them; [`SubMapMut::backing_mut`] hands out the
//! whole map, and whatever is done through it is what the window sees next.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Bound::{self, Excluded, Included, Unbounded};

use slotmap::SecondaryMap;

use crate::comparator::{Comparator, Natural};
use crate::contract;
use crate::cursor::{Cursor, InstanceId, Traverse};
use crate::error::{CollectionError, Result};
use crate::reentrancy::DebugReentrancy;
use crate::reversed::Reversed;
use crate::traits::{Direction, Map, MapMut, NavigableMap, SequencedMap, SequencedMapMut};
use crate::tree::{self, NodeId, Placed, RbTree};

#[derive(Clone)]
pub struct TreeMap<K, V, C = Natural> {
    tree: RbTree<K, V>,
    comparator: C,
    instance: InstanceId,
    reentrancy: DebugReentrancy,
}

/// The key range a window admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window<K> {
    lo: Bound<K>,
    hi: Bound<K>,
}

impl<K> Window<K> {
    pub fn full() -> Self {
        Window {
            lo: Unbounded,
            hi: Unbounded,
        }
    }

    /// Rejects a range whose low end sorts after its high end.
    pub fn new<C: Comparator<K>>(lo: Bound<K>, hi: Bound<K>, cmp: &C) -> Result<Self> {
        if let (Included(l) | Excluded(l), Included(h) | Excluded(h)) = (&lo, &hi) {
            if cmp.compare(l, h) == Ordering::Greater {
                return Err(CollectionError::illegal_argument("fromKey > toKey"));
            }
        }
        Ok(Window { lo, hi })
    }

    pub fn lo(&self) -> Bound<&K> {
        self.lo.as_ref()
    }

    pub fn hi(&self) -> Bound<&K> {
        self.hi.as_ref()
    }

    fn too_low<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
        match &self.lo {
            Unbounded => false,
            Included(l) => cmp.compare(key, l) == Ordering::Less,
            Excluded(l) => cmp.compare(key, l) != Ordering::Greater,
        }
    }

    fn too_high<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
        match &self.hi {
            Unbounded => false,
            Included(h) => cmp.compare(key, h) == Ordering::Greater,
            Excluded(h) => cmp.compare(key, h) != Ordering::Less,
        }
    }

    pub fn contains<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
        !self.too_low(key, cmp) && !self.too_high(key, cmp)
    }

    /// Like `contains`, but this window's own bounds count as inclusive.
    fn contains_closed<C: Comparator<K>>(&self, key: &K, cmp: &C) -> bool {
        let above_lo = match &self.lo {
            Unbounded => true,
            Included(l) | Excluded(l) => cmp.compare(key, l) != Ordering::Less,
        };
        let below_hi = match &self.hi {
            Unbounded => true,
            Included(h) | Excluded(h) => cmp.compare(key, h) != Ordering::Greater,
        };
        above_lo && below_hi
    }

    /// A window inside this one. Each new bound must itself lie in this
    /// window; an unbounded end inherits this window's bound.
    fn narrow<C: Comparator<K>>(&self, lo: Bound<K>, hi: Bound<K>, cmp: &C) -> Result<Self>
    where
        K: Clone,
    {
        let inside = |b: &Bound<K>| match b {
            Unbounded => true,
            Included(k) => self.contains(k, cmp),
            Excluded(k) => self.contains_closed(k, cmp),
        };
        if !inside(&lo) {
            return Err(CollectionError::illegal_argument("fromKey out of range"));
        }
        if !inside(&hi) {
            return Err(CollectionError::illegal_argument("toKey out of range"));
        }
        let lo = match lo {
            Unbounded => self.lo.clone(),
            b => b,
        };
        let hi = match hi {
            Unbounded => self.hi.clone(),
            b => b,
        };
        Window::new(lo, hi, cmp)
    }
}

fn bounds<K>(from: K, from_inclusive: bool, to: K, to_inclusive: bool) -> (Bound<K>, Bound<K>) {
    (
        if from_inclusive { Included(from) } else { Excluded(from) },
        if to_inclusive { Included(to) } else { Excluded(to) },
    )
}

fn bound<K>(key: K, inclusive: bool) -> Bound<K> {
    if inclusive {
        Included(key)
    } else {
        Excluded(key)
    }
}

impl<K: Ord, V> TreeMap<K, V> {
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K: Ord, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    pub fn with_comparator(comparator: C) -> Self {
        TreeMap {
            tree: RbTree::new(),
            comparator,
            instance: InstanceId::fresh(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    pub fn mod_count(&self) -> u64 {
        self.tree.mod_count()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    fn entry(&self, id: Option<NodeId>) -> Option<(&K, &V)> {
        self.tree.node(id?).map(|n| (&n.key, &n.value))
    }

    fn take(&mut self, id: Option<NodeId>) -> Option<(K, V)> {
        self.tree.remove_id(id?)
    }

    pub fn first_entry(&self) -> Option<(&K, &V)> {
        self.entry(self.tree.first())
    }

    pub fn last_entry(&self) -> Option<(&K, &V)> {
        self.entry(self.tree.last())
    }

    /// Not-found on an empty map.
    pub fn first_key(&self) -> Result<&K> {
        self.first_entry()
            .map(|(k, _)| k)
            .ok_or(CollectionError::NoSuchElement)
    }

    pub fn last_key(&self) -> Result<&K> {
        self.last_entry()
            .map(|(k, _)| k)
            .ok_or(CollectionError::NoSuchElement)
    }

    pub fn poll_first_entry(&mut self) -> Option<(K, V)> {
        self.take(self.tree.first())
    }

    pub fn poll_last_entry(&mut self) -> Option<(K, V)> {
        self.take(self.tree.last())
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.iter_in(Direction::Forward)
    }

    pub fn iter_in(&self, direction: Direction) -> Iter<'_, K, V> {
        Iter {
            tree: &self.tree,
            next: self.tree.end(direction),
            last: self.tree.end(direction.flip()),
            direction,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Mutable access in key order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.tree.ordered_ids();
        let mut refs = SecondaryMap::with_capacity(order.len());
        for (id, k, v) in self.tree.iter_mut_ids() {
            refs.insert(id, (k, v));
        }
        IterMut {
            order: order.into_iter(),
            refs,
        }
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.iter_mut().map(|(_, v)| v)
    }

    /// Keeps only the entries `keep` accepts, visiting them in key order.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &mut V) -> bool) {
        let mut cur = self.tree.first();
        while let Some(id) = cur {
            cur = self.tree.successor(id);
            let Some(n) = self.tree.node_mut(id) else {
                break;
            };
            if !keep(&n.key, &mut n.value) {
                self.tree.remove_id(id);
            }
        }
    }

    pub fn cursor(&self, direction: Direction) -> Cursor<NodeId> {
        Cursor::new(self, direction)
    }

    /// O(1) descending view.
    pub fn descending_map(&self) -> Reversed<&Self> {
        Reversed::new(self)
    }

    pub fn descending_map_mut(&mut self) -> Reversed<&mut Self> {
        Reversed::new(self)
    }
}

impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    /// Builds a map from entries already in strictly increasing order, in
    /// linear time. Out-of-order or duplicate keys are rejected.
    pub fn from_sorted<I>(entries: I, comparator: C) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, V)> = entries.into_iter().collect();
        if entries
            .windows(2)
            .any(|w| comparator.compare(&w[0].0, &w[1].0) != Ordering::Less)
        {
            return Err(CollectionError::illegal_argument(
                "entries are not strictly increasing",
            ));
        }
        let mut map = Self::with_comparator(comparator);
        map.tree = RbTree::from_sorted(entries);
        Ok(map)
    }

    fn find<Q>(&self, q: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let _g = self.reentrancy.enter();
        let cmp = &self.comparator;
        self.tree.search(|k| cmp.compare(q, k.borrow()))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.entry(self.find(q)).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.entry(self.find(q))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let id = self.find(q)?;
        self.tree.node_mut(id).map(|n| &mut n.value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.find(q).is_some()
    }

    /// O(n).
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter();
        let cmp = &self.comparator;
        match self.tree.insert(key, value, |a, b| cmp.compare(a, b)) {
            Placed::Fresh(_) => None,
            Placed::Replaced(_, old) => Some(old),
        }
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let id = self.find(q);
        self.take(id)
    }

    fn nav<Q>(
        &self,
        q: &Q,
        how: fn(&RbTree<K, V>, &mut dyn FnMut(&K) -> Ordering) -> Option<NodeId>,
    ) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        let id = {
            let _g = self.reentrancy.enter();
            let cmp = &self.comparator;
            how(&self.tree, &mut |k: &K| cmp.compare(q, k.borrow()))
        };
        self.entry(id)
    }

    /// Greatest entry strictly below `q`.
    pub fn lower_entry<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.nav(q, |t, p| t.lower(p))
    }

    /// Greatest entry at or below `q`.
    pub fn floor_entry<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.nav(q, |t, p| t.floor(p))
    }

    /// Least entry at or above `q`.
    pub fn ceiling_entry<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.nav(q, |t, p| t.ceiling(p))
    }

    /// Least entry strictly above `q`.
    pub fn higher_entry<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.nav(q, |t, p| t.higher(p))
    }

    pub fn lower_key<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.lower_entry(q).map(|(k, _)| k)
    }

    pub fn floor_key<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.floor_entry(q).map(|(k, _)| k)
    }

    pub fn ceiling_key<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.ceiling_entry(q).map(|(k, _)| k)
    }

    pub fn higher_key<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.higher_entry(q).map(|(k, _)| k)
    }

    // ---- window primitives ----

    fn key_of(&self, id: NodeId) -> Option<&K> {
        self.tree.node(id).map(|n| &n.key)
    }

    // Window bound checks call the comparator, so they run under the same
    // guard as the tree searches.

    fn window_new(&self, lo: Bound<K>, hi: Bound<K>) -> Result<Window<K>> {
        let _g = self.reentrancy.enter();
        Window::new(lo, hi, &self.comparator)
    }

    fn window_narrow(&self, w: &Window<K>, lo: Bound<K>, hi: Bound<K>) -> Result<Window<K>>
    where
        K: Clone,
    {
        let _g = self.reentrancy.enter();
        w.narrow(lo, hi, &self.comparator)
    }

    fn in_window(&self, w: &Window<K>, key: &K) -> bool {
        let _g = self.reentrancy.enter();
        w.contains(key, &self.comparator)
    }

    fn lowest_in(&self, w: &Window<K>) -> Option<NodeId> {
        let _g = self.reentrancy.enter();
        let cmp = &self.comparator;
        let id = match &w.lo {
            Unbounded => self.tree.first(),
            Included(l) => self.tree.ceiling(|k| cmp.compare(l, k)),
            Excluded(l) => self.tree.higher(|k| cmp.compare(l, k)),
        }?;
        (!w.too_high(self.key_of(id)?, cmp)).then_some(id)
    }

    fn highest_in(&self, w: &Window<K>) -> Option<NodeId> {
        let _g = self.reentrancy.enter();
        let cmp = &self.comparator;
        let id = match &w.hi {
            Unbounded => self.tree.last(),
            Included(h) => self.tree.floor(|k| cmp.compare(h, k)),
            Excluded(h) => self.tree.lower(|k| cmp.compare(h, k)),
        }?;
        (!w.too_low(self.key_of(id)?, cmp)).then_some(id)
    }

    fn end_in(&self, w: &Window<K>, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Forward => self.lowest_in(w),
            Direction::Backward => self.highest_in(w),
        }
    }

    fn iter_window(&self, w: &Window<K>, direction: Direction) -> Iter<'_, K, V> {
        let next = self.end_in(w, direction);
        let last = next.and_then(|_| self.end_in(w, direction.flip()));
        Iter {
            tree: &self.tree,
            next,
            last,
            direction,
        }
    }

    /// Clamps an upward search (`ceiling`/`higher`) to the window.
    fn above_in(&self, w: &Window<K>, key: &K, inclusive: bool) -> Option<NodeId> {
        if self.below_window(w, key) {
            return self.lowest_in(w);
        }
        let _g = self.reentrancy.enter();
        let cmp = &self.comparator;
        let probe = |k: &K| cmp.compare(key, k);
        let id = if inclusive {
            self.tree.ceiling(probe)
        } else {
            self.tree.higher(probe)
        }?;
        (!w.too_high(self.key_of(id)?, cmp)).then_some(id)
    }

    /// Clamps a downward search (`floor`/`lower`) to the window.
    fn below_in(&self, w: &Window<K>, key: &K, inclusive: bool) -> Option<NodeId> {
        if self.above_window(w, key) {
            return self.highest_in(w);
        }
        let _g = self.reentrancy.enter();
        let cmp = &self.comparator;
        let probe = |k: &K| cmp.compare(key, k);
        let id = if inclusive {
            self.tree.floor(probe)
        } else {
            self.tree.lower(probe)
        }?;
        (!w.too_low(self.key_of(id)?, cmp)).then_some(id)
    }

    fn below_window(&self, w: &Window<K>, key: &K) -> bool {
        let _g = self.reentrancy.enter();
        w.too_low(key, &self.comparator)
    }

    fn above_window(&self, w: &Window<K>, key: &K) -> bool {
        let _g = self.reentrancy.enter();
        w.too_high(key, &self.comparator)
    }

    fn get_in(&self, w: &Window<K>, key: &K) -> Option<&V> {
        if !self.in_window(w, key) {
            return None;
        }
        self.get(key)
    }

    // ---- range views ----

    /// The window `[lo, hi]` with the given bound kinds. `lo > hi` is an
    /// illegal-argument error.
    pub fn range(&self, lo: Bound<K>, hi: Bound<K>) -> Result<SubMap<'_, K, V, C>> {
        let window = self.window_new(lo, hi)?;
        Ok(SubMap { map: self, window })
    }

    pub fn range_mut(&mut self, lo: Bound<K>, hi: Bound<K>) -> Result<SubMapMut<'_, K, V, C>> {
        let window = self.window_new(lo, hi)?;
        Ok(SubMapMut { map: self, window })
    }

    pub fn sub_map(
        &self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<SubMap<'_, K, V, C>> {
        let (lo, hi) = bounds(from, from_inclusive, to, to_inclusive);
        self.range(lo, hi)
    }

    pub fn head_map(&self, to: K, inclusive: bool) -> SubMap<'_, K, V, C> {
        SubMap {
            map: self,
            window: Window {
                lo: Unbounded,
                hi: bound(to, inclusive),
            },
        }
    }

    pub fn tail_map(&self, from: K, inclusive: bool) -> SubMap<'_, K, V, C> {
        SubMap {
            map: self,
            window: Window {
                lo: bound(from, inclusive),
                hi: Unbounded,
            },
        }
    }

    pub fn sub_map_mut(
        &mut self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>> {
        let (lo, hi) = bounds(from, from_inclusive, to, to_inclusive);
        self.range_mut(lo, hi)
    }

    pub fn head_map_mut(&mut self, to: K, inclusive: bool) -> SubMapMut<'_, K, V, C> {
        SubMapMut {
            map: self,
            window: Window {
                lo: Unbounded,
                hi: bound(to, inclusive),
            },
        }
    }

    pub fn tail_map_mut(&mut self, from: K, inclusive: bool) -> SubMapMut<'_, K, V, C> {
        SubMapMut {
            map: self,
            window: Window {
                lo: bound(from, inclusive),
                hi: Unbounded,
            },
        }
    }

    /// Copies `source` into a new map ordered by `comparator`.
    pub fn from_map<M>(source: &M, comparator: C) -> Self
    where
        M: Map<Key = K, Value = V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        let mut map = Self::with_comparator(comparator);
        for (k, v) in source.iter() {
            map.insert(k.clone(), v.clone());
        }
        map
    }
}

/// In-order iterator over a map or a window of it, in either direction.
pub struct Iter<'a, K, V> {
    tree: &'a RbTree<K, V>,
    next: Option<NodeId>,
    // Final node to yield; the far end of the map or window.
    last: Option<NodeId>,
    direction: Direction,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let n = self.tree.node(id)?;
        self.next = if Some(id) == self.last {
            None
        } else {
            self.tree.step(id, self.direction)
        };
        Some((&n.key, &n.value))
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            next: self.next,
            last: self.last,
            direction: self.direction,
        }
    }
}

pub struct IterMut<'a, K, V> {
    order: std::vec::IntoIter<NodeId>,
    refs: SecondaryMap<NodeId, (&'a K, &'a mut V)>,
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

/// Owning iterator in key order.
pub struct IntoIter<K, V> {
    inner: tree::IntoEntries<K, V>,
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

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V, C> IntoIterator for TreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.tree.into_entries(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> FromIterator<(K, V)> for TreeMap<K, V, C>
where
    C: Comparator<K> + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Comparator<K>> Map for TreeMap<K, V, C> {
    type Key = K;
    type Value = V;
    type Iter<'a> = Iter<'a, K, V> where Self: 'a;

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn get(&self, key: &K) -> Option<&V> {
        TreeMap::get(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        TreeMap::contains_key(self, key)
    }

    fn iter(&self) -> Iter<'_, K, V> {
        TreeMap::iter(self)
    }

    fn mod_count(&self) -> u64 {
        self.tree.mod_count()
    }
}

impl<K, V, C: Comparator<K>> MapMut for TreeMap<K, V, C> {
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.insert(key, value))
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(TreeMap::remove(self, key))
    }

    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&K, &V) -> bool,
    ) -> Result<Option<(K, V)>> {
        let mut cur = self.tree.first();
        while let Some(id) = cur {
            let Some(n) = self.tree.node(id) else {
                break;
            };
            if pred(&n.key, &n.value) {
                return Ok(self.tree.remove_id(id));
            }
            cur = self.tree.successor(id);
        }
        Ok(None)
    }

    fn clear(&mut self) -> Result<()> {
        TreeMap::clear(self);
        Ok(())
    }
}

impl<K, V, C: Comparator<K>> SequencedMap for TreeMap<K, V, C> {
    fn entries_in(&self, direction: Direction) -> Iter<'_, K, V> {
        self.iter_in(direction)
    }
}

/// Position is decided by the comparator, so endpoint insertion is refused.
impl<K, V, C: Comparator<K>> SequencedMapMut for TreeMap<K, V, C> {
    fn put_first(&mut self, _key: K, _value: V) -> Result<Option<V>> {
        Err(CollectionError::unsupported("put_first on a sorted map"))
    }

    fn put_last(&mut self, _key: K, _value: V) -> Result<Option<V>> {
        Err(CollectionError::unsupported("put_last on a sorted map"))
    }

    fn poll_first_entry(&mut self) -> Option<(K, V)> {
        TreeMap::poll_first_entry(self)
    }

    fn poll_last_entry(&mut self) -> Option<(K, V)> {
        TreeMap::poll_last_entry(self)
    }
}

impl<K, V, C: Comparator<K>> NavigableMap for TreeMap<K, V, C> {
    fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
        TreeMap::lower_entry(self, key)
    }

    fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
        TreeMap::floor_entry(self, key)
    }

    fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
        TreeMap::ceiling_entry(self, key)
    }

    fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
        TreeMap::higher_entry(self, key)
    }
}

impl<K, V, C> Traverse for TreeMap<K, V, C> {
    type Id = NodeId;
    type Item<'a> = (&'a K, &'a V) where Self: 'a;
    type Owned = (K, V);

    fn instance_id(&self) -> u64 {
        self.instance.get()
    }

    fn traverse_mod_count(&self) -> u64 {
        self.tree.mod_count()
    }

    fn first_id(&self, direction: Direction) -> Option<NodeId> {
        self.tree.end(direction)
    }

    fn next_id(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.tree.step(id, direction)
    }

    fn item(&self, id: NodeId) -> Option<(&K, &V)> {
        self.entry(Some(id))
    }

    fn remove_id(&mut self, id: NodeId) -> Option<(K, V)> {
        self.tree.remove_id(id)
    }
}

impl<K, V, C, M> PartialEq<M> for TreeMap<K, V, C>
where
    C: Comparator<K>,
    V: PartialEq,
    M: Map<Key = K, Value = V>,
{
    fn eq(&self, other: &M) -> bool {
        contract::maps_equal(self, other)
    }
}

impl<K, V: Eq, C: Comparator<K>> Eq for TreeMap<K, V, C> {}

impl<K: Hash, V: Hash, C> Hash for TreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::map_hash_code(self.iter()));
    }
}

impl<K: Debug, V: Debug, C> Debug for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Display, V: Display, C> Display for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_map(f, self.iter())
    }
}

// ---- range views ----

/// Read-only window onto a [`TreeMap`].
pub struct SubMap<'a, K, V, C = Natural> {
    map: &'a TreeMap<K, V, C>,
    window: Window<K>,
}

/// Mutable window onto a [`TreeMap`].
pub struct SubMapMut<'a, K, V, C = Natural> {
    map: &'a mut TreeMap<K, V, C>,
    window: Window<K>,
}

macro_rules! window_reads {
    () => {
        pub fn window(&self) -> &Window<K> {
            &self.window
        }

        /// Counts the entries in the window; O(entries in window).
        pub fn len(&self) -> usize {
            self.map.iter_window(&self.window, Direction::Forward).count()
        }

        pub fn is_empty(&self) -> bool {
            self.map.lowest_in(&self.window).is_none()
        }

        pub fn in_range(&self, key: &K) -> bool {
            self.map.in_window(&self.window, key)
        }

        pub fn get(&self, key: &K) -> Option<&V> {
            self.map.get_in(&self.window, key)
        }

        pub fn contains_key(&self, key: &K) -> bool {
            self.get(key).is_some()
        }

        pub fn iter(&self) -> Iter<'_, K, V> {
            self.map.iter_window(&self.window, Direction::Forward)
        }

        pub fn iter_in(&self, direction: Direction) -> Iter<'_, K, V> {
            self.map.iter_window(&self.window, direction)
        }

        pub fn first_entry(&self) -> Option<(&K, &V)> {
            self.map.entry(self.map.lowest_in(&self.window))
        }

        pub fn last_entry(&self) -> Option<(&K, &V)> {
            self.map.entry(self.map.highest_in(&self.window))
        }

        /// Not-found on an empty window.
        pub fn first_key(&self) -> Result<&K> {
            self.first_entry()
                .map(|(k, _)| k)
                .ok_or(CollectionError::NoSuchElement)
        }

        pub fn last_key(&self) -> Result<&K> {
            self.last_entry()
                .map(|(k, _)| k)
                .ok_or(CollectionError::NoSuchElement)
        }

        pub fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
            self.map.entry(self.map.below_in(&self.window, key, false))
        }

        pub fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
            self.map.entry(self.map.below_in(&self.window, key, true))
        }

        pub fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
            self.map.entry(self.map.above_in(&self.window, key, true))
        }

        pub fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
            self.map.entry(self.map.above_in(&self.window, key, false))
        }

        /// A nested read-only window; its bounds must lie inside this one.
        pub fn sub_map(
            &self,
            from: K,
            from_inclusive: bool,
            to: K,
            to_inclusive: bool,
        ) -> Result<SubMap<'_, K, V, C>>
        where
            K: Clone,
        {
            let (lo, hi) = bounds(from, from_inclusive, to, to_inclusive);
            self.narrowed(lo, hi)
        }

        pub fn head_map(&self, to: K, inclusive: bool) -> Result<SubMap<'_, K, V, C>>
        where
            K: Clone,
        {
            self.narrowed(Unbounded, bound(to, inclusive))
        }

        pub fn tail_map(&self, from: K, inclusive: bool) -> Result<SubMap<'_, K, V, C>>
        where
            K: Clone,
        {
            self.narrowed(bound(from, inclusive), Unbounded)
        }

        fn narrowed(&self, lo: Bound<K>, hi: Bound<K>) -> Result<SubMap<'_, K, V, C>>
        where
            K: Clone,
        {
            let window = self.map.window_narrow(&self.window, lo, hi)?;
            Ok(SubMap {
                map: &*self.map,
                window,
            })
        }

        pub fn descending_map(&self) -> Reversed<&Self> {
            Reversed::new(self)
        }
    };
}

impl<'a, K, V, C: Comparator<K>> SubMap<'a, K, V, C> {
    window_reads!();

    pub fn backing(&self) -> &'a TreeMap<K, V, C> {
        self.map
    }
}

impl<'a, K, V, C: Comparator<K>> SubMapMut<'a, K, V, C> {
    window_reads!();

    pub fn backing(&self) -> &TreeMap<K, V, C> {
        &*self.map
    }

    /// The whole backing map. Changes made through it are visible to this
    /// window afterwards.
    pub fn backing_mut(&mut self) -> &mut TreeMap<K, V, C> {
        &mut *self.map
    }

    /// Inserting a key outside the window is an illegal-argument error.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if !self.in_range(&key) {
            return Err(CollectionError::illegal_argument("key out of range"));
        }
        Ok(self.map.insert(key, value))
    }

    /// Keys outside the window are left alone.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        if !self.in_range(key) {
            return None;
        }
        self.map.remove(key)
    }

    pub fn poll_first_entry(&mut self) -> Option<(K, V)> {
        let id = self.map.lowest_in(&self.window);
        self.map.take(id)
    }

    pub fn poll_last_entry(&mut self) -> Option<(K, V)> {
        let id = self.map.highest_in(&self.window);
        self.map.take(id)
    }

    /// Removes every entry in the window.
    pub fn clear(&mut self) {
        while self.poll_first_entry().is_some() {}
    }

    pub fn sub_map_mut(
        &mut self,
        from: K,
        from_inclusive: bool,
        to: K,
        to_inclusive: bool,
    ) -> Result<SubMapMut<'_, K, V, C>>
    where
        K: Clone,
    {
        let (lo, hi) = bounds(from, from_inclusive, to, to_inclusive);
        let window = self.map.window_narrow(&self.window, lo, hi)?;
        Ok(SubMapMut {
            map: &mut *self.map,
            window,
        })
    }

    pub fn descending_map_mut(&mut self) -> Reversed<&mut Self> {
        Reversed::new(self)
    }
}

macro_rules! window_traits {
    ($view:ident) => {
        impl<'a, K, V, C: Comparator<K>> Map for $view<'a, K, V, C> {
            type Key = K;
            type Value = V;
            type Iter<'b> = Iter<'b, K, V> where Self: 'b;

            fn len(&self) -> usize {
                $view::len(self)
            }

            fn get(&self, key: &K) -> Option<&V> {
                $view::get(self, key)
            }

            fn iter(&self) -> Iter<'_, K, V> {
                $view::iter(self)
            }

            fn mod_count(&self) -> u64 {
                self.map.mod_count()
            }
        }

        impl<'a, K, V, C: Comparator<K>> SequencedMap for $view<'a, K, V, C> {
            fn entries_in(&self, direction: Direction) -> Iter<'_, K, V> {
                self.iter_in(direction)
            }
        }

        impl<'a, K, V, C: Comparator<K>> NavigableMap for $view<'a, K, V, C> {
            fn lower_entry(&self, key: &K) -> Option<(&K, &V)> {
                $view::lower_entry(self, key)
            }

            fn floor_entry(&self, key: &K) -> Option<(&K, &V)> {
                $view::floor_entry(self, key)
            }

            fn ceiling_entry(&self, key: &K) -> Option<(&K, &V)> {
                $view::ceiling_entry(self, key)
            }

            fn higher_entry(&self, key: &K) -> Option<(&K, &V)> {
                $view::higher_entry(self, key)
            }
        }

        impl<'a, K: Debug, V: Debug, C: Comparator<K>> Debug for $view<'a, K, V, C> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_map().entries(self.iter()).finish()
            }
        }

        impl<'a, K: Display, V: Display, C: Comparator<K>> Display for $view<'a, K, V, C> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                contract::fmt_map(f, self.iter())
            }
        }
    };
}

window_traits!(SubMap);
window_traits!(SubMapMut);

impl<'a, K, V, C: Comparator<K>> MapMut for SubMapMut<'a, K, V, C> {
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.insert(key, value)
    }

    fn remove(&mut self, key: &K) -> Result<Option<V>> {
        Ok(SubMapMut::remove(self, key))
    }

    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&K, &V) -> bool,
    ) -> Result<Option<(K, V)>> {
        let mut cur = self.map.lowest_in(&self.window);
        let last = self.map.highest_in(&self.window);
        while let Some(id) = cur {
            let Some(n) = self.map.tree.node(id) else {
                break;
            };
            if pred(&n.key, &n.value) {
                return Ok(self.map.tree.remove_id(id));
            }
            cur = if cur == last {
                None
            } else {
                self.map.tree.successor(id)
            };
        }
        Ok(None)
    }

    fn clear(&mut self) -> Result<()> {
        SubMapMut::clear(self);
        Ok(())
    }
}

impl<'a, K, V, C: Comparator<K>> SequencedMapMut for SubMapMut<'a, K, V, C> {
    fn put_first(&mut self, _key: K, _value: V) -> Result<Option<V>> {
        Err(CollectionError::unsupported("put_first on a sorted map"))
    }

    fn put_last(&mut self, _key: K, _value: V) -> Result<Option<V>> {
        Err(CollectionError::unsupported("put_last on a sorted map"))
    }

    fn poll_first_entry(&mut self) -> Option<(K, V)> {
        SubMapMut::poll_first_entry(self)
    }

    fn poll_last_entry(&mut self) -> Option<(K, V)> {
        SubMapMut::poll_last_entry(self)
    }
}

#[cfg(test)]
impl<K, V, C: Comparator<K>> TreeMap<K, V, C> {
    pub(crate) fn assert_invariants(&self) {
        let cmp = &self.comparator;
        self.tree.assert_invariants(|a, b| cmp.compare(a, b));
    }
}

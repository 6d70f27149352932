//! TreeSet: a sorted set over `TreeMap<T, ()>`, with range windows.

use core::borrow::Borrow;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Bound;

use crate::comparator::{Comparator, Natural};
use crate::contract;
use crate::cursor::{Cursor, Traverse};
use crate::error::{CollectionError, Result};
use crate::reversed::Reversed;
use crate::traits::{
    Collection, CollectionMut, Direction, NavigableSet, SequencedCollection,
    SequencedCollectionMut,
};
use crate::tree::NodeId;
use crate::tree_map::{self, SubMap, SubMapMut, TreeMap};

#[derive(Clone)]
pub struct TreeSet<T, C = Natural> {
    map: TreeMap<T, (), C>,
}

impl<T: Ord> TreeSet<T> {
    pub fn new() -> Self {
        TreeSet {
            map: TreeMap::new(),
        }
    }
}

impl<T: Ord> Default for TreeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn key<'a, T>(entry: Option<(&'a T, &'a ())>) -> Option<&'a T> {
    entry.map(|(k, _)| k)
}

impl<T, C> TreeSet<T, C> {
    pub fn with_comparator(comparator: C) -> Self {
        TreeSet {
            map: TreeMap::with_comparator(comparator),
        }
    }

    pub fn comparator(&self) -> &C {
        self.map.comparator()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_in(Direction::Forward)
    }

    pub fn iter_in(&self, direction: Direction) -> Iter<'_, T> {
        Iter {
            inner: self.map.iter_in(direction),
        }
    }

    /// Not-found on an empty set.
    pub fn first(&self) -> Result<&T> {
        self.map.first_key()
    }

    pub fn last(&self) -> Result<&T> {
        self.map.last_key()
    }

    pub fn poll_first(&mut self) -> Option<T> {
        self.map.poll_first_entry().map(|(k, _)| k)
    }

    pub fn poll_last(&mut self) -> Option<T> {
        self.map.poll_last_entry().map(|(k, _)| k)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.map.retain(|k, _| keep(k));
    }

    pub fn cursor(&self, direction: Direction) -> Cursor<NodeId> {
        Cursor::new(self, direction)
    }

    pub fn descending_set(&self) -> Reversed<&Self> {
        Reversed::new(self)
    }

    pub fn descending_set_mut(&mut self) -> Reversed<&mut Self> {
        Reversed::new(self)
    }
}

impl<T, C: Comparator<T>> TreeSet<T, C> {
    /// Builds from strictly increasing elements in linear time.
    pub fn from_sorted<I>(items: I, comparator: C) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        Ok(TreeSet {
            map: TreeMap::from_sorted(items.into_iter().map(|t| (t, ())), comparator)?,
        })
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.contains_key(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        key(self.map.get_key_value(q))
    }

    /// An element the comparator considers equal keeps its place.
    pub fn insert(&mut self, item: T) -> bool {
        if self.map.contains_key(&item) {
            return false;
        }
        self.map.insert(item, ());
        true
    }

    /// Inserts, swapping out an equal element if there is one.
    pub fn replace(&mut self, item: T) -> Option<T> {
        let old = self.map.remove_entry(&item).map(|(k, _)| k);
        self.map.insert(item, ());
        old
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.remove_entry(q).is_some()
    }

    pub fn take<Q>(&mut self, q: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.remove_entry(q).map(|(k, _)| k)
    }

    pub fn lower<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.lower_key(q)
    }

    pub fn floor<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.floor_key(q)
    }

    pub fn ceiling<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.ceiling_key(q)
    }

    pub fn higher<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Comparator<Q>,
        Q: ?Sized,
    {
        self.map.higher_key(q)
    }

    pub fn range(&self, lo: Bound<T>, hi: Bound<T>) -> Result<SubSet<'_, T, C>> {
        Ok(SubSet {
            map: self.map.range(lo, hi)?,
        })
    }

    pub fn range_mut(&mut self, lo: Bound<T>, hi: Bound<T>) -> Result<SubSetMut<'_, T, C>> {
        Ok(SubSetMut {
            map: self.map.range_mut(lo, hi)?,
        })
    }

    pub fn sub_set(
        &self,
        from: T,
        from_inclusive: bool,
        to: T,
        to_inclusive: bool,
    ) -> Result<SubSet<'_, T, C>> {
        Ok(SubSet {
            map: self.map.sub_map(from, from_inclusive, to, to_inclusive)?,
        })
    }

    pub fn head_set(&self, to: T, inclusive: bool) -> SubSet<'_, T, C> {
        SubSet {
            map: self.map.head_map(to, inclusive),
        }
    }

    pub fn tail_set(&self, from: T, inclusive: bool) -> SubSet<'_, T, C> {
        SubSet {
            map: self.map.tail_map(from, inclusive),
        }
    }

    pub fn sub_set_mut(
        &mut self,
        from: T,
        from_inclusive: bool,
        to: T,
        to_inclusive: bool,
    ) -> Result<SubSetMut<'_, T, C>> {
        Ok(SubSetMut {
            map: self.map.sub_map_mut(from, from_inclusive, to, to_inclusive)?,
        })
    }

    pub fn head_set_mut(&mut self, to: T, inclusive: bool) -> SubSetMut<'_, T, C> {
        SubSetMut {
            map: self.map.head_map_mut(to, inclusive),
        }
    }

    pub fn tail_set_mut(&mut self, from: T, inclusive: bool) -> SubSetMut<'_, T, C> {
        SubSetMut {
            map: self.map.tail_map_mut(from, inclusive),
        }
    }

    pub fn from_collection<S>(source: &S, comparator: C) -> Self
    where
        S: Collection<Item = T> + ?Sized,
        T: Clone,
    {
        let mut set = Self::with_comparator(comparator);
        for item in source.iter() {
            set.insert(item.clone());
        }
        set
    }
}

/// In-order iterator over a set or a window of it.
pub struct Iter<'a, T> {
    inner: tree_map::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a TreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

pub struct IntoIter<T> {
    inner: tree_map::IntoIter<T, ()>,
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

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<T, C> IntoIterator for TreeSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for TreeSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::with_comparator(C::default());
        set.extend(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for TreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T, C: Comparator<T>> Collection for TreeSet<T, C> {
    type Item = T;
    type Iter<'a> = Iter<'a, T> where Self: 'a;

    fn len(&self) -> usize {
        self.map.len()
    }

    fn contains(&self, item: &T) -> bool {
        TreeSet::contains(self, item)
    }

    fn iter(&self) -> Iter<'_, T> {
        TreeSet::iter(self)
    }

    fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }
}

impl<T, C: Comparator<T>> CollectionMut for TreeSet<T, C> {
    fn add(&mut self, item: T) -> Result<bool> {
        Ok(self.insert(item))
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(TreeSet::remove(self, item))
    }

    fn clear(&mut self) -> Result<()> {
        TreeSet::clear(self);
        Ok(())
    }
}

impl<T, C: Comparator<T>> SequencedCollection for TreeSet<T, C> {
    fn iter_in(&self, direction: Direction) -> Iter<'_, T> {
        TreeSet::iter_in(self, direction)
    }
}

/// Sorted: endpoint insertion is refused.
impl<T, C: Comparator<T>> SequencedCollectionMut for TreeSet<T, C> {
    fn add_first(&mut self, _item: T) -> Result<()> {
        Err(CollectionError::unsupported("add_first on a sorted set"))
    }

    fn add_last(&mut self, _item: T) -> Result<()> {
        Err(CollectionError::unsupported("add_last on a sorted set"))
    }

    fn poll_first(&mut self) -> Option<T> {
        TreeSet::poll_first(self)
    }

    fn poll_last(&mut self) -> Option<T> {
        TreeSet::poll_last(self)
    }
}

impl<T, C: Comparator<T>> NavigableSet for TreeSet<T, C> {
    fn lower(&self, item: &T) -> Option<&T> {
        TreeSet::lower(self, item)
    }

    fn floor(&self, item: &T) -> Option<&T> {
        TreeSet::floor(self, item)
    }

    fn ceiling(&self, item: &T) -> Option<&T> {
        TreeSet::ceiling(self, item)
    }

    fn higher(&self, item: &T) -> Option<&T> {
        TreeSet::higher(self, item)
    }

    fn first(&self) -> Result<&T> {
        TreeSet::first(self)
    }

    fn last(&self) -> Result<&T> {
        TreeSet::last(self)
    }
}

impl<T, C> Traverse for TreeSet<T, C> {
    type Id = NodeId;
    type Item<'a> = &'a T where Self: 'a;
    type Owned = T;

    fn instance_id(&self) -> u64 {
        self.map.instance_id()
    }

    fn traverse_mod_count(&self) -> u64 {
        self.map.traverse_mod_count()
    }

    fn first_id(&self, direction: Direction) -> Option<NodeId> {
        self.map.first_id(direction)
    }

    fn next_id(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.map.next_id(id, direction)
    }

    fn item(&self, id: NodeId) -> Option<&T> {
        self.map.item(id).map(|(k, _)| k)
    }

    fn remove_id(&mut self, id: NodeId) -> Option<T> {
        self.map.remove_id(id).map(|(k, _)| k)
    }
}

impl<T, C, S> PartialEq<S> for TreeSet<T, C>
where
    C: Comparator<T>,
    S: Collection<Item = T>,
{
    fn eq(&self, other: &S) -> bool {
        contract::sets_equal(self, other)
    }
}

impl<T, C: Comparator<T>> Eq for TreeSet<T, C> {}

impl<T: Hash, C> Hash for TreeSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::set_hash_code(self.iter()));
    }
}

impl<T: Debug, C> Debug for TreeSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Display, C> Display for TreeSet<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_seq(f, self.iter())
    }
}

// ---- range views ----

/// Read-only window onto a [`TreeSet`].
pub struct SubSet<'a, T, C = Natural> {
    map: SubMap<'a, T, (), C>,
}

/// Mutable window onto a [`TreeSet`]. Adding outside the window is an
/// illegal-argument error; removing outside it does nothing.
pub struct SubSetMut<'a, T, C = Natural> {
    map: SubMapMut<'a, T, (), C>,
}

macro_rules! set_window_reads {
    () => {
        pub fn len(&self) -> usize {
            self.map.len()
        }

        pub fn is_empty(&self) -> bool {
            self.map.is_empty()
        }

        pub fn contains(&self, item: &T) -> bool {
            self.map.contains_key(item)
        }

        pub fn iter(&self) -> Iter<'_, T> {
            Iter {
                inner: self.map.iter(),
            }
        }

        pub fn iter_in(&self, direction: Direction) -> Iter<'_, T> {
            Iter {
                inner: self.map.iter_in(direction),
            }
        }

        pub fn first(&self) -> Result<&T> {
            self.map.first_key()
        }

        pub fn last(&self) -> Result<&T> {
            self.map.last_key()
        }

        pub fn lower(&self, item: &T) -> Option<&T> {
            key(self.map.lower_entry(item))
        }

        pub fn floor(&self, item: &T) -> Option<&T> {
            key(self.map.floor_entry(item))
        }

        pub fn ceiling(&self, item: &T) -> Option<&T> {
            key(self.map.ceiling_entry(item))
        }

        pub fn higher(&self, item: &T) -> Option<&T> {
            key(self.map.higher_entry(item))
        }

        pub fn sub_set(
            &self,
            from: T,
            from_inclusive: bool,
            to: T,
            to_inclusive: bool,
        ) -> Result<SubSet<'_, T, C>>
        where
            T: Clone,
        {
            Ok(SubSet {
                map: self.map.sub_map(from, from_inclusive, to, to_inclusive)?,
            })
        }

        pub fn head_set(&self, to: T, inclusive: bool) -> Result<SubSet<'_, T, C>>
        where
            T: Clone,
        {
            Ok(SubSet {
                map: self.map.head_map(to, inclusive)?,
            })
        }

        pub fn tail_set(&self, from: T, inclusive: bool) -> Result<SubSet<'_, T, C>>
        where
            T: Clone,
        {
            Ok(SubSet {
                map: self.map.tail_map(from, inclusive)?,
            })
        }

        pub fn descending_set(&self) -> Reversed<&Self> {
            Reversed::new(self)
        }
    };
}

impl<'a, T, C: Comparator<T>> SubSet<'a, T, C> {
    set_window_reads!();
}

impl<'a, T, C: Comparator<T>> SubSetMut<'a, T, C> {
    set_window_reads!();

    pub fn insert(&mut self, item: T) -> Result<bool> {
        if self.map.contains_key(&item) {
            return Ok(false);
        }
        self.map.insert(item, ()).map(|_| true)
    }

    pub fn remove(&mut self, item: &T) -> bool {
        self.map.remove(item).is_some()
    }

    pub fn poll_first(&mut self) -> Option<T> {
        self.map.poll_first_entry().map(|(k, _)| k)
    }

    pub fn poll_last(&mut self) -> Option<T> {
        self.map.poll_last_entry().map(|(k, _)| k)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn backing_mut(&mut self) -> &mut TreeMap<T, (), C> {
        self.map.backing_mut()
    }
}

macro_rules! set_window_traits {
    ($view:ident) => {
        impl<'a, T, C: Comparator<T>> Collection for $view<'a, T, C> {
            type Item = T;
            type Iter<'b> = Iter<'b, T> where Self: 'b;

            fn len(&self) -> usize {
                $view::len(self)
            }

            fn contains(&self, item: &T) -> bool {
                $view::contains(self, item)
            }

            fn iter(&self) -> Iter<'_, T> {
                $view::iter(self)
            }

            fn mod_count(&self) -> u64 {
                self.map.backing().mod_count()
            }
        }

        impl<'a, T, C: Comparator<T>> SequencedCollection for $view<'a, T, C> {
            fn iter_in(&self, direction: Direction) -> Iter<'_, T> {
                $view::iter_in(self, direction)
            }
        }

        impl<'a, T, C: Comparator<T>> NavigableSet for $view<'a, T, C> {
            fn lower(&self, item: &T) -> Option<&T> {
                $view::lower(self, item)
            }

            fn floor(&self, item: &T) -> Option<&T> {
                $view::floor(self, item)
            }

            fn ceiling(&self, item: &T) -> Option<&T> {
                $view::ceiling(self, item)
            }

            fn higher(&self, item: &T) -> Option<&T> {
                $view::higher(self, item)
            }
        }

        impl<'a, T: Debug, C: Comparator<T>> Debug for $view<'a, T, C> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        impl<'a, T: Display, C: Comparator<T>> Display for $view<'a, T, C> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                contract::fmt_seq(f, self.iter())
            }
        }
    };
}

set_window_traits!(SubSet);
set_window_traits!(SubSetMut);

impl<'a, T, C: Comparator<T>> CollectionMut for SubSetMut<'a, T, C> {
    fn add(&mut self, item: T) -> Result<bool> {
        self.insert(item)
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(SubSetMut::remove(self, item))
    }

    fn clear(&mut self) -> Result<()> {
        SubSetMut::clear(self);
        Ok(())
    }
}

impl<'a, T, C: Comparator<T>> SequencedCollectionMut for SubSetMut<'a, T, C> {
    fn add_first(&mut self, _item: T) -> Result<()> {
        Err(CollectionError::unsupported("add_first on a sorted set"))
    }

    fn add_last(&mut self, _item: T) -> Result<()> {
        Err(CollectionError::unsupported("add_last on a sorted set"))
    }

    fn poll_first(&mut self) -> Option<T> {
        SubSetMut::poll_first(self)
    }

    fn poll_last(&mut self) -> Option<T> {
        SubSetMut::poll_last(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::by_key;

    fn set(items: &[i32]) -> TreeSet<i32> {
        items.iter().copied().collect()
    }

    fn items<'a>(it: impl Iterator<Item = &'a i32>) -> Vec<i32> {
        it.copied().collect()
    }

    #[test]
    fn empty_set_boundaries() {
        let mut s: TreeSet<i32> = TreeSet::new();
        assert_eq!(s.poll_first(), None);
        assert_eq!(s.first(), Err(CollectionError::NoSuchElement));
        assert_eq!(s.last(), Err(CollectionError::NoSuchElement));
    }

    #[test]
    fn sorted_regardless_of_insertion_order() {
        let s = set(&[5, 1, 4, 2, 3, 1]);
        assert_eq!(items(s.iter()), [1, 2, 3, 4, 5]);
        assert_eq!(items(s.iter_in(Direction::Backward)), [5, 4, 3, 2, 1]);
        assert_eq!(s.len(), 5);
    }

    #[test]
    fn comparator_equality_decides_membership() {
        let mut s = TreeSet::with_comparator(by_key(|w: &&str| w.len()));
        assert!(s.insert("aa"));
        assert!(!s.insert("bb"));
        assert_eq!(s.get(&"zz"), Some(&"aa"));
        assert_eq!(s.replace("cc"), Some("aa"));
        assert_eq!(s.get(&"zz"), Some(&"cc"));
    }

    #[test]
    fn windows_and_navigation() {
        let s = set(&[1, 3, 5, 7, 9]);
        let head = s.head_set(5, false);
        assert_eq!(items(head.iter()), [1, 3]);
        assert_eq!(head.ceiling(&4), None);
        assert_eq!(head.floor(&100), Some(&3));
        let tail = s.tail_set(5, true);
        assert_eq!(tail.first(), Ok(&5));
        assert!(tail.head_set(3, true).is_err());
        assert_eq!(s.lower(&1), None);
        assert_eq!(s.higher(&8), Some(&9));
    }

    #[test]
    fn mutable_window() {
        let mut s = set(&[1, 3, 5, 7, 9]);
        let mut mid = s.sub_set_mut(2, true, 8, true).unwrap();
        assert!(mid.insert(0).is_err());
        assert_eq!(mid.insert(4), Ok(true));
        assert!(!mid.remove(&9));
        assert_eq!(mid.poll_first(), Some(3));
        assert_eq!(items(mid.iter()), [4, 5, 7]);
        mid.clear();
        assert_eq!(items(s.iter()), [1, 9]);
    }

    #[test]
    fn descending_set_swaps_ends() {
        let mut s = set(&[1, 2, 3]);
        {
            let mut d = s.descending_set_mut();
            assert_eq!(d.poll_first(), Some(3));
            assert_eq!(d.higher(&2), Some(&1));
            assert!(d.add_first(0).is_err());
        }
        assert_eq!(items(s.descending_set().iter()), [2, 1]);
    }

    #[test]
    fn equal_across_implementations() {
        let s = set(&[1, 2, 3]);
        let h: crate::hash_set::HashSet<i32> = [3, 2, 1].into_iter().collect();
        assert_eq!(s, h);
        assert_eq!(s.to_string(), "[1, 2, 3]");
    }
}

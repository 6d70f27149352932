//! LinkedHashSet: an insertion-ordered set over `LinkedHashMap<T, ()>`.

use core::borrow::Borrow;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{BuildHasher, Hash, Hasher};
use core::iter::FusedIterator;

use hashbrown::hash_map::DefaultHashBuilder;

use crate::config::{LinkOrder, TableConfig};
use crate::contract;
use crate::cursor::{Cursor, Traverse};
use crate::error::{CollectionError, Result};
use crate::hash_table::EntryId;
use crate::linked_hash_map::{self, LinkedHashMap};
use crate::reversed::Reversed;
use crate::traits::{
    Collection, CollectionMut, Direction, SequencedCollection, SequencedCollectionMut,
};

#[derive(Clone)]
pub struct LinkedHashSet<T, S = DefaultHashBuilder> {
    map: LinkedHashMap<T, (), S>,
}

impl<T> LinkedHashSet<T> {
    pub fn new() -> Self {
        Self {
            map: LinkedHashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: LinkedHashMap::with_capacity(capacity),
        }
    }

    pub fn with_config(config: TableConfig) -> Result<Self> {
        Ok(Self {
            map: LinkedHashMap::with_config(config, LinkOrder::Insertion)?,
        })
    }
}

impl<T> Default for LinkedHashSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> LinkedHashSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: LinkedHashMap::with_hasher(hasher),
        }
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

    pub fn first(&self) -> Option<&T> {
        self.map.first_entry().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&T> {
        self.map.last_entry().map(|(k, _)| k)
    }

    /// Not-found on an empty set.
    pub fn get_first(&self) -> Result<&T> {
        self.first().ok_or(CollectionError::NoSuchElement)
    }

    pub fn get_last(&self) -> Result<&T> {
        self.last().ok_or(CollectionError::NoSuchElement)
    }

    pub fn poll_first(&mut self) -> Option<T> {
        self.map.poll_first_entry().map(|(k, _)| k)
    }

    pub fn poll_last(&mut self) -> Option<T> {
        self.map.poll_last_entry().map(|(k, _)| k)
    }

    pub fn remove_first(&mut self) -> Result<T> {
        self.poll_first().ok_or(CollectionError::NoSuchElement)
    }

    pub fn remove_last(&mut self) -> Result<T> {
        self.poll_last().ok_or(CollectionError::NoSuchElement)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.map.retain(|k, _| keep(k));
    }

    pub fn cursor(&self, direction: Direction) -> Cursor<EntryId> {
        Cursor::new(self, direction)
    }

    pub fn reversed(&self) -> Reversed<&Self> {
        Reversed::new(self)
    }

    pub fn reversed_mut(&mut self) -> Reversed<&mut Self> {
        Reversed::new(self)
    }
}

impl<T, S> LinkedHashSet<T, S>
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

    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get_key_value(q).map(|(k, _)| k)
    }

    /// Appends a new element; an element already present keeps its place.
    pub fn insert(&mut self, item: T) -> bool {
        if self.map.contains_key(&item) {
            return false;
        }
        self.map.insert(item, ());
        true
    }

    /// Adds at the head, moving the element there if already present.
    pub fn add_first(&mut self, item: T) {
        self.map.put_first(item, ());
    }

    /// Adds at the tail, moving the element there if already present.
    pub fn add_last(&mut self, item: T) {
        self.map.put_last(item, ());
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

    /// Copies `source` in its iteration order.
    pub fn from_collection<C>(source: &C) -> Self
    where
        C: Collection<Item = T> + ?Sized,
        T: Clone,
        S: Default,
    {
        let mut set = Self::with_hasher(S::default());
        set.reserve(source.len());
        for item in source.iter() {
            set.insert(item.clone());
        }
        set
    }
}

pub struct Iter<'a, T> {
    inner: linked_hash_map::Iter<'a, T, ()>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, S> IntoIterator for &'a LinkedHashSet<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

pub struct IntoIter<T> {
    inner: linked_hash_map::IntoIter<T, ()>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(k, _)| k)
    }
}

impl<T, S> IntoIterator for LinkedHashSet<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_iter(),
        }
    }
}

impl<T, S> FromIterator<T> for LinkedHashSet<T, S>
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

impl<T, S> Extend<T> for LinkedHashSet<T, S>
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

impl<T, S> Collection for LinkedHashSet<T, S>
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
        LinkedHashSet::contains(self, item)
    }

    fn iter(&self) -> Iter<'_, T> {
        LinkedHashSet::iter(self)
    }

    fn mod_count(&self) -> u64 {
        self.map.mod_count()
    }
}

impl<T, S> CollectionMut for LinkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn add(&mut self, item: T) -> Result<bool> {
        Ok(self.insert(item))
    }

    fn remove(&mut self, item: &T) -> Result<bool> {
        Ok(LinkedHashSet::remove(self, item))
    }

    fn clear(&mut self) -> Result<()> {
        LinkedHashSet::clear(self);
        Ok(())
    }
}

impl<T, S> SequencedCollection for LinkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn iter_in(&self, direction: Direction) -> Iter<'_, T> {
        LinkedHashSet::iter_in(self, direction)
    }
}

impl<T, S> SequencedCollectionMut for LinkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn add_first(&mut self, item: T) -> Result<()> {
        LinkedHashSet::add_first(self, item);
        Ok(())
    }

    fn add_last(&mut self, item: T) -> Result<()> {
        LinkedHashSet::add_last(self, item);
        Ok(())
    }

    fn poll_first(&mut self) -> Option<T> {
        LinkedHashSet::poll_first(self)
    }

    fn poll_last(&mut self) -> Option<T> {
        LinkedHashSet::poll_last(self)
    }
}

impl<T, S> Traverse for LinkedHashSet<T, S> {
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

impl<T, S, C> PartialEq<C> for LinkedHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
    C: Collection<Item = T>,
{
    fn eq(&self, other: &C) -> bool {
        contract::sets_equal(self, other)
    }
}

impl<T: Eq + Hash, S: BuildHasher> Eq for LinkedHashSet<T, S> {}

impl<T: Hash, S> Hash for LinkedHashSet<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(contract::set_hash_code(self.iter()));
    }
}

impl<T: Debug, S> Debug for LinkedHashSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Display, S> Display for LinkedHashSet<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        contract::fmt_seq(f, self.iter())
    }
}

//! `Reversed<S>`: the O(1) reverse-order view of any sequenced collection.
//!
//! A reversed view is the wrapped collection plus a flipped direction. It owns
//! nothing: wrap `&S` for a read-only view or `&mut S` for a mutable one, in
//! which case every mutation lands on the same underlying engine with "first"
//! and "last" swapped. Wrapping twice flips twice, and [`Reversed::reversed`]
//! hands back the original, so `x.reversed().reversed()` is `x` itself.

use core::fmt::{self, Debug, Formatter};

use crate::error::Result;
use crate::traits::{
    Collection, CollectionMut, Direction, Map, MapMut, NavigableMap, NavigableSet,
    SequencedCollection, SequencedCollectionMut, SequencedMap, SequencedMapMut,
};

#[derive(Clone, Copy)]
pub struct Reversed<S>(pub(crate) S);

impl<S> Reversed<S> {
    pub const fn new(inner: S) -> Self {
        Reversed(inner)
    }

    /// The reverse of a reversed view is the view it was made from.
    pub fn reversed(self) -> S {
        self.0
    }

    pub const fn inner(&self) -> &S {
        &self.0
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

impl<S: SequencedMap> Map for Reversed<S> {
    type Key = S::Key;
    type Value = S::Value;
    type Iter<'a> = S::Iter<'a> where Self: 'a;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
        self.0.get(key)
    }

    fn contains_key(&self, key: &Self::Key) -> bool {
        self.0.contains_key(key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.0.entries_in(Direction::Backward)
    }

    fn mod_count(&self) -> u64 {
        self.0.mod_count()
    }
}

impl<S: SequencedMap + MapMut> MapMut for Reversed<S> {
    fn put(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>> {
        self.0.put(key, value)
    }

    fn remove(&mut self, key: &Self::Key) -> Result<Option<Self::Value>> {
        MapMut::remove(&mut self.0, key)
    }

    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&Self::Key, &Self::Value) -> bool,
    ) -> Result<Option<(Self::Key, Self::Value)>> {
        // The first match in this view's order is the last match in the
        // underlying order, so `pred` runs twice per entry: once to count.
        let total = self
            .0
            .entries_in(Direction::Backward)
            .filter(|&(k, v)| pred(k, v))
            .count();
        if total == 0 {
            return Ok(None);
        }
        let mut seen = 0;
        self.0.remove_matching(&mut |k, v| {
            if pred(k, v) {
                seen += 1;
                return seen == total;
            }
            false
        })
    }

    fn clear(&mut self) -> Result<()> {
        MapMut::clear(&mut self.0)
    }
}

impl<S: SequencedMap> SequencedMap for Reversed<S> {
    fn entries_in(&self, direction: Direction) -> Self::Iter<'_> {
        self.0.entries_in(direction.flip())
    }
}

impl<S: SequencedMapMut> SequencedMapMut for Reversed<S> {
    fn put_first(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>> {
        self.0.put_last(key, value)
    }

    fn put_last(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>> {
        self.0.put_first(key, value)
    }

    fn poll_first_entry(&mut self) -> Option<(Self::Key, Self::Value)> {
        self.0.poll_last_entry()
    }

    fn poll_last_entry(&mut self) -> Option<(Self::Key, Self::Value)> {
        self.0.poll_first_entry()
    }
}

impl<S: NavigableMap> NavigableMap for Reversed<S> {
    fn lower_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
        self.0.higher_entry(key)
    }

    fn floor_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
        self.0.ceiling_entry(key)
    }

    fn ceiling_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
        self.0.floor_entry(key)
    }

    fn higher_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
        self.0.lower_entry(key)
    }
}

impl<S: SequencedCollection> Collection for Reversed<S> {
    type Item = S::Item;
    type Iter<'a> = S::Iter<'a> where Self: 'a;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn contains(&self, item: &Self::Item) -> bool {
        self.0.contains(item)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.0.iter_in(Direction::Backward)
    }

    fn mod_count(&self) -> u64 {
        self.0.mod_count()
    }
}

impl<S: SequencedCollection + CollectionMut> CollectionMut for Reversed<S> {
    fn add(&mut self, item: Self::Item) -> Result<bool> {
        self.0.add(item)
    }

    fn remove(&mut self, item: &Self::Item) -> Result<bool> {
        CollectionMut::remove(&mut self.0, item)
    }

    fn clear(&mut self) -> Result<()> {
        CollectionMut::clear(&mut self.0)
    }
}

impl<S: SequencedCollection> SequencedCollection for Reversed<S> {
    fn iter_in(&self, direction: Direction) -> Self::Iter<'_> {
        self.0.iter_in(direction.flip())
    }
}

impl<S: SequencedCollectionMut> SequencedCollectionMut for Reversed<S> {
    fn add_first(&mut self, item: Self::Item) -> Result<()> {
        self.0.add_last(item)
    }

    fn add_last(&mut self, item: Self::Item) -> Result<()> {
        self.0.add_first(item)
    }

    fn poll_first(&mut self) -> Option<Self::Item> {
        self.0.poll_last()
    }

    fn poll_last(&mut self) -> Option<Self::Item> {
        self.0.poll_first()
    }
}

impl<S: NavigableSet> NavigableSet for Reversed<S> {
    fn lower(&self, item: &Self::Item) -> Option<&Self::Item> {
        self.0.higher(item)
    }

    fn floor(&self, item: &Self::Item) -> Option<&Self::Item> {
        self.0.ceiling(item)
    }

    fn ceiling(&self, item: &Self::Item) -> Option<&Self::Item> {
        self.0.floor(item)
    }

    fn higher(&self, item: &Self::Item) -> Option<&Self::Item> {
        self.0.lower(item)
    }
}

impl<S: Debug> Debug for Reversed<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reversed").field(&self.0).finish()
    }
}

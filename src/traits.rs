//! Calling conventions shared by every container and view.
//!
//! Concrete collections carry inherent methods with Rust-style names
//! (`insert`, `get`, `remove`, ...). These traits are the uniform surface the
//! runtime and generated code program against: mutators return [`Result`] so
//! unmodifiable collections and restricted views can refuse them, and the
//! sequenced/navigable layers are what [`Reversed`](crate::Reversed) flips.
//!
//! Each trait is also implemented for `&T` and `&mut T`, so a borrowed
//! collection can be wrapped in a view or a `Reversed` without giving it up.

use crate::error::{CollectionError, Result};

/// Traversal direction of a sequenced collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub const fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Read access to a key-value mapping.
pub trait Map {
    type Key;
    type Value;
    type Iter<'a>: Iterator<Item = (&'a Self::Key, &'a Self::Value)>
    where
        Self: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn contains_key(&self, key: &Self::Key) -> bool {
        self.get(key).is_some()
    }

    /// Linear scan; there is no index over values.
    fn contains_value(&self, value: &Self::Value) -> bool
    where
        Self::Value: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    fn iter(&self) -> Self::Iter<'_>;

    /// Structural modification counter of the backing engine.
    fn mod_count(&self) -> u64;
}

/// Mutation of a key-value mapping.
pub trait MapMut: Map {
    fn put(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>>;

    fn remove(&mut self, key: &Self::Key) -> Result<Option<Self::Value>>;

    /// Removes the first entry, in iteration order, accepted by `pred`.
    #[allow(clippy::type_complexity)]
    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&Self::Key, &Self::Value) -> bool,
    ) -> Result<Option<(Self::Key, Self::Value)>>;

    fn clear(&mut self) -> Result<()>;
}

/// Read access to a collection of elements.
pub trait Collection {
    type Item;
    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, item: &Self::Item) -> bool;

    fn iter(&self) -> Self::Iter<'_>;

    fn mod_count(&self) -> u64;
}

/// Mutation of a collection of elements.
pub trait CollectionMut: Collection {
    /// Returns `true` if the collection changed.
    fn add(&mut self, item: Self::Item) -> Result<bool>;

    /// Returns `true` if an element was removed.
    fn remove(&mut self, item: &Self::Item) -> Result<bool>;

    fn clear(&mut self) -> Result<()>;
}

/// A map with a defined encounter order and first/last ends.
pub trait SequencedMap: Map {
    fn entries_in(&self, direction: Direction) -> Self::Iter<'_>;

    fn first_entry(&self) -> Option<(&Self::Key, &Self::Value)> {
        self.entries_in(Direction::Forward).next()
    }

    fn last_entry(&self) -> Option<(&Self::Key, &Self::Value)> {
        self.entries_in(Direction::Backward).next()
    }
}

pub trait SequencedMapMut: SequencedMap + MapMut {
    fn put_first(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>>;

    fn put_last(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>>;

    fn poll_first_entry(&mut self) -> Option<(Self::Key, Self::Value)>;

    fn poll_last_entry(&mut self) -> Option<(Self::Key, Self::Value)>;
}

/// A collection with a defined encounter order and first/last ends.
pub trait SequencedCollection: Collection {
    fn iter_in(&self, direction: Direction) -> Self::Iter<'_>;

    fn get_first(&self) -> Result<&Self::Item> {
        self.iter_in(Direction::Forward)
            .next()
            .ok_or(CollectionError::NoSuchElement)
    }

    fn get_last(&self) -> Result<&Self::Item> {
        self.iter_in(Direction::Backward)
            .next()
            .ok_or(CollectionError::NoSuchElement)
    }
}

pub trait SequencedCollectionMut: SequencedCollection + CollectionMut {
    fn add_first(&mut self, item: Self::Item) -> Result<()>;

    fn add_last(&mut self, item: Self::Item) -> Result<()>;

    fn poll_first(&mut self) -> Option<Self::Item>;

    fn poll_last(&mut self) -> Option<Self::Item>;

    fn remove_first(&mut self) -> Result<Self::Item> {
        self.poll_first().ok_or(CollectionError::NoSuchElement)
    }

    fn remove_last(&mut self) -> Result<Self::Item> {
        self.poll_last().ok_or(CollectionError::NoSuchElement)
    }
}

/// Comparator-ordered map navigation. `first_key`/`last_key` fail on an empty
/// map; every other lookup answers `None`.
pub trait NavigableMap: SequencedMap {
    fn lower_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;

    fn floor_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;

    fn ceiling_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;

    fn higher_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)>;

    fn first_key(&self) -> Result<&Self::Key> {
        self.first_entry()
            .map(|(k, _)| k)
            .ok_or(CollectionError::NoSuchElement)
    }

    fn last_key(&self) -> Result<&Self::Key> {
        self.last_entry()
            .map(|(k, _)| k)
            .ok_or(CollectionError::NoSuchElement)
    }

    fn lower_key(&self, key: &Self::Key) -> Option<&Self::Key> {
        self.lower_entry(key).map(|(k, _)| k)
    }

    fn floor_key(&self, key: &Self::Key) -> Option<&Self::Key> {
        self.floor_entry(key).map(|(k, _)| k)
    }

    fn ceiling_key(&self, key: &Self::Key) -> Option<&Self::Key> {
        self.ceiling_entry(key).map(|(k, _)| k)
    }

    fn higher_key(&self, key: &Self::Key) -> Option<&Self::Key> {
        self.higher_entry(key).map(|(k, _)| k)
    }
}

/// Comparator-ordered set navigation.
pub trait NavigableSet: SequencedCollection {
    fn lower(&self, item: &Self::Item) -> Option<&Self::Item>;

    fn floor(&self, item: &Self::Item) -> Option<&Self::Item>;

    fn ceiling(&self, item: &Self::Item) -> Option<&Self::Item>;

    fn higher(&self, item: &Self::Item) -> Option<&Self::Item>;

    fn first(&self) -> Result<&Self::Item> {
        self.get_first()
    }

    fn last(&self) -> Result<&Self::Item> {
        self.get_last()
    }
}

macro_rules! forward_map {
    ($($ref:tt)*) => {
        impl<M: Map + ?Sized> Map for $($ref)* M {
            type Key = M::Key;
            type Value = M::Value;
            type Iter<'a> = M::Iter<'a> where Self: 'a;

            fn len(&self) -> usize {
                (**self).len()
            }

            fn get(&self, key: &Self::Key) -> Option<&Self::Value> {
                (**self).get(key)
            }

            fn contains_key(&self, key: &Self::Key) -> bool {
                (**self).contains_key(key)
            }

            fn iter(&self) -> Self::Iter<'_> {
                (**self).iter()
            }

            fn mod_count(&self) -> u64 {
                (**self).mod_count()
            }
        }

        impl<M: SequencedMap + ?Sized> SequencedMap for $($ref)* M {
            fn entries_in(&self, direction: Direction) -> Self::Iter<'_> {
                (**self).entries_in(direction)
            }
        }

        impl<M: NavigableMap + ?Sized> NavigableMap for $($ref)* M {
            fn lower_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
                (**self).lower_entry(key)
            }

            fn floor_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
                (**self).floor_entry(key)
            }

            fn ceiling_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
                (**self).ceiling_entry(key)
            }

            fn higher_entry(&self, key: &Self::Key) -> Option<(&Self::Key, &Self::Value)> {
                (**self).higher_entry(key)
            }
        }

        impl<C: Collection + ?Sized> Collection for $($ref)* C {
            type Item = C::Item;
            type Iter<'a> = C::Iter<'a> where Self: 'a;

            fn len(&self) -> usize {
                (**self).len()
            }

            fn contains(&self, item: &Self::Item) -> bool {
                (**self).contains(item)
            }

            fn iter(&self) -> Self::Iter<'_> {
                (**self).iter()
            }

            fn mod_count(&self) -> u64 {
                (**self).mod_count()
            }
        }

        impl<C: SequencedCollection + ?Sized> SequencedCollection for $($ref)* C {
            fn iter_in(&self, direction: Direction) -> Self::Iter<'_> {
                (**self).iter_in(direction)
            }
        }

        impl<C: NavigableSet + ?Sized> NavigableSet for $($ref)* C {
            fn lower(&self, item: &Self::Item) -> Option<&Self::Item> {
                (**self).lower(item)
            }

            fn floor(&self, item: &Self::Item) -> Option<&Self::Item> {
                (**self).floor(item)
            }

            fn ceiling(&self, item: &Self::Item) -> Option<&Self::Item> {
                (**self).ceiling(item)
            }

            fn higher(&self, item: &Self::Item) -> Option<&Self::Item> {
                (**self).higher(item)
            }
        }
    };
}

forward_map!(&);
forward_map!(&mut);

impl<M: MapMut + ?Sized> MapMut for &mut M {
    fn put(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>> {
        (**self).put(key, value)
    }

    fn remove(&mut self, key: &Self::Key) -> Result<Option<Self::Value>> {
        (**self).remove(key)
    }

    fn remove_matching(
        &mut self,
        pred: &mut dyn FnMut(&Self::Key, &Self::Value) -> bool,
    ) -> Result<Option<(Self::Key, Self::Value)>> {
        (**self).remove_matching(pred)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

impl<M: SequencedMapMut + ?Sized> SequencedMapMut for &mut M {
    fn put_first(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>> {
        (**self).put_first(key, value)
    }

    fn put_last(&mut self, key: Self::Key, value: Self::Value) -> Result<Option<Self::Value>> {
        (**self).put_last(key, value)
    }

    fn poll_first_entry(&mut self) -> Option<(Self::Key, Self::Value)> {
        (**self).poll_first_entry()
    }

    fn poll_last_entry(&mut self) -> Option<(Self::Key, Self::Value)> {
        (**self).poll_last_entry()
    }
}

impl<C: CollectionMut + ?Sized> CollectionMut for &mut C {
    fn add(&mut self, item: Self::Item) -> Result<bool> {
        (**self).add(item)
    }

    fn remove(&mut self, item: &Self::Item) -> Result<bool> {
        (**self).remove(item)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

impl<C: SequencedCollectionMut + ?Sized> SequencedCollectionMut for &mut C {
    fn add_first(&mut self, item: Self::Item) -> Result<()> {
        (**self).add_first(item)
    }

    fn add_last(&mut self, item: Self::Item) -> Result<()> {
        (**self).add_last(item)
    }

    fn poll_first(&mut self) -> Option<Self::Item> {
        (**self).poll_first()
    }

    fn poll_last(&mut self) -> Option<Self::Item> {
        (**self).poll_last()
    }
}

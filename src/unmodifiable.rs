//! Read-only wrappers and literal constructors.
//!
//! [`Unmodifiable`] forwards every read to the wrapped collection and answers
//! every `Result`-returning mutator with an unsupported-operation error,
//! leaving the contents untouched. The sequenced `poll_*` mutators have no
//! error channel, so an unmodifiable collection does not offer them at all.

use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};

use crate::error::{CollectionError, Result};
use crate::hash_map::HashMap;
use crate::hash_set::HashSet;
use crate::traits::{
    Collection, CollectionMut, Direction, Map, MapMut, NavigableMap, NavigableSet,
    SequencedCollection, SequencedMap,
};

/// A collection that refuses mutation.
#[derive(Clone, Default)]
pub struct Unmodifiable<S>(S);

pub type ImmutableSet<T> = Unmodifiable<HashSet<T>>;
pub type ImmutableMap<K, V> = Unmodifiable<HashMap<K, V>>;

impl<S> Unmodifiable<S> {
    pub const fn new(inner: S) -> Self {
        Unmodifiable(inner)
    }

    /// Read access to the wrapped collection.
    pub const fn inner(&self) -> &S {
        &self.0
    }

    pub fn into_inner(self) -> S {
        self.0
    }
}

/// An unmodifiable set of `items`. A repeated element is an illegal-argument
/// error.
pub fn set_of<T, I>(items: I) -> Result<ImmutableSet<T>>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let items = items.into_iter();
    let mut set = HashSet::with_capacity(items.size_hint().0);
    for item in items {
        if !set.insert(item) {
            return Err(CollectionError::illegal_argument("duplicate element"));
        }
    }
    Ok(Unmodifiable(set))
}

/// An unmodifiable map of `entries`. A repeated key is an illegal-argument
/// error.
pub fn map_of<K, V, I>(entries: I) -> Result<ImmutableMap<K, V>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    let entries = entries.into_iter();
    let mut map = HashMap::with_capacity(entries.size_hint().0);
    for (k, v) in entries {
        if map.contains_key(&k) {
            return Err(CollectionError::illegal_argument("duplicate key"));
        }
        map.insert(k, v);
    }
    Ok(Unmodifiable(map))
}

/// Unmodifiable copy of any map.
pub fn map_copy_of<M>(source: &M) -> ImmutableMap<M::Key, M::Value>
where
    M: Map + ?Sized,
    M::Key: Eq + Hash + Clone,
    M::Value: Clone,
{
    Unmodifiable(HashMap::from_map(source))
}

impl<S: Map> Map for Unmodifiable<S> {
    type Key = S::Key;
    type Value = S::Value;
    type Iter<'a> = S::Iter<'a> where Self: 'a;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn get(&self, key: &S::Key) -> Option<&S::Value> {
        self.0.get(key)
    }

    fn contains_key(&self, key: &S::Key) -> bool {
        self.0.contains_key(key)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.0.iter()
    }

    fn mod_count(&self) -> u64 {
        self.0.mod_count()
    }
}

impl<S: Map> MapMut for Unmodifiable<S> {
    fn put(&mut self, _key: S::Key, _value: S::Value) -> Result<Option<S::Value>> {
        Err(CollectionError::unsupported("put"))
    }

    fn remove(&mut self, _key: &S::Key) -> Result<Option<S::Value>> {
        Err(CollectionError::unsupported("remove"))
    }

    fn remove_matching(
        &mut self,
        _pred: &mut dyn FnMut(&S::Key, &S::Value) -> bool,
    ) -> Result<Option<(S::Key, S::Value)>> {
        Err(CollectionError::unsupported("remove"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(CollectionError::unsupported("clear"))
    }
}

impl<S: SequencedMap> SequencedMap for Unmodifiable<S> {
    fn entries_in(&self, direction: Direction) -> Self::Iter<'_> {
        self.0.entries_in(direction)
    }
}

impl<S: NavigableMap> NavigableMap for Unmodifiable<S> {
    fn lower_entry(&self, key: &S::Key) -> Option<(&S::Key, &S::Value)> {
        self.0.lower_entry(key)
    }

    fn floor_entry(&self, key: &S::Key) -> Option<(&S::Key, &S::Value)> {
        self.0.floor_entry(key)
    }

    fn ceiling_entry(&self, key: &S::Key) -> Option<(&S::Key, &S::Value)> {
        self.0.ceiling_entry(key)
    }

    fn higher_entry(&self, key: &S::Key) -> Option<(&S::Key, &S::Value)> {
        self.0.higher_entry(key)
    }
}

impl<S: Collection> Collection for Unmodifiable<S> {
    type Item = S::Item;
    type Iter<'a> = S::Iter<'a> where Self: 'a;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn contains(&self, item: &S::Item) -> bool {
        self.0.contains(item)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.0.iter()
    }

    fn mod_count(&self) -> u64 {
        self.0.mod_count()
    }
}

impl<S: Collection> CollectionMut for Unmodifiable<S> {
    fn add(&mut self, _item: S::Item) -> Result<bool> {
        Err(CollectionError::unsupported("add"))
    }

    fn remove(&mut self, _item: &S::Item) -> Result<bool> {
        Err(CollectionError::unsupported("remove"))
    }

    fn clear(&mut self) -> Result<()> {
        Err(CollectionError::unsupported("clear"))
    }
}

impl<S: SequencedCollection> SequencedCollection for Unmodifiable<S> {
    fn iter_in(&self, direction: Direction) -> Self::Iter<'_> {
        self.0.iter_in(direction)
    }
}

impl<S: NavigableSet> NavigableSet for Unmodifiable<S> {
    fn lower(&self, item: &S::Item) -> Option<&S::Item> {
        self.0.lower(item)
    }

    fn floor(&self, item: &S::Item) -> Option<&S::Item> {
        self.0.floor(item)
    }

    fn ceiling(&self, item: &S::Item) -> Option<&S::Item> {
        self.0.ceiling(item)
    }

    fn higher(&self, item: &S::Item) -> Option<&S::Item> {
        self.0.higher(item)
    }
}

impl<S: PartialEq<O>, O> PartialEq<O> for Unmodifiable<S> {
    fn eq(&self, other: &O) -> bool {
        self.0 == *other
    }
}

impl<S: Hash> Hash for Unmodifiable<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<S: Debug> Debug for Unmodifiable<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl<S: Display> Display for Unmodifiable<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

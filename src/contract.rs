//! Equality, hashing and text rendering shared by every container.
//!
//! Two containers are compared by content, never by engine: a `HashMap` and a
//! `TreeMap` holding the same entries are equal and hash the same. Hash codes
//! are order-independent sums so bucket layout and link order cannot leak into
//! them, and every element is hashed with the same fixed-key hasher.

use core::fmt::{self, Display, Formatter};
use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

use crate::traits::{Collection, Map};

/// Same size, and every entry of `a` maps to an equal value in `b`.
pub fn maps_equal<A, B>(a: &A, b: &B) -> bool
where
    A: Map + ?Sized,
    B: Map<Key = A::Key, Value = A::Value> + ?Sized,
    A::Value: PartialEq,
{
    a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
}

/// Same size, and every element of `a` is a member of `b`.
pub fn sets_equal<A, B>(a: &A, b: &B) -> bool
where
    A: Collection + ?Sized,
    B: Collection<Item = A::Item> + ?Sized,
{
    a.len() == b.len() && a.iter().all(|item| b.contains(item))
}

/// Hash of a single element under the fixed-key hasher.
pub fn element_hash<T: Hash + ?Sized>(item: &T) -> u64 {
    let mut h = DefaultHasher::new();
    item.hash(&mut h);
    h.finish()
}

/// Wrapping sum over entries of `hash(k) ^ hash(v)`.
pub fn map_hash_code<'a, K, V>(entries: impl IntoIterator<Item = (&'a K, &'a V)>) -> u64
where
    K: Hash + 'a,
    V: Hash + 'a,
{
    entries.into_iter().fold(0u64, |acc, (k, v)| {
        acc.wrapping_add(element_hash(k) ^ element_hash(v))
    })
}

/// Wrapping sum of element hashes.
pub fn set_hash_code<'a, T>(items: impl IntoIterator<Item = &'a T>) -> u64
where
    T: Hash + 'a,
{
    items
        .into_iter()
        .fold(0u64, |acc, t| acc.wrapping_add(element_hash(t)))
}

/// `{k=v, k=v}`
pub(crate) fn fmt_map<'a, K, V>(
    f: &mut Formatter<'_>,
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
) -> fmt::Result
where
    K: Display + 'a,
    V: Display + 'a,
{
    f.write_str("{")?;
    for (i, (k, v)) in entries.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{k}={v}")?;
    }
    f.write_str("}")
}

/// `[a, b]`
pub(crate) fn fmt_seq<'a, T>(f: &mut Formatter<'_>, items: impl IntoIterator<Item = &'a T>) -> fmt::Result
where
    T: Display + 'a,
{
    f.write_str("[")?;
    for (i, t) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{t}")?;
    }
    f.write_str("]")
}

//! Total orders for the tree-backed collections.
//!
//! A `TreeMap<K, V, C>` never calls `Ord` directly; it asks its comparator.
//! [`Natural`] defers to `Ord` and is the default, [`Reverse`] flips any
//! comparator, and [`FnComparator`] adapts a closure.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};

/// A total order over `T`.
///
/// Implementations must be consistent: `compare(a, b)` is the reverse of
/// `compare(b, a)` and the relation is transitive. A tree built with an
/// inconsistent comparator stays memory safe but may lose track of entries.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Natural ordering through `Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// The reverse of another comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

/// Adapts a closure `Fn(&T, &T) -> Ordering`.
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Comparator<T> for FnComparator<F> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

impl<F> Debug for FnComparator<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("FnComparator")
    }
}

/// Orders values by a key extracted from them.
pub fn by_key<T: ?Sized, U: Ord>(
    key: impl Fn(&T) -> U,
) -> FnComparator<impl Fn(&T, &T) -> Ordering> {
    FnComparator(move |a: &T, b: &T| key(a).cmp(&key(b)))
}

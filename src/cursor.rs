//! Fail-fast cursors.
//!
//! A [`Cursor`] is iterator state detached from its collection: the id of the
//! next element, the id of the last one returned, and the modification count
//! it expects the owner to have. The owner is passed in on every call, the
//! same way a handle is resolved against its map, so the collection stays
//! free to be mutated between steps. A mutation the cursor did not make
//! shows up as a changed counter and the cursor refuses to continue.
//!
//! ```text
//!            next() ok               next() ok
//!   Fresh ──────────────▶ Advanced ◀──────────┐
//!     │                     │  └──────────────┘
//!     │ next() at end       │ next() at end
//!     ▼                     ▼
//!   Exhausted ◀─────────────┘
//!
//!   any state ── counter mismatch ──▶ Invalidated (permanent)
//! ```

use core::fmt::Debug;
use core::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::error::{CollectionError, Result};
use crate::traits::Direction;

/// Identity of one collection instance. Clones get a fresh identity so a
/// cursor cannot be replayed against a copy.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        InstanceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn get(&self) -> u64 {
        self.0
    }
}

impl Clone for InstanceId {
    fn clone(&self) -> Self {
        Self::fresh()
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::fresh()
    }
}

/// What a collection exposes so a [`Cursor`] can walk it.
///
/// Ids must stay valid until their element is removed, and `next_id` must be
/// answerable for any live id.
pub trait Traverse {
    type Id: Copy + PartialEq + Debug;
    type Item<'a>
    where
        Self: 'a;
    type Owned;

    fn instance_id(&self) -> u64;

    fn traverse_mod_count(&self) -> u64;

    fn first_id(&self, direction: Direction) -> Option<Self::Id>;

    fn next_id(&self, id: Self::Id, direction: Direction) -> Option<Self::Id>;

    fn item(&self, id: Self::Id) -> Option<Self::Item<'_>>;

    fn remove_id(&mut self, id: Self::Id) -> Option<Self::Owned>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Fresh,
    Advanced,
    Exhausted,
    Invalidated,
}

#[derive(Debug, Clone)]
pub struct Cursor<I> {
    state: CursorState,
    next: Option<I>,
    last: Option<I>,
    expected: u64,
    owner: u64,
    direction: Direction,
}

impl<I: Copy + PartialEq + Debug> Cursor<I> {
    /// Starts a traversal of `owner` from its first element in `direction`.
    pub fn new<T>(owner: &T, direction: Direction) -> Self
    where
        T: Traverse<Id = I> + ?Sized,
    {
        Cursor {
            state: CursorState::Fresh,
            next: owner.first_id(direction),
            last: None,
            expected: owner.traverse_mod_count(),
            owner: owner.instance_id(),
            direction,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether another element is pending. Does not validate the owner.
    pub fn has_next(&self) -> bool {
        self.state != CursorState::Invalidated && self.next.is_some()
    }

    fn check<T>(&mut self, owner: &T) -> Result<()>
    where
        T: Traverse<Id = I> + ?Sized,
    {
        if owner.instance_id() != self.owner {
            return Err(CollectionError::illegal_argument(
                "cursor used with a collection it was not created from",
            ));
        }
        if self.state == CursorState::Invalidated {
            return Err(CollectionError::ConcurrentModification);
        }
        let actual = owner.traverse_mod_count();
        if actual != self.expected {
            debug!(
                "cursor invalidated: expected mod count {}, found {}",
                self.expected, actual
            );
            self.state = CursorState::Invalidated;
            self.next = None;
            self.last = None;
            return Err(CollectionError::ConcurrentModification);
        }
        Ok(())
    }

    pub fn next<'a, T>(&mut self, owner: &'a T) -> Result<T::Item<'a>>
    where
        T: Traverse<Id = I> + ?Sized,
    {
        self.check(owner)?;
        let Some(id) = self.next else {
            self.state = CursorState::Exhausted;
            self.last = None;
            return Err(CollectionError::NoSuchElement);
        };
        let item = owner.item(id).ok_or(CollectionError::ConcurrentModification)?;
        self.next = owner.next_id(id, self.direction);
        self.last = Some(id);
        self.state = CursorState::Advanced;
        Ok(item)
    }

    /// Removes the element returned by the preceding `next`. The cursor then
    /// adopts the owner's new counter and continues where it was.
    pub fn remove<T>(&mut self, owner: &mut T) -> Result<T::Owned>
    where
        T: Traverse<Id = I> + ?Sized,
    {
        self.check(owner)?;
        let id = self.last.take().ok_or(CollectionError::IllegalState {
            reason: "remove without a preceding next",
        })?;
        let removed = owner
            .remove_id(id)
            .ok_or(CollectionError::ConcurrentModification)?;
        self.expected = owner.traverse_mod_count();
        Ok(removed)
    }

    /// Feeds every pending element to `f`, with the same checks as `next`.
    pub fn for_each_remaining<'a, T>(
        &mut self,
        owner: &'a T,
        mut f: impl FnMut(T::Item<'a>),
    ) -> Result<()>
    where
        T: Traverse<Id = I> + ?Sized,
    {
        while self.next.is_some() {
            f(self.next(owner)?);
        }
        self.check(owner)
    }
}

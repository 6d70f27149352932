//! Debug-only reentrancy guard around probing.
//!
//! Collections call into user code (`Hash`, `Eq`, comparators) only while
//! they probe for a key, and an insert or remove relinks right after its
//! probe under the same guard. Entering the same collection again from that
//! user code would observe half-linked state, so in debug builds each probe
//! is wrapped in a guard that panics on nesting. Release builds compile it
//! away.
//!
//! The depth is an atomic rather than a `Cell` so that the owning collections
//! stay `Sync` and can sit behind an external `RwLock`.

#[cfg(debug_assertions)]
use core::sync::atomic::{AtomicU32, Ordering};
use core::marker::PhantomData;

/// Per-collection tracker; guard probes with
/// `let _g = self.reentrancy.enter();`.
#[derive(Debug)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    depth: AtomicU32,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            depth: AtomicU32::new(0),
        }
    }

    /// Enter a guarded section. In debug builds, panics if one is already open.
    #[inline]
    pub(crate) fn enter(&self) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            let prev = self.depth.fetch_add(1, Ordering::Relaxed);
            if prev != 0 {
                self.depth.fetch_sub(1, Ordering::Relaxed);
                panic!("reentrancy detected: collection re-entered while probing");
            }
            ReentrancyGuard {
                owner: self,
                _lt: PhantomData,
            }
        }

        #[cfg(not(debug_assertions))]
        {
            ReentrancyGuard { _lt: PhantomData }
        }
    }
}

impl Default for DebugReentrancy {
    fn default() -> Self {
        Self::new()
    }
}

// Cloning a collection must not carry over an open section.
impl Clone for DebugReentrancy {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// RAII guard returned by [`DebugReentrancy::enter`].
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    _lt: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            let prev = self.owner.depth.fetch_sub(1, Ordering::Relaxed);
            debug_assert!(prev > 0);
        }
    }
}

//! runtime-collections: hash, linked and sorted collections with
//! fail-fast traversal, reversible sequenced views and content-based
//! equality across engines.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: two storage engines, each small enough to check on its own,
//!   with every public container a thin layer over one of them.
//! - Layers:
//!   - HashTable<K, V>: hasher-free chained table in a slotmap arena.
//!     Callers pass precomputed hashes; entries keep their hash and are
//!     addressed by stable `EntryId`s across rehashes.
//!   - HashMap / HashSet: own the `BuildHasher`, hash once per call and
//!     delegate to the table.
//!   - LinkedHashMap / LinkedHashSet: the same table with a doubly-linked
//!     order threaded through the entries (insertion or access order,
//!     optional eviction bound).
//!   - RbTree<K, V>: red-black tree in a slotmap arena, searched with
//!     probe closures. TreeMap / TreeSet supply the comparator and add
//!     range windows.
//!   - Views, `Reversed`, `Unmodifiable`: wrappers over the contract
//!     traits; none of them stores elements.
//!
//! Constraints
//! - Single-threaded; no locking.
//! - No unsafe code. Links and tree pointers are arena ids.
//! - Ids are stable until their element is removed; tree deletion swaps
//!   nodes structurally rather than moving payloads.
//! - Every mutator that can be refused returns `Result`, and refusal
//!   happens before any change.
//!
//! Traversal and modification counters
//! - Each engine bumps a counter on structural change only; overwriting
//!   a value does not count. Reordering a linked map in access order does.
//! - Borrowed iterators cannot observe foreign mutation. `Cursor` is the
//!   detached alternative: it re-borrows the owner on each step and
//!   compares counters, failing with `ConcurrentModification`.
//!
//! Reentrancy policy
//! - User code (`Hash`, `Eq`, comparators) runs only while probing. A
//!   debug-only guard around each probe panics if that code re-enters the
//!   same container. Outside the probe, the structure is consistent and
//!   `Drop` for removed keys and values may do anything.
//!
//! Hasher and rehashing invariants
//! - The table never calls `K: Hash`; rehashing uses stored hashes, and
//!   chain order within a bucket survives a resize.
//!
//! Notes and non-goals
//! - No concurrent variants, no serialization, no checked (runtime
//!   type-tested) wrappers.
//! - Sorted containers refuse `put_first`/`put_last`; the comparator
//!   decides position.

pub mod comparator;
pub mod config;
pub mod contract;
pub mod cursor;
pub mod error;
pub mod hash_map;
pub mod hash_set;
mod hash_table;
#[cfg(test)]
mod hash_table_proptest;
pub mod linked_hash_map;
pub mod linked_hash_set;
mod reentrancy;
pub mod reversed;
pub mod summary;
pub mod traits;
mod tree;
pub mod tree_map;
#[cfg(test)]
mod tree_proptest;
pub mod tree_set;
pub mod unmodifiable;
pub mod views;

// Public surface
pub use comparator::{by_key, Comparator, FnComparator, Natural, Reverse};
pub use config::{LinkOrder, TableConfig};
pub use cursor::{Cursor, CursorState, Traverse};
pub use error::{CollectionError, Result};
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::EntryId;
pub use linked_hash_map::LinkedHashMap;
pub use linked_hash_set::LinkedHashSet;
pub use reversed::Reversed;
pub use summary::{DoubleSummaryStatistics, IntSummaryStatistics, LongSummaryStatistics};
pub use traits::{
    Collection, CollectionMut, Direction, Map, MapMut, NavigableMap, NavigableSet,
    SequencedCollection, SequencedCollectionMut, SequencedMap, SequencedMapMut,
};
pub use tree::NodeId;
pub use tree_map::{SubMap, SubMapMut, TreeMap, Window};
pub use tree_set::{SubSet, SubSetMut, TreeSet};
pub use unmodifiable::{map_copy_of, map_of, set_of, ImmutableMap, ImmutableSet, Unmodifiable};
pub use views::{EntrySet, KeySet, MapViews, Values};

/// The contract traits and view constructors, for glob import.
pub mod prelude {
    pub use crate::traits::{
        Collection, CollectionMut, Direction, Map, MapMut, NavigableMap, NavigableSet,
        SequencedCollection, SequencedCollectionMut, SequencedMap, SequencedMapMut,
    };
    pub use crate::views::MapViews;
}

//! Error taxonomy shared by every collection in the crate.
//!
//! All errors are contract violations surfaced synchronously at the call that
//! caused them. None of them leave a collection partially mutated.

use derive_more::{Display, Error};

/// Errors returned by collection, view and cursor operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CollectionError {
    /// The collection (or the remaining traversal) has no element to return.
    #[display("no such element")]
    NoSuchElement,
    /// The owning collection was structurally modified behind a cursor's back.
    #[display("collection was structurally modified outside of this traversal")]
    ConcurrentModification,
    /// The operation is not valid in the current state, e.g. `remove` twice.
    #[display("illegal state: {reason}")]
    IllegalState { reason: &'static str },
    /// An argument was rejected before any mutation took place.
    #[display("illegal argument: {reason}")]
    IllegalArgument { reason: String },
    /// The collection does not support this operation at all.
    #[display("unsupported operation: {operation}")]
    Unsupported { operation: &'static str },
}

impl CollectionError {
    pub(crate) fn illegal_argument(reason: impl Into<String>) -> Self {
        CollectionError::IllegalArgument {
            reason: reason.into(),
        }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        CollectionError::Unsupported { operation }
    }
}

pub type Result<T> = core::result::Result<T, CollectionError>;

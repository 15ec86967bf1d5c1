//! Error types for dispatcher operations.
//!
//! Every variant signals a caller bug (bookkeeping or API misuse); none is
//! retryable. Removing an absent activity is not an error.

use thiserror::Error;

/// Errors produced by dispatchers and their cursors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The activity is already a candidate of this dispatcher.
    #[error("activity '{activity_id}' is already a dispatch candidate")]
    DuplicateCandidate {
        /// Offending activity.
        activity_id: String,
    },
    /// The dispatcher was used before a resource was associated with it.
    #[error("dispatcher has no associated resource")]
    AssociationNotSet,
    /// The dispatcher is already associated with another resource.
    #[error("dispatcher is associated with '{current}', cannot re-associate with '{requested}'")]
    AssociationAlreadySet {
        /// Resource already associated.
        current: String,
        /// Resource that was requested.
        requested: String,
    },
    /// A cursor was dereferenced in an invalid state.
    #[error("cursor misuse: {0}")]
    IteratorMisuse(#[from] IteratorMisuse),
}

/// Ways a cursor can be misused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IteratorMisuse {
    /// `current` was read before the first successful `move_next`.
    #[error("read before first advance")]
    BeforeFirst,
    /// `current` was read after `move_next` reported exhaustion.
    #[error("read past the end")]
    Exhausted,
    /// The underlying collection changed since the cursor was created or reset.
    #[error("collection modified; reset the cursor")]
    Stale,
}

/// Result alias for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

//! Per-resource ready queues.
//!
//! A dispatcher holds the candidate activities of one resource and, once per
//! simulation step, releases them to the simulation loop in dispatch order:
//!
//! 1. `begin_dispatch` filters and ranks the candidates.
//! 2. `next_activity` / `peek_next_activity` serve them one at a time.
//! 3. The loop schedules what it takes and calls `remove`.
//! 4. `end_dispatch` closes the cycle.
//!
//! Dispatchers are single-threaded and perform no locking; the caller holds
//! the scenario lock for the whole cycle.
//!
//! # Variants
//!
//! - [`ArrayListDispatcher`]: candidates in insertion order, with a cheap
//!   "anything ready yet?" check over cached sequence-head end times.
//! - [`SortedListDispatcher`]: builds a [`CompositeSort`] every cycle, applying
//!   [`keep_successor`] continuity and a [`DispatcherDefinition`] ranking.
//!
//! [`DispatcherDefinition`]: crate::dispatching::DispatcherDefinition

mod array_list;
mod association;
mod candidates;
mod composite;
mod cursor;
mod keep_successor;
mod key;
mod sorted_list;

pub use array_list::ArrayListDispatcher;
pub use association::ResourceAssociation;
pub use candidates::CandidateList;
pub use composite::CompositeSort;
pub use cursor::{Cursor, CursorSource};
pub use keep_successor::{keep_successor, KeepSuccessor};
pub use key::{KeyAndActivity, SortKey};
pub use sorted_list::SortedListDispatcher;

use std::fmt;

use crate::error::DispatchResult;
use crate::models::ScenarioView;

/// Cursor over the stored candidates of a dispatcher.
pub type CandidateCursor = Cursor<CandidateList>;

/// Cursor over the ranking of the current dispatch cycle.
pub type RankingCursor = Cursor<CompositeSort>;

/// The contract every dispatcher offers the simulation loop.
pub trait ReadyActivitiesDispatcher: fmt::Debug + fmt::Display {
    /// Resource this dispatcher serves.
    ///
    /// # Errors
    /// [`DispatchError::AssociationNotSet`](crate::DispatchError::AssociationNotSet)
    /// if no resource was associated yet.
    fn resource_id(&self) -> DispatchResult<&str>;

    /// Associates the dispatcher with its resource. Allowed once.
    fn associate(&mut self, resource_id: &str) -> DispatchResult<()>;

    /// Drops all candidates and per-cycle state.
    fn clear(&mut self) {}

    /// Adds a candidate with its cached sequence-head end time.
    ///
    /// # Errors
    /// [`DispatchError::DuplicateCandidate`](crate::DispatchError::DuplicateCandidate)
    /// if the activity is already a candidate.
    fn add(&mut self, activity_id: &str, sequence_head_end_ms: i64) -> DispatchResult<()>;

    /// Removes a candidate. Returns whether it was present.
    fn remove(&mut self, activity_id: &str) -> bool;

    /// Whether the activity is a candidate.
    fn contains(&self, activity_id: &str) -> bool;

    /// Number of candidates.
    fn count(&self) -> usize;

    /// Whether any candidate may be ready. Meaningful after `begin_dispatch`.
    fn has_ready_activity(&self) -> bool;

    /// Starts a dispatch cycle at `time_ms`.
    ///
    /// With `optimize`, readiness is derived from the cached sequence-head end
    /// times; otherwise every candidate is considered. With
    /// `enforce_keep_successors`, continuity constraints filter the cycle.
    fn begin_dispatch(
        &mut self,
        scenario: &dyn ScenarioView,
        time_ms: i64,
        optimize: bool,
        enforce_keep_successors: bool,
    ) -> DispatchResult<()>;

    /// Ends the current dispatch cycle.
    fn end_dispatch(&mut self) {}

    /// Takes the next activity of the cycle.
    fn next_activity(&mut self) -> Option<String>;

    /// The next activity of the cycle, without taking it.
    fn peek_next_activity(&self) -> Option<&str>;

    /// Takes the next activity of the cycle together with its key.
    fn next_key_and_activity(&mut self) -> Option<KeyAndActivity>;

    /// The next activity of the cycle with its key, without taking it.
    fn peek_next_key_and_activity(&self) -> Option<KeyAndActivity>;

    /// Stored candidates, independent of any cycle.
    fn candidates(&self) -> &CandidateList;

    /// A fresh cursor over the stored candidates.
    fn candidate_cursor(&self) -> CandidateCursor {
        Cursor::new(self.candidates())
    }
}

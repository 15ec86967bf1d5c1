//! Insertion-order dispatcher.

use std::fmt;

use tracing::{trace, warn};

use super::{CandidateList, KeyAndActivity, ReadyActivitiesDispatcher, ResourceAssociation, SortKey};
use crate::error::DispatchResult;
use crate::models::ScenarioView;

/// Serves candidates in insertion order.
///
/// Besides the candidate sequence it caches each candidate's sequence-head
/// end time, so `begin_dispatch(.., optimize = true, ..)` can tell whether
/// anything is ready without ranking.
#[derive(Debug, Clone, Default)]
pub struct ArrayListDispatcher {
    association: ResourceAssociation,
    candidates: CandidateList,
    ready: bool,
    position: usize,
}

impl ArrayListDispatcher {
    /// Creates a dispatcher not yet associated with a resource.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher serving `resource_id`.
    pub fn with_resource(resource_id: impl Into<String>) -> Self {
        Self {
            association: ResourceAssociation::bound(resource_id),
            ..Self::default()
        }
    }

    /// Candidate at a storage index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.candidates.get(index)
    }

    pub(crate) fn association(&self) -> &ResourceAssociation {
        &self.association
    }
}

impl ReadyActivitiesDispatcher for ArrayListDispatcher {
    fn resource_id(&self) -> DispatchResult<&str> {
        self.association.get()
    }

    fn associate(&mut self, resource_id: &str) -> DispatchResult<()> {
        self.association.set(resource_id)
    }

    fn clear(&mut self) {
        self.candidates.clear();
        self.ready = false;
        self.position = 0;
    }

    fn add(&mut self, activity_id: &str, sequence_head_end_ms: i64) -> DispatchResult<()> {
        self.candidates
            .insert(activity_id, sequence_head_end_ms)
            .inspect_err(|e| warn!(resource = ?self.association.as_option(), "{e}"))
    }

    fn remove(&mut self, activity_id: &str) -> bool {
        match self.candidates.remove(activity_id) {
            Some(index) => {
                if index < self.position {
                    self.position -= 1;
                }
                true
            }
            None => false,
        }
    }

    fn contains(&self, activity_id: &str) -> bool {
        self.candidates.contains(activity_id)
    }

    fn count(&self) -> usize {
        self.candidates.len()
    }

    fn has_ready_activity(&self) -> bool {
        self.ready
    }

    fn begin_dispatch(
        &mut self,
        _scenario: &dyn ScenarioView,
        time_ms: i64,
        optimize: bool,
        _enforce_keep_successors: bool,
    ) -> DispatchResult<()> {
        self.position = 0;
        self.ready = !optimize
            || self
                .candidates
                .min_sequence_head_end()
                .is_some_and(|earliest| earliest <= time_ms);
        trace!(
            resource = ?self.association.as_option(),
            time_ms,
            optimize,
            ready = self.ready,
            "begin dispatch"
        );
        Ok(())
    }

    fn next_activity(&mut self) -> Option<String> {
        let id = self.candidates.get(self.position)?.to_owned();
        self.position += 1;
        Some(id)
    }

    fn peek_next_activity(&self) -> Option<&str> {
        self.candidates.get(self.position)
    }

    fn next_key_and_activity(&mut self) -> Option<KeyAndActivity> {
        let entry = self.peek_next_key_and_activity()?;
        self.position += 1;
        Some(entry)
    }

    fn peek_next_key_and_activity(&self) -> Option<KeyAndActivity> {
        self.candidates
            .get(self.position)
            .map(|id| KeyAndActivity::new(SortKey::new(Vec::new(), self.position), id))
    }

    fn candidates(&self) -> &CandidateList {
        &self.candidates
    }
}

impl fmt::Display for ArrayListDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArrayListDispatcher[{}]: {} candidates",
            self.association.as_option().unwrap_or("-"),
            self.candidates.len()
        )
    }
}

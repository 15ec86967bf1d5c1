//! Operation model.
//!
//! An operation is a routing step of a job. It owns one activity, or several
//! when it has been split, and carries the continuity settings that decide
//! whether a successor must stay with its predecessor's resource.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A routing step of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation identifier.
    pub id: String,
    /// Parent job identifier.
    pub job_id: String,
    /// Scheduling priority (higher = more important).
    pub priority: i32,
    /// Date the output is needed by (ms). `None` = no need date.
    pub need_date_ms: Option<i64>,
    /// Earliest start time (ms). `None` = available immediately.
    pub release_ms: Option<i64>,
    /// Activities (pieces) of this operation, in split order.
    pub activities: Vec<String>,
    /// Predecessor operations, first one is the primary predecessor.
    pub predecessors: Vec<PredecessorLink>,
    /// How split pieces may be spread across resources.
    pub auto_split: AutoSplit,
    /// Whether this operation must follow its predecessor's resource.
    pub keep_with_predecessor: bool,
    /// Continuity this operation imposes on its successors.
    pub successor_continuity: ContinuityMode,
    /// How long after this operation ends successors stay tied to it (ms).
    pub keep_successors_time_limit_ms: i64,
    /// Eligible resources narrowed per plant (plant_id → resource ids).
    pub eligibility: HashMap<String, HashSet<String>>,
}

/// Link to a predecessor operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredecessorLink {
    /// Predecessor operation identifier.
    pub operation_id: String,
    /// Overlap allowed between predecessor and successor.
    pub overlap: OverlapType,
}

/// Overlap allowance between a predecessor and its successor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlapType {
    /// Successor starts after the predecessor ends.
    #[default]
    None,
    /// Successor may start after a transfer quantity is finished.
    TransferQuantity,
    /// Successor may start once a percentage of the predecessor is done.
    PercentComplete,
    /// Successor may start with the predecessor.
    AtFirstTransfer,
}

impl OverlapType {
    /// Whether any overlap is allowed.
    pub fn allows_overlap(self) -> bool {
        self != OverlapType::None
    }
}

/// Resource policy for split pieces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoSplit {
    /// Operation is never split automatically.
    #[default]
    None,
    /// Pieces may run on any eligible resource.
    AnyResource,
    /// All pieces must run on the same resource.
    KeepOnSameResource,
}

/// Continuity a predecessor imposes on its successors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinuityMode {
    /// No continuity.
    #[default]
    None,
    /// Successor stays on the predecessor's resource.
    KeepSuccessor,
    /// Successor stays on the predecessor's resource and nothing may run in between.
    KeepSuccessorNoInterrupt,
}

impl ContinuityMode {
    /// Whether other work may not be dispatched between predecessor and successor.
    pub fn forbids_interruption(self) -> bool {
        self == ContinuityMode::KeepSuccessorNoInterrupt
    }
}

impl Operation {
    /// Creates a new operation with the given ID.
    pub fn new(id: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            priority: 0,
            need_date_ms: None,
            release_ms: None,
            activities: Vec::new(),
            predecessors: Vec::new(),
            auto_split: AutoSplit::None,
            keep_with_predecessor: false,
            successor_continuity: ContinuityMode::None,
            keep_successors_time_limit_ms: 0,
            eligibility: HashMap::new(),
        }
    }

    /// Sets the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the need date (ms).
    pub fn with_need_date(mut self, need_date_ms: i64) -> Self {
        self.need_date_ms = Some(need_date_ms);
        self
    }

    /// Sets the release time (ms).
    pub fn with_release_time(mut self, release_ms: i64) -> Self {
        self.release_ms = Some(release_ms);
        self
    }

    /// Appends an activity ID.
    pub fn with_activity(mut self, activity_id: impl Into<String>) -> Self {
        self.activities.push(activity_id.into());
        self
    }

    /// Adds a predecessor without overlap.
    pub fn with_predecessor(self, operation_id: impl Into<String>) -> Self {
        self.with_overlapping_predecessor(operation_id, OverlapType::None)
    }

    /// Adds a predecessor with an overlap allowance.
    pub fn with_overlapping_predecessor(
        mut self,
        operation_id: impl Into<String>,
        overlap: OverlapType,
    ) -> Self {
        self.predecessors.push(PredecessorLink {
            operation_id: operation_id.into(),
            overlap,
        });
        self
    }

    /// Sets the auto-split policy.
    pub fn with_auto_split(mut self, auto_split: AutoSplit) -> Self {
        self.auto_split = auto_split;
        self
    }

    /// Requires this operation to follow its predecessor's resource.
    pub fn keeping_with_predecessor(mut self) -> Self {
        self.keep_with_predecessor = true;
        self
    }

    /// Sets the continuity imposed on successors and its time limit.
    pub fn with_successor_continuity(mut self, mode: ContinuityMode, time_limit_ms: i64) -> Self {
        self.successor_continuity = mode;
        self.keep_successors_time_limit_ms = time_limit_ms;
        self
    }

    /// Declares the resources eligible for this operation in a plant.
    pub fn with_eligible<I, S>(mut self, plant_id: impl Into<String>, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligibility
            .entry(plant_id.into())
            .or_default()
            .extend(resources.into_iter().map(Into::into));
        self
    }

    /// Whether the operation consists of more than one piece.
    pub fn is_split(&self) -> bool {
        self.activities.len() > 1
    }

    /// Whether `resource_id` is eligible for this operation in `plant_id`.
    pub fn is_eligible(&self, plant_id: &str, resource_id: &str) -> bool {
        self.eligibility
            .get(plant_id)
            .is_some_and(|set| set.contains(resource_id))
    }

    /// Primary predecessor link.
    pub fn first_predecessor(&self) -> Option<&PredecessorLink> {
        self.predecessors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_builder() {
        let op = Operation::new("OP20", "J1")
            .with_priority(5)
            .with_need_date(100_000)
            .with_release_time(1000)
            .with_activity("A1")
            .with_activity("A2")
            .with_predecessor("OP10")
            .with_auto_split(AutoSplit::KeepOnSameResource)
            .keeping_with_predecessor()
            .with_successor_continuity(ContinuityMode::KeepSuccessor, 500)
            .with_eligible("P1", ["M1", "M2"]);

        assert_eq!(op.priority, 5);
        assert_eq!(op.need_date_ms, Some(100_000));
        assert_eq!(op.release_ms, Some(1000));
        assert!(op.is_split());
        assert!(op.keep_with_predecessor);
        assert_eq!(op.keep_successors_time_limit_ms, 500);
        assert_eq!(op.first_predecessor().map(|l| l.operation_id.as_str()), Some("OP10"));
        assert!(op.is_eligible("P1", "M2"));
        assert!(!op.is_eligible("P1", "M3"));
        assert!(!op.is_eligible("P2", "M1"));
    }

    #[test]
    fn test_overlap_and_continuity_flags() {
        assert!(!OverlapType::None.allows_overlap());
        assert!(OverlapType::PercentComplete.allows_overlap());
        assert!(ContinuityMode::KeepSuccessorNoInterrupt.forbids_interruption());
        assert!(!ContinuityMode::KeepSuccessor.forbids_interruption());
    }

    #[test]
    fn test_single_piece_is_not_split() {
        let op = Operation::new("OP10", "J1").with_activity("A1");
        assert!(!op.is_split());
    }
}

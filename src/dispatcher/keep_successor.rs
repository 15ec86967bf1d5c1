//! Keep-successor continuity.
//!
//! Decides, per candidate and per cycle, whether a successor activity is tied
//! to the resource of its predecessor (or of its own earlier split pieces).

use crate::models::{Activity, AutoSplit, ScenarioView};

/// Outcome of the continuity check for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepSuccessor {
    /// No constraint.
    Normal,
    /// Leave the candidate out of this cycle.
    Skip,
    /// Only this candidate may be considered this cycle.
    Exclusive,
}

/// Evaluates keep-successor continuity of `successor` for `resource_id` at
/// `current_time_ms`.
///
/// 1. A partially scheduled split whose pieces must share a resource is
///    `Exclusive` on the resource of its latest-ending scheduled piece and
///    `Skip` everywhere else.
/// 2. An operation kept with its predecessor, whose predecessor is assigned
///    to a single-tasking resource eligible for the successor in that
///    resource's plant, is `Skip` on every other resource until the
///    predecessor's end plus its keep-successors time limit. On the
///    predecessor's own resource it is `Exclusive` if the predecessor forbids
///    interruption. Overlapping predecessors impose nothing.
/// 3. Otherwise `Normal`.
///
/// Pure function of the scenario state; re-evaluate every cycle.
pub fn keep_successor(
    scenario: &dyn ScenarioView,
    resource_id: &str,
    current_time_ms: i64,
    successor: &Activity,
) -> KeepSuccessor {
    let Some(operation) = scenario.operation_of(successor) else {
        return KeepSuccessor::Normal;
    };

    if operation.is_split() && operation.auto_split == AutoSplit::KeepOnSameResource {
        if let Some(latest) = scenario.latest_scheduled_piece(operation) {
            let fully_scheduled = operation
                .activities
                .iter()
                .filter_map(|id| scenario.activity(id))
                .all(Activity::is_scheduled);
            if !fully_scheduled {
                return if latest.primary_resource() == Some(resource_id) {
                    KeepSuccessor::Exclusive
                } else {
                    KeepSuccessor::Skip
                };
            }
        }
    }

    if !operation.keep_with_predecessor {
        return KeepSuccessor::Normal;
    }

    let Some((link, predecessor, predecessor_activity)) = scenario.first_predecessor(operation)
    else {
        return KeepSuccessor::Normal;
    };
    let Some(assignment) = predecessor_activity.assignment.as_ref() else {
        return KeepSuccessor::Normal;
    };
    if link.overlap.allows_overlap() {
        return KeepSuccessor::Normal;
    }

    let max_wait_ms = assignment
        .end_ms
        .saturating_add(predecessor.keep_successors_time_limit_ms);
    if current_time_ms > max_wait_ms {
        return KeepSuccessor::Normal;
    }

    let Some(predecessor_resource) = scenario.resource(&assignment.resource_id) else {
        return KeepSuccessor::Normal;
    };
    if predecessor_resource.is_single_tasking()
        && operation.is_eligible(&predecessor_resource.plant_id, &predecessor_resource.id)
    {
        if predecessor_resource.id != resource_id {
            return KeepSuccessor::Skip;
        }
        if predecessor.successor_continuity.forbids_interruption() {
            return KeepSuccessor::Exclusive;
        }
    }

    KeepSuccessor::Normal
}

//! Activity model.
//!
//! An activity is the smallest schedulable unit of work. It belongs to an
//! operation; an operation that has been split owns several activities
//! (pieces). Dispatchers never own activities, they refer to them by id.
//!
//! # Duration Model
//!
//! Each activity has three time components:
//! - **Setup**: Preparation time
//! - **Process**: Core work time
//! - **Teardown**: Cleanup/cooldown time
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2

use serde::{Deserialize, Serialize};

/// An activity (operation piece) to be dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    pub id: String,
    /// Owning operation identifier.
    pub operation_id: String,
    /// Time required to complete this activity.
    pub duration: ActivityDuration,
    /// Current scheduling state. `None` = unscheduled.
    pub assignment: Option<ResourceAssignment>,
}

/// Where and when a scheduled activity runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAssignment {
    /// Primary resource the activity is assigned to.
    pub resource_id: String,
    /// Scheduled start (ms).
    pub start_ms: i64,
    /// Scheduled end (ms).
    pub end_ms: i64,
}

impl Activity {
    /// Creates a new, unscheduled activity.
    pub fn new(id: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            operation_id: operation_id.into(),
            duration: ActivityDuration::default(),
            assignment: None,
        }
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration: ActivityDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the processing time (setup=0, teardown=0).
    pub fn with_process_time(mut self, process_ms: i64) -> Self {
        self.duration = ActivityDuration::fixed(process_ms);
        self
    }

    /// Marks the activity as scheduled on a resource.
    pub fn scheduled_on(mut self, resource_id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        self.schedule(resource_id, start_ms, end_ms);
        self
    }

    /// Assigns the activity to a resource and time slot.
    pub fn schedule(&mut self, resource_id: impl Into<String>, start_ms: i64, end_ms: i64) {
        self.assignment = Some(ResourceAssignment {
            resource_id: resource_id.into(),
            start_ms,
            end_ms,
        });
    }

    /// Clears the assignment.
    pub fn unschedule(&mut self) {
        self.assignment = None;
    }

    /// Whether the activity has been scheduled.
    pub fn is_scheduled(&self) -> bool {
        self.assignment.is_some()
    }

    /// Primary resource assignment, if scheduled.
    pub fn primary_resource(&self) -> Option<&str> {
        self.assignment.as_ref().map(|a| a.resource_id.as_str())
    }

    /// Scheduled end time, if scheduled.
    pub fn scheduled_end_ms(&self) -> Option<i64> {
        self.assignment.as_ref().map(|a| a.end_ms)
    }
}

/// Time components of an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDuration {
    /// Setup/preparation time (ms).
    pub setup_ms: i64,
    /// Core processing time (ms).
    pub process_ms: i64,
    /// Teardown/cleanup time (ms).
    pub teardown_ms: i64,
}

impl ActivityDuration {
    /// Creates a duration with all three components.
    pub fn new(setup_ms: i64, process_ms: i64, teardown_ms: i64) -> Self {
        Self {
            setup_ms,
            process_ms,
            teardown_ms,
        }
    }

    /// Creates a fixed-duration activity (setup=0, teardown=0).
    pub fn fixed(process_ms: i64) -> Self {
        Self::new(0, process_ms, 0)
    }

    /// Total duration (setup + process + teardown).
    pub fn total_ms(&self) -> i64 {
        self.setup_ms
            .saturating_add(self.process_ms)
            .saturating_add(self.teardown_ms)
    }
}

impl Default for ActivityDuration {
    fn default() -> Self {
        Self::fixed(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_builder() {
        let act = Activity::new("A1", "OP1").with_duration(ActivityDuration::new(100, 500, 50));

        assert_eq!(act.id, "A1");
        assert_eq!(act.operation_id, "OP1");
        assert_eq!(act.duration.total_ms(), 650);
        assert!(!act.is_scheduled());
        assert_eq!(act.primary_resource(), None);
        assert_eq!(act.scheduled_end_ms(), None);
    }

    #[test]
    fn test_schedule_and_unschedule() {
        let mut act = Activity::new("A1", "OP1").scheduled_on("M1", 1000, 4000);
        assert!(act.is_scheduled());
        assert_eq!(act.primary_resource(), Some("M1"));
        assert_eq!(act.scheduled_end_ms(), Some(4000));

        act.unschedule();
        assert!(!act.is_scheduled());
    }

    #[test]
    fn test_activity_duration_fixed() {
        let d = ActivityDuration::fixed(1000);
        assert_eq!(d.setup_ms, 0);
        assert_eq!(d.process_ms, 1000);
        assert_eq!(d.teardown_ms, 0);
        assert_eq!(d.total_ms(), 1000);
    }

    #[test]
    fn test_total_saturates() {
        let d = ActivityDuration::new(10, i64::MAX, 10);
        assert_eq!(d.total_ms(), i64::MAX);
    }
}

//! Scheduling context for dispatching rule evaluation.

use std::collections::HashMap;

/// Runtime state passed to dispatching rules.
///
/// Contains the current simulation clock, the resource being dispatched,
/// and optional statistics needed by context-aware rules.
///
/// All times are in milliseconds relative to the scheduling epoch (t=0).
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    /// Current simulation time (ms).
    pub current_time_ms: i64,
    /// Resource whose queue is being dispatched.
    pub resource_id: Option<String>,
    /// Queue arrival keys (activity_id → ms, or arrival sequence). Only their
    /// relative order matters.
    pub arrival_times: HashMap<String, i64>,
    /// Average processing time across candidates (for ATC normalization).
    pub average_processing_time: Option<f64>,
}

impl SchedulingContext {
    /// Creates a context at the given time.
    pub fn at_time(current_time_ms: i64) -> Self {
        Self {
            current_time_ms,
            ..Default::default()
        }
    }

    /// Sets the resource being dispatched.
    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Sets the queue arrival time of an activity.
    pub fn with_arrival_time(mut self, activity_id: impl Into<String>, time_ms: i64) -> Self {
        self.arrival_times.insert(activity_id.into(), time_ms);
        self
    }

    /// Sets the average processing time.
    pub fn with_average_processing_time(mut self, avg_ms: f64) -> Self {
        self.average_processing_time = Some(avg_ms);
        self
    }
}

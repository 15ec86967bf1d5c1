//! Scenario data as seen by the dispatch engine.
//!
//! The broader scenario (jobs, routings, persistence, locking) lives outside
//! this crate. Dispatchers read it only through [`ScenarioView`], and callers
//! are expected to hold whatever lock guards the scenario for the whole
//! dispatch cycle.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Activity, Operation, PredecessorLink, Resource};
use crate::validation::{validate_input, ValidationError};

/// Read-only queries the dispatch engine needs from the scenario.
pub trait ScenarioView {
    /// Looks up an activity.
    fn activity(&self, id: &str) -> Option<&Activity>;

    /// Looks up an operation.
    fn operation(&self, id: &str) -> Option<&Operation>;

    /// Looks up a resource.
    fn resource(&self, id: &str) -> Option<&Resource>;

    /// Operation owning an activity.
    fn operation_of(&self, activity: &Activity) -> Option<&Operation> {
        self.operation(&activity.operation_id)
    }

    /// First activity of the primary predecessor of `operation`.
    ///
    /// Returns the link together with the predecessor operation and activity.
    fn first_predecessor<'a>(
        &'a self,
        operation: &'a Operation,
    ) -> Option<(&'a PredecessorLink, &'a Operation, &'a Activity)> {
        let link = operation.first_predecessor()?;
        let predecessor = self.operation(&link.operation_id)?;
        let activity = predecessor
            .activities
            .first()
            .and_then(|id| self.activity(id))?;
        Some((link, predecessor, activity))
    }

    /// Scheduled piece of `operation` with the latest end time.
    fn latest_scheduled_piece<'a>(&'a self, operation: &'a Operation) -> Option<&'a Activity> {
        operation
            .activities
            .iter()
            .filter_map(|id| self.activity(id))
            .filter_map(|a| a.scheduled_end_ms().map(|end| (end, a)))
            .max_by_key(|(end, _)| *end)
            .map(|(_, a)| a)
    }
}

/// In-memory scenario store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    activities: HashMap<String, Activity>,
    operations: HashMap<String, Operation>,
    resources: HashMap<String, Resource>,
}

impl Scenario {
    /// Creates an empty scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the parts and assembles a scenario from them.
    pub fn from_parts(
        operations: Vec<Operation>,
        activities: Vec<Activity>,
        resources: Vec<Resource>,
    ) -> Result<Self, Vec<ValidationError>> {
        validate_input(&operations, &activities, &resources)?;

        let mut scenario = Self::new();
        for r in resources {
            scenario.insert_resource(r);
        }
        for op in operations {
            scenario.insert_operation(op);
        }
        for act in activities {
            scenario.insert_activity(act);
        }
        Ok(scenario)
    }

    /// Adds a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.insert_resource(resource);
        self
    }

    /// Adds an operation.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.insert_operation(operation);
        self
    }

    /// Adds an activity, registering it with its operation if not yet listed.
    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.insert_activity(activity);
        self
    }

    /// Inserts or replaces a resource.
    pub fn insert_resource(&mut self, resource: Resource) {
        self.resources.insert(resource.id.clone(), resource);
    }

    /// Inserts or replaces an operation.
    pub fn insert_operation(&mut self, operation: Operation) {
        self.operations.insert(operation.id.clone(), operation);
    }

    /// Inserts or replaces an activity.
    pub fn insert_activity(&mut self, activity: Activity) {
        if let Some(op) = self.operations.get_mut(&activity.operation_id) {
            if !op.activities.contains(&activity.id) {
                op.activities.push(activity.id.clone());
            }
        }
        self.activities.insert(activity.id.clone(), activity);
    }

    /// Mutable access to an activity, e.g. to record an assignment.
    pub fn activity_mut(&mut self, id: &str) -> Option<&mut Activity> {
        self.activities.get_mut(id)
    }

    /// Number of activities.
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }
}

impl ScenarioView for Scenario {
    fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    fn operation(&self, id: &str) -> Option<&Operation> {
        self.operations.get(id)
    }

    fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }
}

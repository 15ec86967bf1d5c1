//! Resource model.
//!
//! Resources are the capacity providers that activities are dispatched to:
//! machines, cells, work centers, crews. The dispatch engine only cares about
//! identity, the owning plant, and the capacity model (single-tasking or not).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A resource that activities can be dispatched to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Plant (site) the resource belongs to.
    pub plant_id: String,
    /// How many activities the resource can process at once.
    pub capacity_type: CapacityType,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

/// Capacity model of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapacityType {
    /// Processes exactly one activity at a time.
    SingleTasking,
    /// Processes up to `capacity` activities concurrently.
    MultiTasking {
        /// Number of concurrent activities.
        capacity: u32,
    },
    /// No concurrency limit.
    Infinite,
}

impl Resource {
    /// Creates a resource with the given capacity model.
    pub fn new(id: impl Into<String>, capacity_type: CapacityType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            plant_id: String::new(),
            capacity_type,
            attributes: HashMap::new(),
        }
    }

    /// Creates a single-tasking resource.
    pub fn single_tasking(id: impl Into<String>) -> Self {
        Self::new(id, CapacityType::SingleTasking)
    }

    /// Creates a multi-tasking resource.
    pub fn multi_tasking(id: impl Into<String>, capacity: u32) -> Self {
        Self::new(id, CapacityType::MultiTasking { capacity })
    }

    /// Creates an infinite-capacity resource.
    pub fn infinite(id: impl Into<String>) -> Self {
        Self::new(id, CapacityType::Infinite)
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owning plant.
    pub fn with_plant(mut self, plant_id: impl Into<String>) -> Self {
        self.plant_id = plant_id.into();
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the resource processes one activity at a time.
    pub fn is_single_tasking(&self) -> bool {
        self.capacity_type == CapacityType::SingleTasking
    }
}

//! Scheduling domain models consumed by the dispatch engine.
//!
//! These types are a narrow, read-only slice of the broader scenario: just
//! enough of activities, operations and resources for dispatching rules and
//! keep-successor continuity to be evaluated.
//!
//! # Domain Mappings
//!
//! | u-dispatch | Manufacturing | Healthcare | Logistics |
//! |------------|--------------|------------|-----------|
//! | Operation | Routing step | Procedure | Transport Leg |
//! | Activity | Operation piece | Session | Load |
//! | Resource | Machine/Cell | Room/Doctor | Truck/Dock |

mod activity;
mod operation;
mod resource;
mod scenario;

pub use activity::{Activity, ActivityDuration, ResourceAssignment};
pub use operation::{AutoSplit, ContinuityMode, Operation, OverlapType, PredecessorLink};
pub use resource::{CapacityType, Resource};
pub use scenario::{Scenario, ScenarioView};

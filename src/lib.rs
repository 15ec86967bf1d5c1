//! Ready-activity dispatching for finite-capacity schedulers.
//!
//! A scheduler asks each resource, at every decision time, which of the
//! activities waiting for it should run next. This crate answers that
//! question: candidates are collected per resource, optionally filtered by
//! keep-successor continuity, ranked by a configurable definition and
//! served one by one.
//!
//! # Modules
//!
//! - **`models`**: Read-only scenario: `Operation`, `Activity`, `Resource`,
//!   and the `ScenarioView` seam the dispatchers consult
//! - **`dispatching`**: Priority rules (SPT, EDD, ATC, ...), the `RuleEngine`
//!   that combines them, and `DispatcherDefinition`s built from it
//! - **`dispatcher`**: `ArrayListDispatcher`, `SortedListDispatcher`,
//!   keep-successor evaluation, composite ranking and detached cursors
//! - **`validation`**: Input integrity checks (duplicate IDs, predecessor
//!   cycles, dangling references)
//! - **`error`**: `DispatchError`
//!
//! # Cycle
//!
//! ```text
//! add / remove ... begin_dispatch(time) -> next_activity()* -> end_dispatch
//! ```
//!
//! Candidates may be added or removed at any point, including between
//! `next_activity` calls of the same cycle.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Vepsalainen & Morton (1987), "Priority Rules for Job Shops with Weighted Tardiness Costs"

pub mod dispatcher;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod validation;

pub use error::{DispatchError, DispatchResult, IteratorMisuse};

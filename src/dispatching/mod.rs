//! Dispatching rules, rule engine, and dispatcher definitions.
//!
//! Provides priority-based dispatching rules (SPT, EDD, ATC, etc.), a
//! composable rule engine for multi-criteria prioritization, and the
//! [`DispatcherDefinition`] that turns a rule engine into sort keys and a
//! comparator for [`SortedListDispatcher`](crate::dispatcher::SortedListDispatcher).
//!
//! # Usage
//!
//! ```
//! use u_dispatch::dispatching::{RuleDefinition, RuleEngine};
//! use u_dispatch::dispatching::rules;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Edd)
//!     .with_tie_breaker(rules::Spt);
//! let definition = RuleDefinition::new("EDD+SPT", engine);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod config;
mod context;
mod definition;
mod engine;
pub mod rules;

pub use config::{DispatchConfig, RuleConfig, RuleKind};
pub use context::SchedulingContext;
pub use definition::{DispatcherDefinition, RuleDefinition};
pub use engine::{EvaluationMode, RuleEngine, TieBreaker, SIGNIFICANT_DIGITS};

use crate::models::{Activity, Operation, ScenarioView};
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (dispatched first).
pub type RuleScore = f64;

/// A stored activity resolved against the scenario, as seen by rules.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The activity being ranked.
    pub activity: &'a Activity,
    /// Its owning operation.
    pub operation: &'a Operation,
}

impl<'a> Candidate<'a> {
    /// Resolves an activity ID into a candidate.
    ///
    /// Returns `None` if the activity or its operation is unknown.
    pub fn resolve(scenario: &'a dyn ScenarioView, activity_id: &str) -> Option<Self> {
        let activity = scenario.activity(activity_id)?;
        let operation = scenario.operation_of(activity)?;
        Some(Self {
            activity,
            operation,
        })
    }

    /// Activity ID.
    pub fn id(&self) -> &str {
        &self.activity.id
    }

    /// Processing time of the activity (ms).
    pub fn processing_ms(&self) -> i64 {
        self.activity.duration.total_ms()
    }
}

/// A dispatching rule that evaluates candidate priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for activities that should be dispatched first.
///
/// # Reference
/// Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a candidate given the current scheduling context.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scenario;

    #[test]
    fn test_candidate_resolve() {
        let scenario = Scenario::new()
            .with_operation(Operation::new("OP10", "J1"))
            .with_activity(Activity::new("A10", "OP10").with_process_time(700))
            .with_activity(Activity::new("ORPHAN", "NOPE"));

        let c = Candidate::resolve(&scenario, "A10").unwrap();
        assert_eq!(c.id(), "A10");
        assert_eq!(c.operation.id, "OP10");
        assert_eq!(c.processing_ms(), 700);

        assert!(Candidate::resolve(&scenario, "ORPHAN").is_none());
        assert!(Candidate::resolve(&scenario, "MISSING").is_none());
    }
}

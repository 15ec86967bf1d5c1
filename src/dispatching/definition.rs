//! Dispatcher definitions: how candidates are keyed and compared.

use std::cmp::Ordering;
use std::fmt::Debug;

use super::{Candidate, RuleEngine, RuleScore, SchedulingContext, TieBreaker};
use crate::dispatcher::{KeyAndActivity, SortKey};

/// Configuration that ranks candidates for a [`SortedListDispatcher`].
///
/// Definitions are immutable and shared between dispatchers.
///
/// [`SortedListDispatcher`]: crate::dispatcher::SortedListDispatcher
pub trait DispatcherDefinition: Send + Sync + Debug {
    /// Definition name, for diagnostics.
    fn name(&self) -> &str;

    /// Builds the sort key of a candidate.
    ///
    /// Returning `None` excludes the candidate from the current cycle.
    fn create_key(
        &self,
        candidate: &Candidate<'_>,
        insertion_index: usize,
        context: &SchedulingContext,
    ) -> Option<SortKey>;

    /// Total order over ranked entries. `Less` is dispatched first.
    fn compare(&self, a: &KeyAndActivity, b: &KeyAndActivity) -> Ordering {
        a.cmp(b)
    }
}

/// A definition backed by a [`RuleEngine`].
///
/// Candidates whose primary score exceeds the optional score limit get no
/// key and sit out the cycle.
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    name: String,
    engine: RuleEngine,
    score_limit: Option<RuleScore>,
}

impl RuleDefinition {
    /// Creates a definition from a rule engine.
    pub fn new(name: impl Into<String>, engine: RuleEngine) -> Self {
        Self {
            name: name.into(),
            engine,
            score_limit: None,
        }
    }

    /// Rejects candidates whose primary score is above `limit`.
    pub fn with_score_limit(mut self, limit: RuleScore) -> Self {
        self.score_limit = Some(limit);
        self
    }

    /// The underlying rule engine.
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }
}

impl DispatcherDefinition for RuleDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_key(
        &self,
        candidate: &Candidate<'_>,
        insertion_index: usize,
        context: &SchedulingContext,
    ) -> Option<SortKey> {
        let scores = self.engine.key_scores(candidate, context);
        if let (Some(limit), Some(primary)) = (self.score_limit, scores.first()) {
            if *primary > limit || primary.is_nan() {
                return None;
            }
        }
        Some(SortKey::new(scores, insertion_index))
    }

    fn compare(&self, a: &KeyAndActivity, b: &KeyAndActivity) -> Ordering {
        let by_rules = self.engine.compare_scores(a.key().scores(), b.key().scores());
        let by_id = match self.engine.tie_breaker() {
            TieBreaker::ById => a.activity_id().cmp(b.activity_id()),
            TieBreaker::InsertionOrder => Ordering::Equal,
        };
        by_rules
            .then(by_id)
            .then(a.key().insertion_index().cmp(&b.key().insertion_index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{Activity, Operation};

    fn parts(id: &str, duration_ms: i64) -> (Activity, Operation) {
        (
            Activity::new(id, "OP").with_process_time(duration_ms),
            Operation::new("OP", "J"),
        )
    }

    fn candidate<'a>(p: &'a (Activity, Operation)) -> Candidate<'a> {
        Candidate {
            activity: &p.0,
            operation: &p.1,
        }
    }

    #[test]
    fn test_score_limit_rejects() {
        let ctx = SchedulingContext::at_time(0);
        let def = RuleDefinition::new("SPT", RuleEngine::new().with_rule(rules::Spt))
            .with_score_limit(2000.0);

        let short = parts("short", 1000);
        let edge = parts("edge", 2000);
        let long = parts("long", 5000);
        assert!(def.create_key(&candidate(&short), 0, &ctx).is_some());
        assert!(def.create_key(&candidate(&edge), 1, &ctx).is_some());
        assert!(def.create_key(&candidate(&long), 2, &ctx).is_none());
    }

    #[test]
    fn test_compare_insertion_order_on_tie() {
        let def = RuleDefinition::new("SPT", RuleEngine::new().with_rule(rules::Spt));
        let first = KeyAndActivity::new(SortKey::single(10.0, 0), "Z");
        let second = KeyAndActivity::new(SortKey::single(10.0, 1), "A");
        assert_eq!(def.compare(&first, &second), Ordering::Less);
    }

    #[test]
    fn test_compare_by_id_on_tie() {
        let def = RuleDefinition::new(
            "SPT",
            RuleEngine::new()
                .with_rule(rules::Spt)
                .with_final_tie_breaker(TieBreaker::ById),
        );
        let first = KeyAndActivity::new(SortKey::single(10.0, 0), "Z");
        let second = KeyAndActivity::new(SortKey::single(10.0, 1), "A");
        assert_eq!(def.compare(&first, &second), Ordering::Greater);
    }

    #[test]
    fn test_compare_by_score() {
        let def = RuleDefinition::new("SPT", RuleEngine::new().with_rule(rules::Spt));
        let slow = KeyAndActivity::new(SortKey::single(50.0, 0), "S");
        let fast = KeyAndActivity::new(SortKey::single(10.0, 1), "F");
        assert_eq!(def.compare(&fast, &slow), Ordering::Less);
        assert_eq!(def.name(), "SPT");
    }
}

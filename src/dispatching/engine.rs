//! Rule engine for multi-criteria dispatching.
//!
//! Composes multiple dispatching rules with configurable evaluation modes
//! and tie-breaking strategies. The engine produces the score vector stored
//! in a [`SortKey`](crate::dispatcher::SortKey) and compares two such vectors.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use super::{Candidate, DispatchingRule, RuleScore, SchedulingContext};

/// How multiple rules are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    /// Keep insertion order (default).
    #[default]
    InsertionOrder,
    /// Deterministic by activity ID (lexicographic).
    ById,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn DispatchingRule>,
    weight: f64,
}

/// A composable rule engine for candidate prioritization.
///
/// Supports sequential multi-layer evaluation (primary rule → tie-breaker)
/// and weighted combination modes.
///
/// # Example
/// ```
/// use u_dispatch::dispatching::RuleEngine;
/// use u_dispatch::dispatching::rules;
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Edd)
///     .with_tie_breaker(rules::Spt);
/// assert_eq!(engine.rule_names(), vec!["EDD", "SPT"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::InsertionOrder,
        }
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_shared_rule(Arc::new(rule), 1.0)
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(self, rule: R, weight: f64) -> Self {
        self.with_shared_rule(Arc::new(rule), weight)
    }

    /// Adds a tie-breaking rule (weight 0.0, used only in Sequential mode).
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_shared_rule(Arc::new(rule), 0.0)
    }

    /// Adds an already shared rule with a weight.
    pub fn with_shared_rule(mut self, rule: Arc<dyn DispatchingRule>, weight: f64) -> Self {
        self.rules.push(WeightedRule { rule, weight });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Final tie-breaking strategy.
    pub fn tie_breaker(&self) -> TieBreaker {
        self.tie_breaker
    }

    /// Evaluation mode.
    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Evaluates a candidate and returns weighted scores from each rule.
    pub fn evaluate(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(candidate, context) * wr.weight)
            .collect()
    }

    /// Score vector used as a sort key.
    ///
    /// Sequential mode keeps one raw score per rule; weighted mode collapses
    /// them into a single weighted sum.
    pub fn key_scores(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> Vec<RuleScore> {
        match self.mode {
            EvaluationMode::Sequential => self
                .rules
                .iter()
                .map(|wr| wr.rule.evaluate(candidate, context))
                .collect(),
            EvaluationMode::Weighted => vec![self.evaluate(candidate, context).iter().sum()],
        }
    }

    /// Compares two score vectors produced by [`key_scores`](Self::key_scores).
    ///
    /// Scores are compared after rounding to [`SIGNIFICANT_DIGITS`], so
    /// floating-point noise ties while scores of any magnitude still rank.
    /// The comparison is a total order.
    ///
    /// Returns `Equal` when all rules tie; the caller applies the final
    /// tie-breaker.
    pub fn compare_scores(&self, a: &[RuleScore], b: &[RuleScore]) -> Ordering {
        a.iter()
            .zip(b)
            .map(|(score_a, score_b)| snap(*score_a).total_cmp(&snap(*score_b)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Significant decimal digits kept when comparing rule scores.
pub const SIGNIFICANT_DIGITS: i32 = 12;

/// Rounds a score to [`SIGNIFICANT_DIGITS`]. Zero, infinities and NaN pass
/// through; `-0.0` becomes `0.0`.
fn snap(score: RuleScore) -> RuleScore {
    if score == 0.0 {
        return 0.0;
    }
    if !score.is_finite() {
        return score;
    }
    let exponent = SIGNIFICANT_DIGITS - 1 - score.abs().log10().floor() as i32;
    let scale = 10f64.powi(exponent);
    let snapped = (score * scale).round() / scale;
    if snapped.is_finite() && scale.is_finite() && scale != 0.0 {
        snapped
    } else {
        score
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::{Activity, Operation};

    fn parts(id: &str, duration_ms: i64, need_date: Option<i64>) -> (Activity, Operation) {
        let mut op = Operation::new(format!("{id}_OP"), "J");
        op.need_date_ms = need_date;
        (
            Activity::new(id, format!("{id}_OP")).with_process_time(duration_ms),
            op,
        )
    }

    fn candidate<'a>(p: &'a (Activity, Operation)) -> Candidate<'a> {
        Candidate {
            activity: &p.0,
            operation: &p.1,
        }
    }

    #[test]
    fn test_sequential_key_scores() {
        let p = parts("A", 3000, Some(20_000));
        let ctx = SchedulingContext::at_time(0);
        let engine = RuleEngine::new()
            .with_rule(rules::Edd)
            .with_tie_breaker(rules::Spt);

        let scores = engine.key_scores(&candidate(&p), &ctx);
        assert_eq!(scores, vec![20_000.0, 3000.0]);
    }

    #[test]
    fn test_sequential_compare_uses_tie_breaker() {
        let a = parts("A", 1000, Some(10_000));
        let b = parts("B", 2000, Some(10_000));
        let ctx = SchedulingContext::at_time(0);
        let engine = RuleEngine::new()
            .with_rule(rules::Edd)
            .with_tie_breaker(rules::Spt);

        let ka = engine.key_scores(&candidate(&a), &ctx);
        let kb = engine.key_scores(&candidate(&b), &ctx);
        // EDD ties → SPT breaks it → A (shorter) first
        assert_eq!(engine.compare_scores(&ka, &kb), Ordering::Less);
    }

    #[test]
    fn test_weighted_mode() {
        let a = parts("A", 1000, Some(50_000));
        let b = parts("B", 5000, Some(10_000));
        let ctx = SchedulingContext::at_time(0);
        let engine = RuleEngine::new()
            .with_mode(EvaluationMode::Weighted)
            .with_weighted_rule(rules::Edd, 0.5)
            .with_weighted_rule(rules::Spt, 0.5);

        // A: 0.5*50000 + 0.5*1000 = 25500
        // B: 0.5*10000 + 0.5*5000 = 7500
        let ka = engine.key_scores(&candidate(&a), &ctx);
        let kb = engine.key_scores(&candidate(&b), &ctx);
        assert_eq!(ka, vec![25_500.0]);
        assert_eq!(engine.compare_scores(&kb, &ka), Ordering::Less);
    }

    #[test]
    fn test_full_tie_is_equal() {
        let a = parts("A", 1000, None);
        let b = parts("B", 1000, None);
        let ctx = SchedulingContext::at_time(0);
        let engine = RuleEngine::new().with_rule(rules::Spt);

        let ka = engine.key_scores(&candidate(&a), &ctx);
        let kb = engine.key_scores(&candidate(&b), &ctx);
        assert_eq!(engine.compare_scores(&ka, &kb), Ordering::Equal);
    }

    #[test]
    fn test_tiny_scores_still_rank() {
        let hour = 3_600_000;
        let short = parts("short30h", 30 * hour, None);
        let long = parts("long31h", 31 * hour, None);
        let ctx = SchedulingContext::at_time(0).with_average_processing_time(30.5 * hour as f64);

        for engine in [
            RuleEngine::new().with_rule(rules::Wspt),
            RuleEngine::new().with_rule(rules::Atc::default()),
        ] {
            let ks = engine.key_scores(&candidate(&short), &ctx);
            let kl = engine.key_scores(&candidate(&long), &ctx);
            assert!(ks[0].abs() < 1e-7);
            assert_eq!(engine.compare_scores(&ks, &kl), Ordering::Less);
            assert_eq!(engine.compare_scores(&kl, &ks), Ordering::Greater);
        }
    }

    #[test]
    fn test_rounding_noise_ties() {
        let engine = RuleEngine::new().with_rule(rules::Spt);
        assert_eq!(engine.compare_scores(&[0.1 + 0.2], &[0.3]), Ordering::Equal);
        assert_eq!(engine.compare_scores(&[-0.0], &[0.0]), Ordering::Equal);
        assert_eq!(engine.compare_scores(&[f64::MAX], &[1.0]), Ordering::Greater);
        assert_eq!(engine.compare_scores(&[f64::NAN], &[f64::MAX]), Ordering::Greater);
    }

    #[test]
    fn test_comparison_is_transitive_across_close_scores() {
        // Adjacent scores a few ulps apart must not chain into a tie.
        let scores: Vec<f64> = (0..50).map(|i| 1e-8 + i as f64 * 1e-19).collect();
        let engine = RuleEngine::new().with_rule(rules::Spt);
        for w in scores.windows(3) {
            let ab = engine.compare_scores(&[w[0]], &[w[1]]);
            let bc = engine.compare_scores(&[w[1]], &[w[2]]);
            let ac = engine.compare_scores(&[w[0]], &[w[2]]);
            if ab == bc {
                assert_eq!(ac, ab);
            }
            if ab == Ordering::Equal {
                assert_eq!(ac, bc);
            }
        }
    }

    #[test]
    fn test_evaluate_scores() {
        let p = parts("T1", 3000, Some(20_000));
        let ctx = SchedulingContext::at_time(0);
        let engine = RuleEngine::new()
            .with_rule(rules::Spt)
            .with_weighted_rule(rules::Edd, 2.0);

        let scores = engine.evaluate(&candidate(&p), &ctx);
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 3000.0).abs() < 1e-10);
        assert!((scores[1] - 40_000.0).abs() < 1e-10);
    }
}

//! Serializable dispatcher configuration.
//!
//! ```
//! use u_dispatch::dispatching::{DispatchConfig, DispatcherDefinition};
//!
//! let config: DispatchConfig = serde_json::from_str(r#"{
//!     "name": "due-date",
//!     "rules": [{ "rule": "EDD" }, { "rule": "SPT", "tie_breaker": true }]
//! }"#).unwrap();
//! let definition = config.into_definition();
//! assert_eq!(definition.name(), "due-date");
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::rules::{Atc, Cr, Edd, Fifo, Lpt, Mst, Priority, Spt, Wspt};
use super::{DispatchingRule, EvaluationMode, RuleDefinition, RuleEngine, RuleScore, TieBreaker};

/// Configuration of a rule-based dispatcher definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Definition name.
    pub name: String,
    /// How rules are combined.
    #[serde(default)]
    pub mode: EvaluationMode,
    /// Rules in evaluation order.
    pub rules: Vec<RuleConfig>,
    /// Final tie-breaking strategy.
    #[serde(default)]
    pub tie_breaker: TieBreaker,
    /// Candidates with a primary score above this limit are not dispatched.
    #[serde(default)]
    pub score_limit: Option<RuleScore>,
}

/// One rule entry of a [`DispatchConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Which rule.
    pub rule: RuleKind,
    /// Weight in weighted mode.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Adds the rule with weight 0 (sequential tie-breaker only).
    #[serde(default)]
    pub tie_breaker: bool,
    /// ATC lookahead parameter.
    #[serde(default)]
    pub k: Option<f64>,
}

fn default_weight() -> f64 {
    1.0
}

/// Built-in rule names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleKind {
    /// Shortest Processing Time.
    Spt,
    /// Longest Processing Time.
    Lpt,
    /// Weighted Shortest Processing Time.
    Wspt,
    /// Earliest Due Date.
    Edd,
    /// Minimum Slack Time.
    Mst,
    /// Critical Ratio.
    Cr,
    /// Apparent Tardiness Cost.
    Atc,
    /// First In First Out.
    Fifo,
    /// Operation priority.
    Priority,
}

impl RuleConfig {
    fn build_rule(&self) -> Arc<dyn DispatchingRule> {
        match self.rule {
            RuleKind::Spt => Arc::new(Spt),
            RuleKind::Lpt => Arc::new(Lpt),
            RuleKind::Wspt => Arc::new(Wspt),
            RuleKind::Edd => Arc::new(Edd),
            RuleKind::Mst => Arc::new(Mst),
            RuleKind::Cr => Arc::new(Cr),
            RuleKind::Atc => Arc::new(self.k.map(Atc::with_k).unwrap_or_default()),
            RuleKind::Fifo => Arc::new(Fifo),
            RuleKind::Priority => Arc::new(Priority),
        }
    }
}

impl DispatchConfig {
    /// Builds the rule engine described by this configuration.
    pub fn build_engine(&self) -> RuleEngine {
        self.rules.iter().fold(
            RuleEngine::new()
                .with_mode(self.mode)
                .with_final_tie_breaker(self.tie_breaker),
            |engine, rc| {
                let weight = if rc.tie_breaker { 0.0 } else { rc.weight };
                engine.with_shared_rule(rc.build_rule(), weight)
            },
        )
    }

    /// Builds the dispatcher definition described by this configuration.
    pub fn into_definition(self) -> RuleDefinition {
        let engine = self.build_engine();
        let definition = RuleDefinition::new(self.name, engine);
        match self.score_limit {
            Some(limit) => definition.with_score_limit(limit),
            None => definition,
        }
    }
}

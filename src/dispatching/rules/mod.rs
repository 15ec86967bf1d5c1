//! Built-in dispatching rules.
//!
//! # Categories
//!
//! - **Time-based**: SPT, LPT, WSPT
//! - **Due-date**: EDD, MST, CR, ATC
//! - **Queue**: FIFO
//! - **Priority**: PRIORITY
//!
//! # Score Convention
//! All rules return lower scores for higher priority candidates.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use super::{Candidate, DispatchingRule, RuleScore, SchedulingContext};

// ======================== Time-based rules ========================

/// Shortest Processing Time.
///
/// Prioritizes activities with shorter processing time.
/// Minimizes average flow time and WIP (Work-In-Process).
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &SchedulingContext) -> RuleScore {
        candidate.processing_ms() as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &SchedulingContext) -> RuleScore {
        -(candidate.processing_ms() as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

/// Weighted Shortest Processing Time.
///
/// Prioritizes by the ratio of importance to processing time.
/// Weight grows with operation priority: `weight = priority + 1`.
///
/// # Reference
/// Smith (1956), optimal for minimizing weighted mean flow time.
#[derive(Debug, Clone, Copy)]
pub struct Wspt;

impl DispatchingRule for Wspt {
    fn name(&self) -> &'static str {
        "WSPT"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &SchedulingContext) -> RuleScore {
        let processing_time = candidate.processing_ms() as f64;
        if processing_time <= 0.0 {
            return f64::MAX;
        }
        let weight = weight_of(candidate);
        -(weight / processing_time)
    }

    fn description(&self) -> &'static str {
        "Weighted Shortest Processing Time"
    }
}

fn weight_of(candidate: &Candidate<'_>) -> f64 {
    (candidate.operation.priority as f64 + 1.0).max(1.0)
}

// ======================== Due-date rules ========================

/// Earliest Due Date.
///
/// Prioritizes activities whose operation is needed earliest. Operations
/// without a need date are assigned lowest priority.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &SchedulingContext) -> RuleScore {
        candidate
            .operation
            .need_date_ms
            .map(|d| d as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

/// Minimum Slack Time.
///
/// Slack = (need_date - current_time) - processing_time.
/// Operations without a need date get maximum slack.
#[derive(Debug, Clone, Copy)]
pub struct Mst;

impl DispatchingRule for Mst {
    fn name(&self) -> &'static str {
        "MST"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> RuleScore {
        let Some(need) = candidate.operation.need_date_ms else {
            return f64::MAX;
        };
        need.saturating_sub(context.current_time_ms)
            .saturating_sub(candidate.processing_ms()) as f64
    }

    fn description(&self) -> &'static str {
        "Minimum Slack Time"
    }
}

/// Critical Ratio.
///
/// CR = (need_date - current_time) / processing_time.
/// - CR < 1.0: behind schedule
/// - CR = 1.0: on track
/// - CR > 1.0: ahead of schedule
#[derive(Debug, Clone, Copy)]
pub struct Cr;

impl DispatchingRule for Cr {
    fn name(&self) -> &'static str {
        "CR"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> RuleScore {
        let Some(need) = candidate.operation.need_date_ms else {
            return f64::MAX;
        };
        let remaining = candidate.processing_ms();
        if remaining <= 0 {
            return f64::MAX;
        }
        need.saturating_sub(context.current_time_ms) as f64 / remaining as f64
    }

    fn description(&self) -> &'static str {
        "Critical Ratio"
    }
}

/// Apparent Tardiness Cost.
///
/// Combines WSPT with due-date urgency using an exponential function.
/// The parameter `k` controls the balance:
/// - k > 2: more SPT-like (processing time dominates)
/// - k < 2: more EDD-like (due date dominates)
///
/// # Reference
/// Vepsalainen & Morton (1987), "Priority Rules for Job Shops with
/// Weighted Tardiness Costs"
#[derive(Debug, Clone, Copy)]
pub struct Atc {
    /// Lookahead parameter (default: 2.0).
    pub k: f64,
}

impl Default for Atc {
    fn default() -> Self {
        Self { k: 2.0 }
    }
}

impl Atc {
    /// Creates an ATC rule with custom k parameter.
    pub fn with_k(k: f64) -> Self {
        Self { k }
    }
}

impl DispatchingRule for Atc {
    fn name(&self) -> &'static str {
        "ATC"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> RuleScore {
        let processing_time = candidate.processing_ms() as f64;
        if processing_time <= 0.0 {
            return f64::MAX;
        }

        let weight = weight_of(candidate);
        let Some(need) = candidate.operation.need_date_ms else {
            return -(weight / processing_time);
        };

        let slack = need as f64 - processing_time - context.current_time_ms as f64;
        let p_avg = context
            .average_processing_time
            .unwrap_or(processing_time)
            .max(1.0);

        let urgency = if slack <= 0.0 {
            1.0
        } else {
            (-slack / (self.k * p_avg)).exp()
        };

        -(weight / processing_time * urgency)
    }

    fn description(&self) -> &'static str {
        "Apparent Tardiness Cost"
    }
}

// ======================== Queue rules ========================

/// First In First Out.
///
/// Orders by queue arrival from `context.arrival_times`, which
/// [`SortedListDispatcher`](crate::dispatcher::SortedListDispatcher) fills
/// with the order candidates were added. Candidates missing from the map
/// fall back to the operation's release time.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, context: &SchedulingContext) -> RuleScore {
        context
            .arrival_times
            .get(candidate.id())
            .copied()
            .unwrap_or_else(|| candidate.operation.release_ms.unwrap_or(0)) as f64
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

// ======================== Priority-based rule ========================

/// Simple priority rule.
///
/// Prioritizes operations with higher `priority` values.
#[derive(Debug, Clone, Copy)]
pub struct Priority;

impl DispatchingRule for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, candidate: &Candidate<'_>, _context: &SchedulingContext) -> RuleScore {
        -(candidate.operation.priority as f64)
    }

    fn description(&self) -> &'static str {
        "Operation Priority"
    }
}

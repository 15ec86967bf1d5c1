//! Sort keys and the (key, activity) pairs ranked by a dispatch cycle.

use std::cmp::Ordering;
use std::fmt;

use crate::dispatching::RuleScore;

/// Dispatch score of a candidate plus its insertion index.
///
/// The insertion index is the candidate's position among the entries kept in
/// the current cycle; it is the final, stable tie-break.
#[derive(Debug, Clone)]
pub struct SortKey {
    scores: Vec<RuleScore>,
    insertion_index: usize,
}

impl SortKey {
    /// Creates a key from a score vector.
    pub fn new(scores: Vec<RuleScore>, insertion_index: usize) -> Self {
        Self {
            scores,
            insertion_index,
        }
    }

    /// Creates a key holding a single score.
    pub fn single(score: RuleScore, insertion_index: usize) -> Self {
        Self::new(vec![score], insertion_index)
    }

    /// All scores, most significant first.
    pub fn scores(&self) -> &[RuleScore] {
        &self.scores
    }

    /// Most significant score.
    pub fn primary_score(&self) -> Option<RuleScore> {
        self.scores.first().copied()
    }

    /// Position among the candidates kept in the cycle that built this key.
    pub fn insertion_index(&self) -> usize {
        self.insertion_index
    }

    /// Total order over scores (lexicographic, `f64::total_cmp`).
    pub fn cmp_scores(&self, other: &Self) -> Ordering {
        self.scores
            .iter()
            .zip(&other.scores)
            .map(|(a, b)| a.total_cmp(b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| self.scores.len().cmp(&other.scores.len()))
    }
}

/// An immutable pair of a sort key and the activity it ranks.
#[derive(Debug, Clone)]
pub struct KeyAndActivity {
    key: SortKey,
    activity_id: String,
}

impl KeyAndActivity {
    /// Pairs a key with an activity.
    pub fn new(key: SortKey, activity_id: impl Into<String>) -> Self {
        Self {
            key,
            activity_id: activity_id.into(),
        }
    }

    /// The sort key.
    pub fn key(&self) -> &SortKey {
        &self.key
    }

    /// The ranked activity.
    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }
}

/// Natural order: scores, then insertion index, then activity ID.
impl Ord for KeyAndActivity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp_scores(&other.key)
            .then(self.key.insertion_index.cmp(&other.key.insertion_index))
            .then_with(|| self.activity_id.cmp(&other.activity_id))
    }
}

impl PartialOrd for KeyAndActivity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for KeyAndActivity {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyAndActivity {}

impl fmt::Display for KeyAndActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} #{}", self.activity_id, self.key.scores, self.key.insertion_index)
    }
}

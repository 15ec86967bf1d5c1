//! Stored candidates of a dispatcher.

use std::collections::HashMap;

use super::cursor::CursorSource;
use crate::error::{DispatchError, DispatchResult};

/// Candidate activities in insertion order, with their cached
/// sequence-head end times.
///
/// Every mutation bumps the generation so detached cursors notice it.
#[derive(Debug, Clone, Default)]
pub struct CandidateList {
    order: Vec<String>,
    head_end: HashMap<String, i64>,
    generation: u64,
}

impl CandidateList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate.
    ///
    /// # Errors
    /// [`DispatchError::DuplicateCandidate`] if the activity is already stored.
    pub fn insert(&mut self, activity_id: &str, sequence_head_end_ms: i64) -> DispatchResult<()> {
        if self.head_end.contains_key(activity_id) {
            return Err(DispatchError::DuplicateCandidate {
                activity_id: activity_id.to_owned(),
            });
        }
        self.head_end
            .insert(activity_id.to_owned(), sequence_head_end_ms);
        self.order.push(activity_id.to_owned());
        self.generation += 1;
        Ok(())
    }

    /// Removes a candidate, returning the storage index it occupied.
    ///
    /// Absent activities leave the list untouched.
    pub fn remove(&mut self, activity_id: &str) -> Option<usize> {
        self.head_end.remove(activity_id)?;
        let index = self.order.iter().position(|id| id == activity_id)?;
        self.order.remove(index);
        self.generation += 1;
        Some(index)
    }

    /// Whether the activity is stored.
    pub fn contains(&self, activity_id: &str) -> bool {
        self.head_end.contains_key(activity_id)
    }

    /// Number of stored candidates.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no candidates are stored.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Removes every candidate.
    pub fn clear(&mut self) {
        self.order.clear();
        self.head_end.clear();
        self.generation += 1;
    }

    /// Candidate at a storage index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.order.get(index).map(String::as_str)
    }

    /// Candidates in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// Cached sequence-head end time of a candidate.
    pub fn sequence_head_end(&self, activity_id: &str) -> Option<i64> {
        self.head_end.get(activity_id).copied()
    }

    /// Smallest cached sequence-head end time. O(n).
    pub fn min_sequence_head_end(&self) -> Option<i64> {
        self.head_end.values().copied().min()
    }

    /// Mutation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl CursorSource for CandidateList {
    type Item = str;

    fn generation(&self) -> u64 {
        self.generation
    }

    fn item_at(&self, index: usize) -> Option<&str> {
        self.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut list = CandidateList::new();
        list.insert("A", 10).unwrap();
        list.insert("B", 5).unwrap();
        list.insert("C", 7).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.min_sequence_head_end(), Some(5));
        assert_eq!(list.remove("B"), Some(1));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(list.min_sequence_head_end(), Some(7));
        assert_eq!(list.sequence_head_end("A"), Some(10));
    }

    #[test]
    fn test_duplicate_insert() {
        let mut list = CandidateList::new();
        list.insert("A", 10).unwrap();
        let err = list.insert("A", 99).unwrap_err();
        assert_eq!(
            err,
            DispatchError::DuplicateCandidate {
                activity_id: "A".into()
            }
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list.sequence_head_end("A"), Some(10));
    }

    #[test]
    fn test_remove_absent_keeps_generation() {
        let mut list = CandidateList::new();
        list.insert("A", 0).unwrap();
        let generation = list.generation();
        assert_eq!(list.remove("Z"), None);
        assert_eq!(list.generation(), generation);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut list = CandidateList::new();
        list.insert("A", 0).unwrap();
        list.clear();
        assert!(list.is_empty());
        assert!(!list.contains("A"));
        assert_eq!(list.min_sequence_head_end(), None);
    }
}

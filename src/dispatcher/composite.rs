//! Per-cycle ranking of candidates.

use super::cursor::CursorSource;
use super::KeyAndActivity;
use crate::dispatching::DispatcherDefinition;

/// Ordered (key, activity) entries built by one dispatch cycle, plus the
/// cursor the cycle serves them from.
///
/// Rebuilt wholesale at the start of every cycle.
#[derive(Debug, Clone, Default)]
pub struct CompositeSort {
    entries: Vec<KeyAndActivity>,
    position: usize,
    generation: u64,
}

impl CompositeSort {
    /// Creates an empty ranking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all entries and rewinds the cursor.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = 0;
        self.generation += 1;
    }

    pub(crate) fn push(&mut self, entry: KeyAndActivity) {
        self.entries.push(entry);
        self.generation += 1;
    }

    /// Stable sort by the definition's comparator; equal entries keep
    /// insertion-index order.
    pub(crate) fn sort_by(&mut self, definition: &dyn DispatcherDefinition) {
        self.entries.sort_by(|a, b| {
            definition
                .compare(a, b)
                .then(a.key().insertion_index().cmp(&b.key().insertion_index()))
        });
        self.generation += 1;
    }

    /// Entry under the cursor.
    pub fn peek(&self) -> Option<&KeyAndActivity> {
        self.entries.get(self.position)
    }

    /// Entry under the cursor, advancing past it.
    pub fn advance(&mut self) -> Option<&KeyAndActivity> {
        let index = self.position;
        if index >= self.entries.len() {
            return None;
        }
        self.position += 1;
        self.entries.get(index)
    }

    /// Deletes every entry for `activity_id`, returning how many went.
    ///
    /// Each deleted entry that sat before the cursor pulls the cursor back
    /// by one, so no remaining entry is skipped or served twice.
    pub fn remove(&mut self, activity_id: &str) -> usize {
        let position = self.position;
        let mut index = 0;
        let mut removed = 0;
        let mut before_cursor = 0;
        self.entries.retain(|e| {
            let keep = e.activity_id() != activity_id;
            if !keep {
                removed += 1;
                if index < position {
                    before_cursor += 1;
                }
            }
            index += 1;
            keep
        });
        if removed > 0 {
            self.position -= before_cursor;
            self.generation += 1;
        }
        removed
    }

    /// Number of ranked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the next entry to serve.
    pub fn position(&self) -> usize {
        self.position
    }

    /// All ranked entries in cycle order.
    pub fn entries(&self) -> &[KeyAndActivity] {
        &self.entries
    }

    /// Ranked activity IDs in cycle order.
    pub fn activity_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(KeyAndActivity::activity_id)
    }

    /// Mutation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl CursorSource for CompositeSort {
    type Item = KeyAndActivity;

    fn generation(&self) -> u64 {
        self.generation
    }

    fn item_at(&self, index: usize) -> Option<&KeyAndActivity> {
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::SortKey;

    fn ranked(ids: &[&str]) -> CompositeSort {
        let mut sort = CompositeSort::new();
        for (i, id) in ids.iter().enumerate() {
            sort.push(KeyAndActivity::new(SortKey::single(0.0, i), *id));
        }
        sort
    }

    fn ids(sort: &CompositeSort) -> Vec<&str> {
        sort.activity_ids().collect()
    }

    #[test]
    fn test_advance_and_peek() {
        let mut sort = ranked(&["X", "Y"]);
        assert_eq!(sort.peek().map(|e| e.activity_id()), Some("X"));
        assert_eq!(sort.advance().map(|e| e.activity_id()), Some("X"));
        assert_eq!(sort.advance().map(|e| e.activity_id()), Some("Y"));
        assert!(sort.advance().is_none());
        assert!(sort.peek().is_none());
        assert_eq!(sort.position(), 2);
    }

    #[test]
    fn test_remove_after_cursor() {
        let mut sort = ranked(&["X", "Y", "Z"]);
        sort.advance();
        assert_eq!(sort.remove("Y"), 1);
        assert_eq!(sort.position(), 1);
        assert_eq!(sort.advance().map(|e| e.activity_id()), Some("Z"));
    }

    #[test]
    fn test_remove_before_cursor() {
        let mut sort = ranked(&["X", "Y", "Z"]);
        sort.advance();
        sort.advance();
        assert_eq!(sort.remove("X"), 1);
        assert_eq!(sort.position(), 1);
        assert_eq!(sort.advance().map(|e| e.activity_id()), Some("Z"));
        assert_eq!(ids(&sort), vec!["Y", "Z"]);
    }

    #[test]
    fn test_remove_at_cursor() {
        let mut sort = ranked(&["X", "Y", "Z"]);
        sort.advance();
        sort.remove("Y");
        sort.remove("Z");
        assert_eq!(sort.position(), 1);
        assert!(sort.advance().is_none());
    }

    #[test]
    fn test_remove_every_duplicate_entry() {
        let mut sort = ranked(&["X", "Y", "X", "Z"]);
        sort.advance();
        sort.advance();
        sort.advance();
        // Both X entries sit before the cursor.
        assert_eq!(sort.remove("X"), 2);
        assert_eq!(sort.position(), 1);
        assert_eq!(sort.advance().map(|e| e.activity_id()), Some("Z"));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut sort = ranked(&["X"]);
        let generation = sort.generation();
        assert_eq!(sort.remove("Q"), 0);
        assert_eq!(sort.generation(), generation);
        assert_eq!(sort.len(), 1);
    }

    #[test]
    fn test_clear_rewinds() {
        let mut sort = ranked(&["X", "Y"]);
        sort.advance();
        sort.clear();
        assert!(sort.is_empty());
        assert_eq!(sort.position(), 0);
    }
}

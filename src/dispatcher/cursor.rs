//! Detached, generation-checked enumerators.
//!
//! A [`Cursor`] holds no borrow of the collection it walks; every step takes
//! the collection as an argument. The collection carries a generation counter
//! that is bumped on each mutation, and a cursor created (or last reset)
//! under another generation refuses to move or read until it is reset.
//!
//! Cursors are not safe for concurrent use.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{DispatchResult, IteratorMisuse};

/// A collection a [`Cursor`] can walk by index.
pub trait CursorSource {
    /// Element type.
    type Item: ?Sized;

    /// Mutation counter; changes whenever indices may have shifted.
    fn generation(&self) -> u64;

    /// Element at `index`, or `None` past the end.
    fn item_at(&self, index: usize) -> Option<&Self::Item>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    BeforeFirst,
    At(usize),
    Exhausted,
}

/// Index-based enumerator over a [`CursorSource`].
pub struct Cursor<S: ?Sized> {
    state: CursorState,
    generation: u64,
    _source: PhantomData<fn(&S)>,
}

impl<S: CursorSource + ?Sized> Cursor<S> {
    /// Creates a cursor positioned before the first element.
    pub fn new(source: &S) -> Self {
        Self {
            state: CursorState::BeforeFirst,
            generation: source.generation(),
            _source: PhantomData,
        }
    }

    /// Advances to the next element. Returns `false` once exhausted.
    ///
    /// # Errors
    /// [`IteratorMisuse::Stale`] if `source` changed since creation or reset.
    pub fn move_next(&mut self, source: &S) -> DispatchResult<bool> {
        self.check(source)?;
        let next = match self.state {
            CursorState::BeforeFirst => 0,
            CursorState::At(i) => i + 1,
            CursorState::Exhausted => return Ok(false),
        };
        if source.item_at(next).is_some() {
            self.state = CursorState::At(next);
            Ok(true)
        } else {
            self.state = CursorState::Exhausted;
            Ok(false)
        }
    }

    /// Element under the cursor.
    ///
    /// # Errors
    /// [`IteratorMisuse::BeforeFirst`], [`IteratorMisuse::Exhausted`], or
    /// [`IteratorMisuse::Stale`].
    pub fn current<'a>(&self, source: &'a S) -> DispatchResult<&'a S::Item> {
        self.check(source)?;
        match self.state {
            CursorState::BeforeFirst => Err(IteratorMisuse::BeforeFirst.into()),
            CursorState::Exhausted => Err(IteratorMisuse::Exhausted.into()),
            CursorState::At(i) => source.item_at(i).ok_or(IteratorMisuse::Stale.into()),
        }
    }

    /// Returns to before-first and adopts the source's current generation.
    pub fn reset(&mut self, source: &S) {
        self.state = CursorState::BeforeFirst;
        self.generation = source.generation();
    }

    /// Whether the cursor is still in step with `source`.
    pub fn is_valid_for(&self, source: &S) -> bool {
        self.generation == source.generation()
    }

    fn check(&self, source: &S) -> Result<(), IteratorMisuse> {
        if self.is_valid_for(source) {
            Ok(())
        } else {
            Err(IteratorMisuse::Stale)
        }
    }
}

impl<S: ?Sized> fmt::Debug for Cursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::CandidateList;
    use crate::error::DispatchError;

    fn list(ids: &[&str]) -> CandidateList {
        let mut list = CandidateList::new();
        for id in ids {
            list.insert(id, 0).unwrap();
        }
        list
    }

    fn misuse(kind: IteratorMisuse) -> DispatchError {
        DispatchError::IteratorMisuse(kind)
    }

    #[test]
    fn test_walks_in_order() {
        let list = list(&["A", "B", "C"]);
        let mut cursor = Cursor::new(&list);
        let mut seen = Vec::new();
        while cursor.move_next(&list).unwrap() {
            seen.push(cursor.current(&list).unwrap().to_owned());
        }
        assert_eq!(seen, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_read_before_first() {
        let list = list(&["A"]);
        let cursor = Cursor::new(&list);
        assert_eq!(cursor.current(&list), Err(misuse(IteratorMisuse::BeforeFirst)));
    }

    #[test]
    fn test_exhaustion_then_reset() {
        let list = list(&["A", "B"]);
        let mut cursor = Cursor::new(&list);
        assert!(cursor.move_next(&list).unwrap());
        assert!(cursor.move_next(&list).unwrap());
        assert!(!cursor.move_next(&list).unwrap());
        assert!(!cursor.move_next(&list).unwrap());
        assert_eq!(cursor.current(&list), Err(misuse(IteratorMisuse::Exhausted)));

        cursor.reset(&list);
        assert!(cursor.move_next(&list).unwrap());
        assert_eq!(cursor.current(&list).unwrap(), "A");
    }

    #[test]
    fn test_mutation_makes_cursor_stale() {
        let mut list = list(&["A", "B"]);
        let mut cursor = Cursor::new(&list);
        assert!(cursor.move_next(&list).unwrap());

        list.remove("A");
        assert!(!cursor.is_valid_for(&list));
        assert_eq!(cursor.move_next(&list), Err(misuse(IteratorMisuse::Stale)));
        assert_eq!(cursor.current(&list), Err(misuse(IteratorMisuse::Stale)));

        cursor.reset(&list);
        assert!(cursor.move_next(&list).unwrap());
        assert_eq!(cursor.current(&list).unwrap(), "B");
    }

    #[test]
    fn test_empty_source() {
        let list = CandidateList::new();
        let mut cursor = Cursor::new(&list);
        assert!(!cursor.move_next(&list).unwrap());
        assert_eq!(cursor.current(&list), Err(misuse(IteratorMisuse::Exhausted)));
    }
}

// Shelfmark - Personal Reading List Manager
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! The reading-list state container
//!
//! `ReadingList` owns the single ordered sequence of all tracked books and
//! is the only writer to the snapshot store. Order within the sequence
//! encodes the display order inside each status group; each group is an
//! order-preserving filtered view of the one backing sequence.
//!
//! Every mutation applies in memory first and then writes a full snapshot.
//! A failed write never rolls back or crashes the mutation: the in-memory
//! list stays authoritative for the session and the error is retained on
//! [`ReadingList::last_snapshot_error`] for the caller to surface.
//!
//! All operations are synchronous and run to completion, so mutations are
//! atomic with respect to each other: storage and memory agree at the end
//! of every call.

use crate::error::{Result, ShelfError};
use crate::storage::models::{Book, BookCandidate, Status};
use crate::storage::snapshot::SnapshotStore;
use tracing::{debug, warn};

/// Outcome of a confirmation-gated removal
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The gate approved; the book was removed and the snapshot rewritten
    Removed(Book),
    /// The gate declined; list and snapshot are untouched
    Declined,
}

/// The ordered collection of all tracked books
///
/// Constructed explicitly with its snapshot store injected; there is no
/// process-wide instance. Consumers hold the store and call its operations.
#[derive(Debug)]
pub struct ReadingList<S: SnapshotStore> {
    books: Vec<Book>,
    snapshot: S,
    last_snapshot_error: Option<ShelfError>,
}

impl<S: SnapshotStore> ReadingList<S> {
    /// Create an empty, not-yet-hydrated list over the given store
    pub fn new(snapshot: S) -> Self {
        Self {
            books: Vec::new(),
            snapshot,
            last_snapshot_error: None,
        }
    }

    /// Create a list and hydrate it from the snapshot in one step
    pub fn open(snapshot: S) -> Self {
        let mut list = Self::new(snapshot);
        list.load();
        list
    }

    /// Hydrate in-memory state from the persisted snapshot
    ///
    /// A missing snapshot yields an empty list. An unreadable or corrupt
    /// snapshot also yields an empty list, with a warning, never a panic
    /// or error. Idempotent: repeated calls with no intervening mutation
    /// produce the same state. Does not write to storage.
    ///
    /// Returns the number of books loaded.
    pub fn load(&mut self) -> usize {
        self.books = match self.snapshot.load() {
            Ok(Some(books)) => books,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(error = %err, "snapshot unreadable, starting with an empty list");
                Vec::new()
            }
        };
        debug!(count = self.books.len(), "reading list hydrated");
        self.books.len()
    }

    /// Add a search candidate to the end of the backlog
    ///
    /// The stored book gets `status = Backlog` regardless of the candidate's
    /// origin and lands at the end of the backing sequence, which is the end
    /// of the backlog view.
    ///
    /// # Errors
    /// - `MissingRequiredField` if the candidate's key or title is blank
    /// - `DuplicateBook` if a book with the same key is already tracked
    pub fn add_book(&mut self, candidate: BookCandidate) -> Result<&Book> {
        if candidate.key.trim().is_empty() {
            return Err(ShelfError::MissingRequiredField("key".to_string()));
        }
        if candidate.title.trim().is_empty() {
            return Err(ShelfError::MissingRequiredField("title".to_string()));
        }
        if let Some(existing) = self.get(&candidate.key) {
            return Err(ShelfError::duplicate(&candidate.key, &existing.title));
        }

        let book = candidate.into_book();
        debug!(key = %book.key, title = %book.title, "adding book to backlog");
        self.books.push(book);
        self.persist();

        Ok(&self.books[self.books.len() - 1])
    }

    /// Remove a book, gated by an explicit confirmation
    ///
    /// The gate receives the book about to be removed and answers yes/no.
    /// Declining is a true no-op: the list is unchanged and no snapshot
    /// write happens.
    ///
    /// # Errors
    /// `BookNotFound` if no book has the given key (the gate is not asked).
    pub fn remove_book<F>(&mut self, key: &str, confirm: F) -> Result<RemoveOutcome>
    where
        F: FnOnce(&Book) -> bool,
    {
        let index = self
            .books
            .iter()
            .position(|b| b.key == key)
            .ok_or_else(|| ShelfError::not_found(key))?;

        if !confirm(&self.books[index]) {
            debug!(key, "removal declined");
            return Ok(RemoveOutcome::Declined);
        }

        let removed = self.books.remove(index);
        debug!(key = %removed.key, title = %removed.title, "book removed");
        self.persist();
        Ok(RemoveOutcome::Removed(removed))
    }

    /// Change which status group a book belongs to
    ///
    /// Only the `status` field changes; the book keeps its slot in the
    /// backing sequence, so it keeps its relative order among the books that
    /// stay put and simply appears in a different filtered view.
    ///
    /// Returns `false` (and writes nothing) when no book has the given key.
    pub fn move_book(&mut self, key: &str, new_status: Status) -> bool {
        let moved = match self.books.iter_mut().find(|b| b.key == key) {
            Some(book) => {
                debug!(key = %book.key, from = %book.status, to = %new_status, "moving book");
                book.status = new_status;
                true
            }
            None => false,
        };

        if moved {
            self.persist();
        }
        moved
    }

    /// Reorder books within a single status group
    ///
    /// Conceptually: take the order-preserving subsequence of books whose
    /// status matches, move its `from` element to `to`, then write the
    /// reordered subsequence back into the original backing slots. Books of
    /// other statuses keep both their value and their backing position, and
    /// the list's membership never changes.
    ///
    /// # Errors
    /// `ReorderIndexOutOfRange` when either index is not a valid position in
    /// the status group. Indices are validated up front; there is no partial
    /// application.
    pub fn reorder_books(&mut self, status: Status, from: usize, to: usize) -> Result<()> {
        let slots: Vec<usize> = self
            .books
            .iter()
            .enumerate()
            .filter(|(_, b)| b.status == status)
            .map(|(i, _)| i)
            .collect();

        let len = slots.len();
        if from >= len {
            return Err(ShelfError::reorder_out_of_range(status.as_str(), from, len));
        }
        if to >= len {
            return Err(ShelfError::reorder_out_of_range(status.as_str(), to, len));
        }
        if from == to {
            return Ok(());
        }

        let mut group: Vec<Book> = slots.iter().map(|&i| self.books[i].clone()).collect();
        let moved = group.remove(from);
        group.insert(to, moved);

        for (&slot, book) in slots.iter().zip(group) {
            self.books[slot] = book;
        }

        debug!(status = %status, from, to, "status group reordered");
        self.persist();
        Ok(())
    }

    /// The full backing sequence, in display order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// The order-preserving view of one status group
    pub fn status_group(&self, status: Status) -> Vec<&Book> {
        self.books.iter().filter(|b| b.status == status).collect()
    }

    /// Look up a book by key
    pub fn get(&self, key: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.key == key)
    }

    /// Whether a book with this key is tracked
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// The error from the most recent snapshot write, if it failed
    ///
    /// Cleared by the next successful write. The in-memory list is still
    /// the source of truth for the session when this is set; callers should
    /// surface it as a non-fatal warning.
    pub fn last_snapshot_error(&self) -> Option<&ShelfError> {
        self.last_snapshot_error.as_ref()
    }

    /// Write the full list to the snapshot store
    ///
    /// Runs after every successful in-memory mutation. Failure is recorded,
    /// not propagated: the mutation has already happened and stands.
    fn persist(&mut self) {
        match self.snapshot.save(&self.books) {
            Ok(()) => self.last_snapshot_error = None,
            Err(err) => {
                warn!(error = %err, "snapshot write failed; keeping in-memory changes");
                self.last_snapshot_error = Some(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::snapshot::MemorySnapshotStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store whose writes always fail, for exercising the warning path
    #[derive(Debug, Default)]
    struct FailingSnapshotStore {
        attempts: AtomicUsize,
    }

    impl SnapshotStore for FailingSnapshotStore {
        fn load(&self) -> crate::error::Result<Option<Vec<Book>>> {
            Ok(None)
        }

        fn save(&self, _books: &[Book]) -> crate::error::Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(ShelfError::SnapshotWriteFailed {
                path: "<failing>".to_string(),
                message: "quota exceeded".to_string(),
            })
        }
    }

    fn candidate(key: &str, title: &str) -> BookCandidate {
        BookCandidate {
            key: key.to_string(),
            title: title.to_string(),
            author_name: vec!["Author".to_string()],
            first_publish_year: Some(2001),
            number_of_pages_median: Some(250),
        }
    }

    fn list_with(keys: &[&str]) -> ReadingList<MemorySnapshotStore> {
        let mut list = ReadingList::new(MemorySnapshotStore::new());
        for key in keys {
            list.add_book(candidate(key, &format!("Title {key}"))).unwrap();
        }
        list
    }

    fn group_keys(list: &ReadingList<MemorySnapshotStore>, status: Status) -> Vec<String> {
        list.status_group(status)
            .iter()
            .map(|b| b.key.clone())
            .collect()
    }

    #[test]
    fn test_add_sets_backlog_status() {
        let mut list = ReadingList::new(MemorySnapshotStore::new());
        let book = list.add_book(candidate("a", "A")).unwrap();
        assert_eq!(book.status, Status::Backlog);
    }

    #[test]
    fn test_add_appends_to_end_of_backlog() {
        let list = list_with(&["a", "b", "c"]);
        assert_eq!(group_keys(&list, Status::Backlog), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_rejects_duplicate_key() {
        let mut list = list_with(&["a"]);
        let err = list.add_book(candidate("a", "Other Title")).unwrap_err();
        assert!(matches!(err, ShelfError::DuplicateBook { .. }));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_rejects_blank_title() {
        let mut list = ReadingList::new(MemorySnapshotStore::new());
        let err = list.add_book(candidate("a", "   ")).unwrap_err();
        assert!(matches!(err, ShelfError::MissingRequiredField(_)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_keys_stay_unique_across_add_remove_add() {
        let mut list = list_with(&["a", "b"]);
        list.remove_book("a", |_| true).unwrap();
        list.add_book(candidate("a", "A Again")).unwrap();

        let mut keys: Vec<&str> = list.books().iter().map(|b| b.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), list.len());
    }

    #[test]
    fn test_every_mutation_persists() {
        let mut list = ReadingList::new(MemorySnapshotStore::new());
        list.add_book(candidate("a", "A")).unwrap();
        assert_eq!(list.snapshot_store().save_count(), 1);

        list.move_book("a", Status::Done);
        assert_eq!(list.snapshot_store().save_count(), 2);

        list.remove_book("a", |_| true).unwrap();
        assert_eq!(list.snapshot_store().save_count(), 3);
    }

    #[test]
    fn test_remove_declined_is_true_noop() {
        let mut list = list_with(&["a", "b"]);
        let before = list.books().to_vec();
        let saves_before = list.snapshot_store().save_count();

        let outcome = list.remove_book("a", |_| false).unwrap();

        assert_eq!(outcome, RemoveOutcome::Declined);
        assert_eq!(list.books(), before.as_slice());
        assert_eq!(list.snapshot_store().save_count(), saves_before);
    }

    #[test]
    fn test_remove_unknown_key_reports_not_found() {
        let mut list = list_with(&["a"]);
        let err = list.remove_book("zzz", |_| true).unwrap_err();
        assert!(matches!(err, ShelfError::BookNotFound(_)));
    }

    #[test]
    fn test_move_changes_only_status() {
        let mut list = list_with(&["a", "b", "c"]);
        let before = list.get("b").unwrap().clone();

        assert!(list.move_book("b", Status::InProgress));

        let after = list.get("b").unwrap();
        assert_eq!(after.status, Status::InProgress);
        assert_eq!(after.key, before.key);
        assert_eq!(after.title, before.title);
        assert_eq!(after.author_name, before.author_name);
        assert_eq!(after.first_publish_year, before.first_publish_year);
        assert_eq!(after.number_of_pages_median, before.number_of_pages_median);

        // backing position is untouched
        assert_eq!(list.books()[1].key, "b");
    }

    #[test]
    fn test_move_unknown_key_is_noop_without_write() {
        let mut list = list_with(&["a"]);
        let saves_before = list.snapshot_store().save_count();

        assert!(!list.move_book("zzz", Status::Done));
        assert_eq!(list.snapshot_store().save_count(), saves_before);
    }

    #[test]
    fn test_reorder_moves_first_to_last() {
        let mut list = list_with(&["a", "b", "c"]);
        list.reorder_books(Status::Backlog, 0, 2).unwrap();
        assert_eq!(group_keys(&list, Status::Backlog), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_reorder_is_scoped_to_one_group() {
        // backing: a(B) b(B) c(D) d(B) e(P); backlog view is [a, b, d]
        let mut list = list_with(&["a", "b", "c", "d", "e"]);
        list.move_book("c", Status::Done);
        list.move_book("e", Status::InProgress);

        list.reorder_books(Status::Backlog, 0, 2).unwrap();

        // backlog view reordered, members of other groups keep value and slot
        assert_eq!(group_keys(&list, Status::Backlog), vec!["b", "d", "a"]);
        assert_eq!(list.books()[2].key, "c");
        assert_eq!(list.books()[2].status, Status::Done);
        assert_eq!(list.books()[4].key, "e");
        assert_eq!(list.books()[4].status, Status::InProgress);
        assert_eq!(list.len(), 5);

        // and the reordered members landed in the backlog's backing slots
        let backing: Vec<&str> = list.books().iter().map(|b| b.key.as_str()).collect();
        assert_eq!(backing, vec!["b", "d", "c", "a", "e"]);
    }

    #[test]
    fn test_reorder_out_of_range_is_rejected() {
        let mut list = list_with(&["a", "b"]);
        let before = list.books().to_vec();
        let saves_before = list.snapshot_store().save_count();

        let err = list.reorder_books(Status::Backlog, 0, 2).unwrap_err();
        assert!(matches!(err, ShelfError::ReorderIndexOutOfRange { .. }));
        assert_eq!(list.books(), before.as_slice());
        assert_eq!(list.snapshot_store().save_count(), saves_before);
    }

    #[test]
    fn test_reorder_empty_group_is_rejected() {
        let mut list = list_with(&["a"]);
        let err = list.reorder_books(Status::Done, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            ShelfError::ReorderIndexOutOfRange { len: 0, .. }
        ));
    }

    #[test]
    fn test_load_round_trips_state() {
        let store = MemorySnapshotStore::new();
        let mut list = ReadingList::new(store);
        list.add_book(candidate("a", "A")).unwrap();
        list.add_book(candidate("b", "B")).unwrap();
        list.move_book("a", Status::Done);
        let expected = list.books().to_vec();

        // hand the same storage to a fresh list
        let store = list.into_snapshot_store();
        let mut rehydrated = ReadingList::new(store);
        assert_eq!(rehydrated.load(), 2);
        assert_eq!(rehydrated.books(), expected.as_slice());
    }

    #[test]
    fn test_load_is_idempotent() {
        let store = MemorySnapshotStore::new();
        let mut list = ReadingList::new(store);
        list.add_book(candidate("a", "A")).unwrap();

        let store = list.into_snapshot_store();
        let mut list = ReadingList::new(store);
        list.load();
        let first = list.books().to_vec();
        list.load();
        assert_eq!(list.books(), first.as_slice());
    }

    #[test]
    fn test_load_missing_snapshot_yields_empty() {
        let mut list = ReadingList::new(MemorySnapshotStore::new());
        assert_eq!(list.load(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_load_corrupt_snapshot_yields_empty() {
        let store = MemorySnapshotStore::new();
        store.set_snapshot_text("[{\"broken\": ");

        let mut list = ReadingList::new(store);
        assert_eq!(list.load(), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_memory_authoritative() {
        let mut list = ReadingList::new(FailingSnapshotStore::default());
        list.add_book(candidate("a", "A")).unwrap();

        assert_eq!(list.len(), 1);
        assert!(matches!(
            list.last_snapshot_error(),
            Some(ShelfError::SnapshotWriteFailed { .. })
        ));

        // a later mutation still applies in memory
        assert!(list.move_book("a", Status::Done));
        assert_eq!(list.get("a").unwrap().status, Status::Done);
    }

    impl<S: SnapshotStore> ReadingList<S> {
        fn snapshot_store(&self) -> &S {
            &self.snapshot
        }

        fn into_snapshot_store(self) -> S {
            self.snapshot
        }
    }
}

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


//! List state and persistence
//!
//! This module holds the core of the application: the book entities, the
//! reading-list store with its mutation operations, and the single-key
//! snapshot persistence underneath it.
//!
//! # Usage Example
//! ```no_run
//! use shelfmark::storage::{BookCandidate, FileSnapshotStore, ReadingList, Status};
//!
//! let mut list = ReadingList::open(FileSnapshotStore::at_default_path());
//!
//! list.add_book(BookCandidate {
//!     key: "/works/OL27448W".to_string(),
//!     title: "The Lord of the Rings".to_string(),
//!     author_name: vec!["J. R. R. Tolkien".to_string()],
//!     first_publish_year: Some(1954),
//!     number_of_pages_median: Some(1193),
//! })?;
//!
//! list.move_book("/works/OL27448W", Status::InProgress);
//! # Ok::<(), shelfmark::ShelfError>(())
//! ```

pub mod models;
pub mod snapshot;
pub mod store;

// Re-export commonly used types
pub use models::{Book, BookCandidate, Status};
pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore, SNAPSHOT_KEY};
pub use store::{ReadingList, RemoveOutcome};

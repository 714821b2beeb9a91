//! Shelfmark: a personal reading-list core
//!
//! Search an external book catalog, add results to a personal list, and
//! track each book through backlog, in-progress, and done, with manual
//! reordering inside each group. The whole list persists as one JSON
//! snapshot rewritten after every mutation.
//!
//! The crate is the state and I/O core; presentation (the bundled CLI, or
//! any other front end) reads [`storage::ReadingList`] and translates user
//! intents into single store or search calls.

pub mod api;
pub mod error;
pub mod storage;

pub use api::{CatalogClient, ClientConfig, SearchPage, SearchSession};
pub use error::{Result, ShelfError};
pub use storage::{
    Book, BookCandidate, FileSnapshotStore, MemorySnapshotStore, ReadingList, RemoveOutcome,
    SnapshotStore, Status,
};

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


//! Snapshot persistence for the reading list
//!
//! One fixed key holds the whole list as JSON text. Every write is a full
//! overwrite of the previous snapshot; there is no delta or append log.
//! A missing snapshot is not an error, it just means first run.
//!
//! `SnapshotStore` is the seam the list store is constructed over:
//! `FileSnapshotStore` is the real durability substrate,
//! `MemorySnapshotStore` backs tests and ephemeral sessions.

use crate::error::{Result, ShelfError};
use crate::storage::models::Book;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Fixed key under which the list is persisted
pub const SNAPSHOT_KEY: &str = "readingList";

/// Durability substrate for the reading list
///
/// Both operations are synchronous; the list store is the single writer and
/// performs all calls serially, so no concurrency control is needed here.
pub trait SnapshotStore {
    /// Read the persisted snapshot
    ///
    /// Returns `Ok(None)` if no snapshot was ever written. A snapshot that
    /// exists but cannot be read or parsed is an error; the caller decides
    /// whether that is fatal (the list store treats it as "no data").
    fn load(&self) -> Result<Option<Vec<Book>>>;

    /// Serialize the full list and overwrite the previous snapshot
    fn save(&self, books: &[Book]) -> Result<()>;
}

/// File-backed snapshot store
///
/// Stores the list as a JSON array in a single file named after
/// [`SNAPSHOT_KEY`], in a platform data directory by default.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store writing to the given file path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the platform default location
    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Get default snapshot path for the platform
    ///
    /// - macOS: ~/Library/Application Support/Shelfmark/readingList.json
    /// - Linux: ~/.local/share/Shelfmark/readingList.json
    /// - Windows: %APPDATA%/Shelfmark/readingList.json
    pub fn default_path() -> PathBuf {
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("Shelfmark")
                .join(format!("{SNAPSHOT_KEY}.json"))
        }

        #[cfg(target_os = "linux")]
        {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("Shelfmark")
                .join(format!("{SNAPSHOT_KEY}.json"))
        }

        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata)
                .join("Shelfmark")
                .join(format!("{SNAPSHOT_KEY}.json"))
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            PathBuf::from(format!("./{SNAPSHOT_KEY}.json"))
        }
    }

    /// Get the snapshot file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_display(&self) -> String {
        self.path.display().to_string()
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<Vec<Book>>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ShelfError::SnapshotReadFailed {
                    path: self.path_display(),
                    message: err.to_string(),
                })
            }
        };

        let books = serde_json::from_str(&text).map_err(|err| ShelfError::CorruptSnapshot {
            path: self.path_display(),
            message: err.to_string(),
        })?;

        Ok(Some(books))
    }

    fn save(&self, books: &[Book]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|err| ShelfError::SnapshotWriteFailed {
                    path: self.path_display(),
                    message: format!("failed to create {}: {}", parent.display(), err),
                })?;
            }
        }

        let text =
            serde_json::to_string(books).map_err(|err| ShelfError::SnapshotWriteFailed {
                path: self.path_display(),
                message: format!("serialization failed: {}", err),
            })?;

        fs::write(&self.path, text).map_err(|err| ShelfError::SnapshotWriteFailed {
            path: self.path_display(),
            message: err.to_string(),
        })
    }
}

/// In-memory snapshot store for tests and ephemeral sessions
///
/// Round-trips through the same JSON text a file store would write, so
/// serialization behavior is exercised identically. Tracks how many saves
/// were performed, which lets tests assert that declined or invalid
/// operations never touched storage.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
    save_count: AtomicUsize,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed save calls
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Raw persisted text, if any save has happened
    pub fn snapshot_text(&self) -> Option<String> {
        self.slot.lock().expect("snapshot slot poisoned").clone()
    }

    /// Replace the persisted text directly, bypassing serialization
    ///
    /// Lets tests stage corrupt or hand-written snapshots.
    pub fn set_snapshot_text<T: Into<String>>(&self, text: T) {
        *self.slot.lock().expect("snapshot slot poisoned") = Some(text.into());
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<Vec<Book>>> {
        let slot = self.slot.lock().expect("snapshot slot poisoned");
        match slot.as_deref() {
            Some(text) => {
                let books =
                    serde_json::from_str(text).map_err(|err| ShelfError::CorruptSnapshot {
                        path: "<memory>".to_string(),
                        message: err.to_string(),
                    })?;
                Ok(Some(books))
            }
            None => Ok(None),
        }
    }

    fn save(&self, books: &[Book]) -> Result<()> {
        let text = serde_json::to_string(books)?;
        *self.slot.lock().expect("snapshot slot poisoned") = Some(text);
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{BookCandidate, Status};

    fn sample_books() -> Vec<Book> {
        vec![
            BookCandidate {
                key: "/works/OL27448W".to_string(),
                title: "The Lord of the Rings".to_string(),
                author_name: vec!["J. R. R. Tolkien".to_string()],
                first_publish_year: Some(1954),
                number_of_pages_median: Some(1193),
            }
            .into_book(),
            BookCandidate {
                key: "/works/OL45883W".to_string(),
                title: "The Left Hand of Darkness".to_string(),
                author_name: vec!["Ursula K. Le Guin".to_string()],
                first_publish_year: None,
                number_of_pages_median: None,
            }
            .into_book(),
        ]
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("readingList.json"));

        let books = sample_books();
        store.save(&books).unwrap();

        let loaded = store.load().unwrap().expect("snapshot should exist");
        assert_eq!(loaded, books);
    }

    #[test]
    fn test_file_store_empty_list_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("readingList.json"));

        store.save(&[]).unwrap();
        assert_eq!(store.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_file_store_missing_snapshot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("never-written.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_malformed_snapshot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readingList.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let store = FileSnapshotStore::new(path);
        assert!(matches!(
            store.load(),
            Err(ShelfError::CorruptSnapshot { .. })
        ));
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("list.json");
        let store = FileSnapshotStore::new(&path);

        store.save(&sample_books()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_is_full_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("readingList.json"));

        store.save(&sample_books()).unwrap();
        store.save(&[]).unwrap();

        assert_eq!(store.load().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemorySnapshotStore::new();
        assert_eq!(store.save_count(), 0);

        store.save(&sample_books()).unwrap();
        store.save(&sample_books()).unwrap();

        assert_eq!(store.save_count(), 2);
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded[0].status, Status::Backlog);
    }
}

//! Reading-list entity models
//!
//! The shared data shapes flowing between search results, list state, and
//! the persisted snapshot.
//!
//! # Snapshot Compatibility
//! - `Status` serializes to the exact strings `"backlog"`, `"inProgress"`,
//!   `"done"` used by the persisted layout
//! - Optional numeric fields serialize as `null` when unknown and tolerate
//!   being absent on load

use serde::{Deserialize, Serialize};
use std::fmt;

/// The list a book currently belongs to
///
/// Display order within each status group is meaningful and user-controlled;
/// the group itself is just this tag on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "backlog")]
    Backlog,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl Status {
    /// All statuses in display order
    pub const ALL: [Status; 3] = [Status::Backlog, Status::InProgress, Status::Done];

    /// Get the wire/snapshot string for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::InProgress => "inProgress",
            Status::Done => "done",
        }
    }

    /// Parse a status from user or snapshot input
    ///
    /// Accepts the snapshot spelling plus common CLI spellings
    /// ("in-progress", "inprogress").
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "backlog" => Some(Status::Backlog),
            "inProgress" | "in-progress" | "inprogress" => Some(Status::InProgress),
            "done" => Some(Status::Done),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry the user has chosen to track
///
/// `key` is the sole equality key for lookups, removal, and moves, and is
/// unique across the whole list at all times. Only `status` is mutated after
/// creation; every other field is fixed at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Stable unique identifier (catalog work key, or generated)
    pub key: String,

    /// Display title, non-empty
    pub title: String,

    /// Author display names in catalog order (may be empty)
    #[serde(default)]
    pub author_name: Vec<String>,

    /// Year of first publication, if known
    #[serde(default)]
    pub first_publish_year: Option<i32>,

    /// Median page count across editions, if known
    #[serde(default)]
    pub number_of_pages_median: Option<u32>,

    /// Which list the book is on
    pub status: Status,
}

impl Book {
    /// Authors joined for single-line display ("A, B")
    pub fn authors_joined(&self) -> String {
        self.author_name.join(", ")
    }
}

/// A raw search result before it is committed to the reading list
///
/// Candidates carry no status; `ReadingList::add_book` is the only way to
/// turn one into a tracked `Book`, and it always lands in the backlog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCandidate {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub number_of_pages_median: Option<u32>,
}

impl BookCandidate {
    /// Promote this candidate to a tracked book
    ///
    /// Status is forced to `Backlog` regardless of the candidate's origin.
    pub(crate) fn into_book(self) -> Book {
        Book {
            key: self.key,
            title: self.title,
            author_name: self.author_name,
            first_publish_year: self.first_publish_year,
            number_of_pages_median: self.number_of_pages_median,
            status: Status::Backlog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(key: &str, title: &str) -> BookCandidate {
        BookCandidate {
            key: key.to_string(),
            title: title.to_string(),
            author_name: vec!["Ursula K. Le Guin".to_string()],
            first_publish_year: Some(1969),
            number_of_pages_median: Some(304),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"inProgress\""
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"backlog\"").unwrap(),
            Status::Backlog
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"done\"").unwrap(),
            Status::Done
        );
    }

    #[test]
    fn test_status_parse_aliases() {
        assert_eq!(Status::parse("in-progress"), Some(Status::InProgress));
        assert_eq!(Status::parse("inProgress"), Some(Status::InProgress));
        assert_eq!(Status::parse("reading"), None);
    }

    #[test]
    fn test_candidate_lands_in_backlog() {
        let book = candidate("/works/OL45883W", "The Left Hand of Darkness").into_book();
        assert_eq!(book.status, Status::Backlog);
        assert_eq!(book.key, "/works/OL45883W");
        assert_eq!(book.number_of_pages_median, Some(304));
    }

    #[test]
    fn test_book_tolerates_absent_optional_fields() {
        let json = r#"{"key":"k1","title":"Untitled","author_name":[],"status":"backlog"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.first_publish_year, None);
        assert_eq!(book.number_of_pages_median, None);
    }

    #[test]
    fn test_optional_fields_serialize_as_null() {
        let mut book = candidate("k2", "No Numbers").into_book();
        book.first_publish_year = None;
        book.number_of_pages_median = None;
        let json = serde_json::to_string(&book).unwrap();
        assert!(json.contains("\"first_publish_year\":null"));
        assert!(json.contains("\"number_of_pages_median\":null"));
    }
}

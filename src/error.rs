//! Error types for Shelfmark
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are categorized by domain (validation, list, search, snapshot) so
//! callers can decide between local recovery and surfacing a message.

use thiserror::Error;

/// Result type alias using our ShelfError type
pub type Result<T> = std::result::Result<T, ShelfError>;

/// Main error type for Shelfmark
///
/// Every failure mode in the crate maps to one of these variants. None of
/// them is expected to escape as a crash: validation errors are rejected at
/// the call site, search errors are recoverable, and snapshot errors leave
/// the in-memory list untouched.
#[derive(Error, Debug)]
pub enum ShelfError {
    // ===== Validation Errors =====

    /// Search query was empty or whitespace-only; no request is issued
    #[error("Search query is empty")]
    EmptyQuery,

    /// Page numbers are 1-based; zero is rejected locally
    #[error("Invalid page number: {0}")]
    InvalidPage(u32),

    /// Reorder indices are validated against the status group length
    #[error("Reorder index {index} out of range for {status} group of length {len}")]
    ReorderIndexOutOfRange {
        status: String,
        index: usize,
        len: usize,
    },

    /// Required field is missing or blank on a candidate
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    // ===== List Errors =====

    /// A book with this key is already on the list
    #[error("Book already on the list: {title} ({key})")]
    DuplicateBook { key: String, title: String },

    /// No book with this key exists on the list
    #[error("Book not found: {0}")]
    BookNotFound(String),

    // ===== Search Errors =====

    /// Catalog request failed (non-success response or exhausted retries)
    #[error("Catalog search failed: {message}")]
    SearchFailed {
        message: String,
        /// HTTP status code if available
        status_code: Option<u16>,
    },

    /// Catalog returned a body that could not be parsed
    #[error("Invalid catalog response: {message}")]
    InvalidSearchResponse {
        message: String,
        /// Response body snippet for debugging
        response_body: Option<String>,
    },

    /// Network connectivity error
    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        /// Whether this error might be transient
        is_transient: bool,
    },

    // ===== Snapshot Errors =====

    /// Snapshot file exists but could not be read
    #[error("Failed to read snapshot {path}: {message}")]
    SnapshotReadFailed { path: String, message: String },

    /// Snapshot could not be written; in-memory state is unaffected
    #[error("Failed to write snapshot {path}: {message}")]
    SnapshotWriteFailed { path: String, message: String },

    /// Snapshot content is not a valid book list
    #[error("Corrupt snapshot {path}: {message}")]
    CorruptSnapshot { path: String, message: String },

    // ===== External Library Errors =====

    /// HTTP client error from reqwest
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper methods for creating common errors
impl ShelfError {
    /// Create a DuplicateBook error
    pub fn duplicate<K: Into<String>, T: Into<String>>(key: K, title: T) -> Self {
        ShelfError::DuplicateBook {
            key: key.into(),
            title: title.into(),
        }
    }

    /// Create a BookNotFound error
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        ShelfError::BookNotFound(key.into())
    }

    /// Create a SearchFailed error
    pub fn search_failed<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        ShelfError::SearchFailed {
            message: message.into(),
            status_code,
        }
    }

    /// Create a NetworkError
    pub fn network<S: Into<String>>(message: S, is_transient: bool) -> Self {
        ShelfError::NetworkError {
            message: message.into(),
            is_transient,
        }
    }

    /// Create a ReorderIndexOutOfRange error
    pub fn reorder_out_of_range<S: Into<String>>(status: S, index: usize, len: usize) -> Self {
        ShelfError::ReorderIndexOutOfRange {
            status: status.into(),
            index,
            len,
        }
    }

    /// Check if error is a local input-validation rejection
    ///
    /// Validation errors never indicate a system fault; the caller supplied
    /// input the operation refuses (empty query, bad index, duplicate key).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShelfError::EmptyQuery
                | ShelfError::InvalidPage(_)
                | ShelfError::ReorderIndexOutOfRange { .. }
                | ShelfError::MissingRequiredField(_)
                | ShelfError::DuplicateBook { .. }
                | ShelfError::BookNotFound(_)
        )
    }

    /// Check if error came from the remote catalog boundary
    ///
    /// Search errors are recoverable: prior results and list state remain
    /// valid, the caller clears its loading indicator and reports the miss.
    pub fn is_search_error(&self) -> bool {
        matches!(
            self,
            ShelfError::SearchFailed { .. }
                | ShelfError::InvalidSearchResponse { .. }
                | ShelfError::NetworkError { .. }
                | ShelfError::ReqwestError(_)
        )
    }

    /// Check if error is related to the persistence layer
    pub fn is_snapshot_error(&self) -> bool {
        matches!(
            self,
            ShelfError::SnapshotReadFailed { .. }
                | ShelfError::SnapshotWriteFailed { .. }
                | ShelfError::CorruptSnapshot { .. }
        )
    }

    /// Check if error is retryable (transient network errors, 5xx responses)
    pub fn is_retryable(&self) -> bool {
        match self {
            ShelfError::NetworkError { is_transient, .. } => *is_transient,
            ShelfError::SearchFailed {
                status_code: Some(code),
                ..
            } => (500..=599).contains(code),
            _ => false,
        }
    }

    /// Get user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            ShelfError::EmptyQuery => "Type something to search for first.".to_string(),
            ShelfError::DuplicateBook { title, .. } => {
                format!("'{}' is already on your reading list.", title)
            }
            ShelfError::BookNotFound(key) => {
                format!("No book with key '{}' on your reading list.", key)
            }
            ShelfError::SearchFailed { .. }
            | ShelfError::NetworkError { .. }
            | ShelfError::ReqwestError(_) => {
                "Search failed. Check your connection and try again.".to_string()
            }
            ShelfError::InvalidSearchResponse { .. } => {
                "The catalog returned something unexpected. Try again later.".to_string()
            }
            ShelfError::SnapshotWriteFailed { .. } => {
                "Your change is applied but could not be saved to disk.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

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


//! Catalog search results and pagination
//!
//! Wire shapes for the catalog's search endpoint, the mapping from raw docs
//! to [`BookCandidate`]s, page-bound arithmetic, and the request-sequence
//! tokens that keep a slow response from overwriting a newer one.
//!
//! # Wire Contract
//! `GET {base}/search.json?q=<query>&page=<1-based>&limit=<page size>`
//! returns a JSON object with `docs` (array of raw records) and `numFound`
//! (total match count across all pages).

use crate::storage::models::BookCandidate;
use serde::Deserialize;
use uuid::Uuid;

/// Raw response envelope from the catalog search endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchResults {
    #[serde(default)]
    pub docs: Vec<SearchDoc>,

    /// Total number of matches across all pages
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
}

/// One raw book record as the catalog returns it
///
/// Every field is optional on the wire; the mapping below decides what is
/// usable. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchDoc {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub number_of_pages_median: Option<u32>,
}

impl SearchDoc {
    /// Map this raw record to an addable candidate
    ///
    /// Records without a usable title are dropped (`None`). Records without
    /// a catalog key get a generated one so that list keys stay genuinely
    /// unique even for catalog entries that share a title.
    pub fn into_candidate(self) -> Option<BookCandidate> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let key = self
            .key
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| format!("gen/{}", Uuid::new_v4()));

        Some(BookCandidate {
            key,
            title,
            author_name: self.author_name,
            first_publish_year: self.first_publish_year,
            number_of_pages_median: self.number_of_pages_median,
        })
    }
}

/// One page of mapped search results
///
/// Pages are 1-based. `total` counts matches across all pages, which is
/// what bounds the pager: the last valid page is `ceil(total / page_size)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub candidates: Vec<BookCandidate>,
    /// Total matches across all pages, as reported by the catalog
    pub total: u64,
    /// 1-based page number this page was fetched as
    pub page: u32,
    pub page_size: u32,
}

impl SearchPage {
    pub(crate) fn from_results(results: SearchResults, page: u32, page_size: u32) -> Self {
        let candidates = results
            .docs
            .into_iter()
            .filter_map(SearchDoc::into_candidate)
            .collect();

        Self {
            candidates,
            total: results.num_found,
            page,
            page_size,
        }
    }

    /// Number of pages needed for all matches
    pub fn total_pages(&self) -> u32 {
        let page_size = u64::from(self.page_size.max(1));
        let pages = (self.total + page_size - 1) / page_size;
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Whether a "next" navigation from this page is valid
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether a "previous" navigation from this page is valid
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 1-based index of the first match shown on this page, 0 when empty
    pub fn first_index(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        u64::from(self.page - 1) * u64::from(self.page_size) + 1
    }

    /// 1-based index of the last match shown on this page
    pub fn last_index(&self) -> u64 {
        (u64::from(self.page) * u64::from(self.page_size)).min(self.total)
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Token identifying one issued search request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Serializes search results against out-of-order completion
///
/// Each search the caller starts gets a token from [`begin`]; when the
/// response arrives the caller offers it back through [`commit`]. Only the
/// response for the most recently begun request is accepted, so a slow
/// response for a superseded query can never overwrite newer results.
/// There is no cancellation: stale requests simply complete into the void.
///
/// [`begin`]: SearchSession::begin
/// [`commit`]: SearchSession::commit
#[derive(Debug, Default)]
pub struct SearchSession {
    latest: u64,
    current: Option<SearchPage>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new outgoing request, superseding all earlier ones
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Offer a completed response for display
    ///
    /// Returns `true` and stores the page when the token belongs to the
    /// latest begun request; returns `false` and discards it otherwise.
    pub fn commit(&mut self, token: RequestToken, page: SearchPage) -> bool {
        if token.0 != self.latest {
            return false;
        }
        self.current = Some(page);
        true
    }

    /// Whether this token still belongs to the latest request
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// The committed results currently on display, if any
    pub fn results(&self) -> Option<&SearchPage> {
        self.current.as_ref()
    }
}

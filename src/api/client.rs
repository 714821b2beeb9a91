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


//! HTTP client for the book catalog
//!
//! Wraps `reqwest` for the catalog's search endpoint with:
//! - Local guards: empty queries and page 0 are rejected before any request
//! - Bounded retry with exponential backoff on transient failures
//! - Parse errors reported with a body snippet for diagnostics
//!
//! Search failures are recoverable by design: the caller keeps whatever it
//! was displaying, clears its loading indicator, and reports the miss.

use crate::api::search::{SearchPage, SearchResults};
use crate::error::{Result, ShelfError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

/// Default catalog endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://openlibrary.org/";

/// Fixed page size for search requests
pub const RESULTS_PER_PAGE: u32 = 100;

/// Maximum attempts per search (1 initial + 2 retries)
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial retry delay in seconds (exponential backoff: 1s, 2s, 4s)
const INITIAL_RETRY_DELAY_SECS: u64 = 1;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How much response body to keep in a parse-error report
const PARSE_ERROR_SNIPPET_CHARS: usize = 400;

/// Configuration for CatalogClient
/// Provides a builder pattern for client customization
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub user_agent: String,
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: MAX_RETRY_ATTEMPTS,
            user_agent: format!("Shelfmark/{}", env!("CARGO_PKG_VERSION")),
            page_size: RESULTS_PER_PAGE,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for ClientConfig
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// HTTP client for catalog search
///
/// The one suspending operation in the crate; all list-store work stays
/// synchronous. The client is read-only toward the catalog and holds no
/// list state of its own.
#[derive(Debug)]
pub struct CatalogClient {
    http: Client,
    config: ClientConfig,
}

impl CatalogClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with custom configuration
    ///
    /// # Errors
    /// Returns error if the base URL does not parse, the user agent is not
    /// a valid header value, or the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        // Reject a bad base URL at construction, not on first search
        Url::parse(&config.base_url).map_err(|err| {
            ShelfError::search_failed(
                format!("invalid catalog base URL '{}': {}", config.base_url, err),
                None,
            )
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|err| {
                ShelfError::MissingRequiredField(format!("valid user agent ({err})"))
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    /// Create a builder for custom client configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfig::builder()
    }

    /// Get the configured page size
    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Search the catalog
    ///
    /// # Arguments
    /// * `query` - Free-text query; must contain non-whitespace characters
    /// * `page` - 1-based page number
    ///
    /// # Errors
    /// - `EmptyQuery` / `InvalidPage` for locally rejected input (no request
    ///   is issued)
    /// - `SearchFailed` / `NetworkError` when the catalog or the connection
    ///   fails after the retry budget
    /// - `InvalidSearchResponse` when the body does not parse
    pub async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ShelfError::EmptyQuery);
        }
        if page == 0 {
            return Err(ShelfError::InvalidPage(0));
        }

        debug!(query, page, "searching catalog");
        let results = self.fetch_page(query, page).await?;
        Ok(SearchPage::from_results(results, page, self.config.page_size))
    }

    /// Execute the search request with retry and exponential backoff
    ///
    /// Retries on: timeouts, connection errors, 5xx responses.
    /// No retry on: 4xx responses, parse failures.
    async fn fetch_page(&self, query: &str, page: u32) -> Result<SearchResults> {
        let url = self.search_url()?;
        let mut attempts = 0;
        let mut last_error: Option<ShelfError> = None;

        while attempts < self.config.max_retries.max(1) {
            attempts += 1;

            let request = self.http.get(url.clone()).query(&[
                ("q", query.to_string()),
                ("page", page.to_string()),
                ("limit", self.config.page_size.to_string()),
            ]);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return self.parse_results(response).await;
                    }

                    if status.is_server_error() && attempts < self.config.max_retries {
                        warn!(%status, attempts, "catalog returned server error, retrying");
                        last_error = Some(ShelfError::search_failed(
                            format!("catalog returned {status}"),
                            Some(status.as_u16()),
                        ));
                        self.backoff(attempts).await;
                        continue;
                    }

                    return Err(ShelfError::search_failed(
                        format!("catalog returned {status}"),
                        Some(status.as_u16()),
                    ));
                }

                Err(err)
                    if (err.is_timeout() || err.is_connect())
                        && attempts < self.config.max_retries =>
                {
                    warn!(error = %err, attempts, "catalog request failed, retrying");
                    last_error = Some(ShelfError::network(
                        format!("request failed: {err}"),
                        true,
                    ));
                    self.backoff(attempts).await;
                }

                Err(err) => {
                    return Err(ShelfError::network(format!("request failed: {err}"), false));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ShelfError::search_failed(format!("search gave up after {attempts} attempts"), None)
        }))
    }

    fn search_url(&self) -> Result<Url> {
        let base = Url::parse(&self.config.base_url).map_err(|err| {
            ShelfError::search_failed(format!("invalid catalog base URL: {err}"), None)
        })?;
        base.join("search.json").map_err(|err| {
            ShelfError::search_failed(format!("invalid catalog endpoint: {err}"), None)
        })
    }

    /// Parse a successful response, keeping a snippet on failure
    async fn parse_results(&self, response: Response) -> Result<SearchResults> {
        let body = response.text().await.map_err(|err| {
            ShelfError::search_failed(format!("failed to read response body: {err}"), None)
        })?;

        serde_json::from_str(&body).map_err(|err| ShelfError::InvalidSearchResponse {
            message: format!("parse error: {err}"),
            response_body: Some(body.chars().take(PARSE_ERROR_SNIPPET_CHARS).collect()),
        })
    }

    async fn backoff(&self, attempts: u32) {
        let delay = Duration::from_secs(INITIAL_RETRY_DELAY_SECS * 2_u64.pow(attempts - 1));
        sleep(delay).await;
    }
}

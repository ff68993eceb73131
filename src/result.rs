//! Search result types.

use serde::{Deserialize, Serialize};

/// Upper bound on the number of results in a [`ResultSet`].
pub const MAX_RESULTS: usize = 10;

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub link: String,
    /// Result snippet, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Display form of the host, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_link: Option<String>,
}

impl SearchResult {
    /// Creates a new search result.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: None,
            display_link: None,
        }
    }

    /// Sets the snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Sets the display link.
    pub fn with_display_link(mut self, display_link: impl Into<String>) -> Self {
        self.display_link = Some(display_link.into());
        self
    }
}

/// Ordered results of one search, at most [`MAX_RESULTS`] long.
///
/// Order is the order the remote service returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    results: Vec<SearchResult>,
    /// Estimated total number of matches reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    /// Server-side search time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_time: Option<f64>,
    /// Start index of the next page, if the service offers one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_start: Option<u32>,
}

impl ResultSet {
    /// Creates a new empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a result set from the given results, keeping the first [`MAX_RESULTS`].
    pub fn from_results(mut results: Vec<SearchResult>) -> Self {
        results.truncate(MAX_RESULTS);
        Self {
            results,
            ..Self::default()
        }
    }

    /// Returns the results.
    pub fn items(&self) -> &[SearchResult] {
        &self.results
    }

    /// Consumes the set and returns the results.
    pub fn into_items(self) -> Vec<SearchResult> {
        self.results
    }

    /// Number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when the service returned no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Sets the estimated total match count.
    pub fn with_total_results(mut self, total: u64) -> Self {
        self.total_results = Some(total);
        self
    }

    /// Sets the server-side search time.
    pub fn with_search_time(mut self, seconds: f64) -> Self {
        self.search_time = Some(seconds);
        self
    }

    /// Sets the next page start index.
    pub fn with_next_start(mut self, start: u32) -> Self {
        self.next_start = Some(start);
        self
    }
}

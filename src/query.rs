//! Search query representation.

use serde::{Deserialize, Serialize};

use crate::result::MAX_RESULTS;
use crate::{Result, SearchError};

/// Safe search level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    /// No filtering.
    #[default]
    Off,
    /// Filter explicit results.
    Active,
}

impl SafeSearch {
    /// Wire value of the `safe` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Active => "active",
        }
    }
}

/// A search query with its request options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search terms, sent verbatim (after percent-encoding).
    pub query: String,
    /// Maximum number of results to request, 1..=10.
    pub limit: usize,
    /// 1-based index of the first result.
    pub start: u32,
    /// Language restriction (e.g., "lang_en").
    pub language: Option<String>,
    /// Safe search level.
    pub safesearch: SafeSearch,
}

impl SearchQuery {
    /// Creates a new search query with the given terms.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: MAX_RESULTS,
            start: 1,
            language: None,
            safesearch: SafeSearch::Off,
        }
    }

    /// Sets the maximum number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the 1-based start index.
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    /// Sets the language restriction.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the safe search level.
    pub fn with_safesearch(mut self, level: SafeSearch) -> Self {
        self.safesearch = level;
        self
    }

    /// Checks the request options. The query text itself is not validated.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_RESULTS {
            return Err(SearchError::InvalidQuery(format!(
                "limit must be between 1 and {}, got {}",
                MAX_RESULTS, self.limit
            )));
        }
        if self.start == 0 {
            return Err(SearchError::InvalidQuery("start index is 1-based".into()));
        }
        Ok(())
    }

    /// Optional request parameters, in the order they are appended to the URL.
    pub(crate) fn extra_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if self.limit != MAX_RESULTS {
            params.push(("num", self.limit.to_string()));
        }
        if self.start > 1 {
            params.push(("start", self.start.to_string()));
        }
        if let Some(language) = &self.language {
            params.push(("lr", language.clone()));
        }
        if self.safesearch != SafeSearch::Off {
            params.push(("safe", self.safesearch.as_str().to_string()));
        }
        params
    }
}

//! Error types for the search client.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Coarse classification of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable HTTP response: network failure, timeout or non-success status.
    Transport,
    /// The API answered with an `error` object.
    Api,
    /// The body was not the expected JSON shape.
    MalformedResponse,
    /// Bad configuration or request options; nothing was sent.
    Config,
}

/// Errors that can occur during a search.
#[derive(Error, Debug)]
pub enum SearchError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status without an API error payload.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Error object reported by the search API.
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A result entry that was included in the result set lacked a required field.
    #[error("Malformed result entry at rank {rank}: {reason}")]
    MalformedEntry { rank: usize, reason: String },

    /// Invalid query options.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Missing or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl SearchError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Timeout(_) | Self::Status { .. } => ErrorKind::Transport,
            Self::Api { .. } => ErrorKind::Api,
            Self::Parse(_) | Self::MalformedEntry { .. } => ErrorKind::MalformedResponse,
            Self::InvalidQuery(_) | Self::Config(_) | Self::UrlParse(_) => ErrorKind::Config,
        }
    }

    /// Returns true if no response body could be interpreted at all.
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    /// Returns true if the remote service rejected the request.
    ///
    /// Covers both an explicit API error object and a bare non-success status.
    pub fn is_remote_rejection(&self) -> bool {
        matches!(self, Self::Api { .. } | Self::Status { .. })
    }

    /// Process exit code used by the CLI for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Api { .. } | Self::Status { .. } => 1,
            Self::Http(_) | Self::Timeout(_) => 3,
            Self::Parse(_) | Self::MalformedEntry { .. } => 4,
            Self::InvalidQuery(_) | Self::Config(_) | Self::UrlParse(_) => 5,
        }
    }
}

//! # cse-search
//!
//! A small client for a single custom-search JSON endpoint.
//!
//! One call sends one GET request with the query, API key and search engine
//! identifier as percent-encoded parameters, and returns up to ten
//! `(title, link)` results in the order the service ranked them.
//!
//! - Credentials come from a YAML config file or `CSE_*` environment variables
//! - Requests are bounded by an explicit timeout
//! - Zero results, API errors, transport failures and malformed entries are
//!   reported distinctly
//! - Query suggestions come from the companion autocomplete endpoint
//! - The network is behind the [`Transport`] trait, so callers can inject a fake
//!
//! ## Example
//!
//! ```rust,no_run
//! use cse_search::{Credentials, SearchClient, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credentials = Credentials::new(
//!         std::env::var("CSE_API_KEY")?,
//!         std::env::var("CSE_ENGINE_ID")?,
//!     );
//!     let client = SearchClient::new(credentials)?;
//!
//!     let results = client.search(&SearchQuery::new("two pointers")).await?;
//!     for (i, result) in results.items().iter().enumerate() {
//!         println!("{}. {} - {}", i + 1, result.title, result.link);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod query;
mod response;
mod result;
mod suggest;
mod transport;
mod transport_http;

pub mod config;
pub mod output;

pub use client::{search, SearchClient};
pub use config::{Credentials, SearchConfig};
pub use error::{ErrorKind, Result, SearchError};
pub use query::{SafeSearch, SearchQuery};
pub use response::parse_response;
pub use result::{ResultSet, SearchResult, MAX_RESULTS};
pub use suggest::{parse_suggestions, suggest, SuggestClient, Suggestions};
pub use transport::{HttpResponse, Transport};
pub use transport_http::{HttpTransport, HttpTransportBuilder, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

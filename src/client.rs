//! Search client for a single custom-search endpoint.

use tracing::{debug, warn};
use url::Url;

use crate::config::{Credentials, SearchConfig, DEFAULT_ENDPOINT};
use crate::response::parse_response;
use crate::transport::Transport;
use crate::transport_http::HttpTransport;
use crate::{Result, ResultSet, SearchQuery};

/// Performs one search request per call and returns a bounded result list.
///
/// The client holds no per-request state; calls are independent.
pub struct SearchClient<T = HttpTransport> {
    transport: T,
    credentials: Credentials,
    endpoint: Option<Url>,
}

impl SearchClient<HttpTransport> {
    /// Creates a client with the default endpoint and HTTP transport.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?, credentials))
    }

    /// Creates a client from resolved settings.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let endpoint = config.endpoint_url()?;
        let transport = config.build_transport()?;
        Ok(Self::with_transport(transport, credentials).with_endpoint(endpoint))
    }
}

impl<T: Transport> SearchClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            endpoint: None,
        }
    }

    /// Sets the endpoint base URL.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds the request URL for `query`, with every parameter percent-encoded.
    pub fn request_url(&self, query: &SearchQuery) -> Result<Url> {
        let mut url = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => Url::parse(DEFAULT_ENDPOINT)?,
        };

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", &query.query)
                .append_pair("key", self.credentials.api_key())
                .append_pair("cx", self.credentials.engine_id());
            for (name, value) in query.extra_params() {
                pairs.append_pair(name, &value);
            }
        }

        Ok(url)
    }

    /// Performs the search.
    ///
    /// Returns an empty set when the service reports no `items`. Transport
    /// failures, API errors and malformed entries are returned as errors.
    pub async fn search(&self, query: &SearchQuery) -> Result<ResultSet> {
        query.validate()?;
        let url = self.request_url(query)?;
        debug!("GET {}", redacted(&url));

        let response = self.transport.get(&url).await.map_err(|e| {
            warn!("Search request failed: {}", e);
            e
        })?;

        let results = parse_response(&response, query.limit).map_err(|e| {
            warn!("Search for {:?} failed: {}", query.query, e);
            e
        })?;

        debug!(
            "Search for {:?} returned {} results (total {:?})",
            query.query,
            results.len(),
            results.total_results
        );
        Ok(results)
    }
}

/// Searches once with the default endpoint and timeout.
pub async fn search(query: &str, api_key: &str, context_id: &str) -> Result<ResultSet> {
    let client = SearchClient::new(Credentials::new(api_key, context_id))?;
    client.search(&SearchQuery::new(query)).await
}

/// Returns `url` with the `key` parameter hidden, for logging.
fn redacted(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                "REDACTED".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

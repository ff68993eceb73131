//! Query suggestions (autocomplete) for a partial search string.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::{SearchConfig, DEFAULT_SUGGEST_ENDPOINT};
use crate::response::status_error;
use crate::transport::{HttpResponse, Transport};
use crate::transport_http::HttpTransport;
use crate::{Result, SearchError};

/// Client identifier that selects the OpenSearch JSON response shape.
const SUGGEST_CLIENT: &str = "firefox";

/// Completions offered for a query, in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    /// The query as echoed back by the service.
    pub query: String,
    /// Suggested completions.
    pub suggestions: Vec<String>,
}

impl Suggestions {
    /// True when the service offered no completions.
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }
}

/// Fetches query suggestions. No credentials are needed.
pub struct SuggestClient<T = HttpTransport> {
    transport: T,
    endpoint: Option<Url>,
}

impl SuggestClient<HttpTransport> {
    /// Creates a client with the default endpoint and HTTP transport.
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// Creates a client from resolved settings.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let endpoint = config.suggest_endpoint_url()?;
        Ok(Self::with_transport(config.build_transport()?).with_endpoint(endpoint))
    }
}

impl<T: Transport> SuggestClient<T> {
    /// Creates a client that sends requests through `transport`.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            endpoint: None,
        }
    }

    /// Sets the endpoint base URL.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Builds the request URL for `query`.
    pub fn request_url(&self, query: &str) -> Result<Url> {
        let mut url = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => Url::parse(DEFAULT_SUGGEST_ENDPOINT)?,
        };
        url.query_pairs_mut()
            .append_pair("client", SUGGEST_CLIENT)
            .append_pair("q", query);
        Ok(url)
    }

    /// Returns completions for `query`.
    ///
    /// A blank query is rejected without sending a request.
    pub async fn suggest(&self, query: &str) -> Result<Suggestions> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query is required".into()));
        }

        let url = self.request_url(query)?;
        debug!("GET {}", url);

        let response = self.transport.get(&url).await.map_err(|e| {
            warn!("Suggestion request failed: {}", e);
            e
        })?;

        let suggestions = parse_suggestions(&response)?;
        debug!("{} suggestions for {:?}", suggestions.suggestions.len(), query);
        Ok(suggestions)
    }
}

/// Fetches suggestions once with the default endpoint and timeout.
pub async fn suggest(query: &str) -> Result<Suggestions> {
    SuggestClient::new()?.suggest(query).await
}

/// Parses an OpenSearch suggestion body: `["query", ["completion", ...], ...]`.
pub fn parse_suggestions(response: &HttpResponse) -> Result<Suggestions> {
    if !response.is_success() {
        return Err(status_error(response.status, &response.body));
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| SearchError::Parse(format!("invalid JSON: {}", e)))?;

    let parts = value
        .as_array()
        .ok_or_else(|| SearchError::Parse("expected a JSON array of suggestions".into()))?;

    let query = parts
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| SearchError::Parse("missing echoed query".into()))?
        .to_string();

    let suggestions = match parts.get(1) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry.as_str().map(str::to_string).ok_or_else(|| {
                    SearchError::Parse(format!("suggestion {} is not a string", i + 1))
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(SearchError::Parse("suggestion list is not an array".into())),
    };

    Ok(Suggestions { query, suggestions })
}

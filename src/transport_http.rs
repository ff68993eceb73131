//! HTTP transport using reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Proxy};
use tracing::debug;
use url::Url;

use crate::transport::{HttpResponse, Transport};
use crate::{Result, SearchError};

/// Timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("cse-search/", env!("CARGO_PKG_VERSION"));

/// A transport that performs real HTTP requests via reqwest.
///
/// Every request is bounded by the configured timeout.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport with the default timeout and user agent.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Starts building a transport.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Creates a transport with a custom reqwest client.
    ///
    /// `timeout` is only used for error reporting; the client must enforce it.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout(self.timeout)
        } else {
            SearchError::Http(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_error(e))?;
        debug!("Received HTTP {} ({} bytes)", status, body.len());

        Ok(HttpResponse { status, body })
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for HttpTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl HttpTransportBuilder {
    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Routes requests through a proxy (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080).
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Builds the transport.
    pub fn build(self) -> Result<HttpTransport> {
        if self.timeout.is_zero() {
            return Err(SearchError::Config("timeout must be greater than zero".into()));
        }

        let mut builder = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent);

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(parse_proxy(proxy)?);
        }

        let client = builder.build()?;
        Ok(HttpTransport::with_client(client, self.timeout))
    }
}

fn parse_proxy(proxy: &str) -> Result<Proxy> {
    let url = Url::parse(proxy)?;

    match url.scheme() {
        "http" | "https" | "socks5" | "socks5h" => {}
        scheme => {
            return Err(SearchError::Config(format!(
                "unsupported proxy protocol: {}",
                scheme
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(SearchError::Config("missing proxy host".into()));
    }

    Ok(Proxy::all(url)?)
}

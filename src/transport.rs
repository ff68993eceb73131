//! Transport abstraction for issuing the search request.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for performing a GET request.
///
/// Any status code is returned as a response; only the failure to get a
/// response at all (connection error, timeout) is an error. All settings
/// (timeouts, proxy, user-agent) are fixed at construction time.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the given URL.
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        (**self).get(url).await
    }
}

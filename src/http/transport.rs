//! Transport abstraction

use crate::error::Result;
use crate::translate::QueryParams;
use async_trait::async_trait;

/// A fully specified GET for one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Endpoint without query string
    pub url: String,
    /// Request headers in send order
    pub headers: Vec<(String, String)>,
    /// Cookies, sent as a single `cookie` header
    pub cookies: Vec<(String, String)>,
    /// Query parameters
    pub params: QueryParams,
}

impl PageRequest {
    /// Create a request for an endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a cookie
    #[must_use]
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Set query parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }
}

/// Raw response of a page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers as received
    pub headers: Vec<(String, String)>,
    /// Response body text
    pub body: String,
}

impl TransportResponse {
    /// Create a response with a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Only 200 counts as a page
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Issues page requests on behalf of the pagination engine
#[async_trait]
pub trait PageTransport: Send + Sync {
    /// Send a GET and return the raw response, whatever its status
    async fn get(&self, request: &PageRequest) -> Result<TransportResponse>;
}

#[async_trait]
impl<T: PageTransport + ?Sized> PageTransport for &T {
    async fn get(&self, request: &PageRequest) -> Result<TransportResponse> {
        (**self).get(request).await
    }
}

/// Render cookies as a `cookie` header value
pub fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

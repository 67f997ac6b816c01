//! Capture types
//!
//! The request description recovered from capture text.

use crate::types::StringMap;

/// A captured request, before any replay-specific normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// HTTP method, `GET` when the capture does not name one
    pub method: String,
    /// Full request URL including the query string
    pub url: String,
    /// Headers as captured, minus any cookie header
    pub headers: StringMap,
    /// Cookies decoded from the cookie header, if one was captured
    pub cookies: Option<StringMap>,
    /// Raw request body
    pub body: Option<String>,
}

impl ParsedRequest {
    /// Look up a header by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value.as_str());
        }
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Look up a cookie by exact name
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .as_ref()
            .and_then(|jar| jar.get(name))
            .map(String::as_str)
    }
}

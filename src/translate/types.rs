//! Request template types
//!
//! Query parameters with multi-value semantics and the immutable template
//! replayed for every page.

use crate::error::{Error, Result};
use crate::types::{Cursor, JsonObject, JsonValue};
use std::fmt;

/// Header carrying the bearer token
pub const AUTH_HEADER: &str = "authorization";

/// Header carrying the CSRF token
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Cookie holding the authenticated session
pub const SESSION_COOKIE: &str = "auth_token";

/// Cookie the CSRF header is validated against
pub const CSRF_COOKIE: &str = "ct0";

/// Query parameter holding the GraphQL variables as JSON
pub const VARIABLES_PARAM: &str = "variables";

/// Variables field naming the timeline owner
pub const SUBJECT_FIELD: &str = "userId";

/// Variables field carrying the continuation cursor
pub const CURSOR_FIELD: &str = "cursor";

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters keyed in capture order, each key holding every value seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw query string, dropping blank values
    pub fn from_query(query: &str) -> Self {
        url::form_urlencoded::parse(query.as_bytes())
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    /// Append a value, keeping earlier values for the same key
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.entries.push((key, vec![value.into()])),
        }
    }

    /// Replace all values of a key, keeping its position
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((key, values)),
        }
    }

    /// All values of a key
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// First value of a key
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys with their values
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Flatten into `(key, value)` pairs for the wire
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.clone(), v.clone())))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}

// ============================================================================
// Request Template
// ============================================================================

/// Replayable first-page request, immutable once translated
#[derive(Clone)]
pub struct RequestTemplate {
    base_url: String,
    query: QueryParams,
    auth_token: String,
    csrf_token: String,
    session_cookie: String,
    csrf_cookie: String,
}

impl RequestTemplate {
    pub(crate) fn new(
        base_url: String,
        query: QueryParams,
        auth_token: String,
        csrf_token: String,
        session_cookie: String,
        csrf_cookie: String,
    ) -> Self {
        Self {
            base_url,
            query,
            auth_token,
            csrf_token,
            session_cookie,
            csrf_cookie,
        }
    }

    /// Endpoint without query string
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameters as captured
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Value for the `authorization` header
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Value for the `x-csrf-token` header
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// Value for the session cookie
    pub fn session_cookie(&self) -> &str {
        &self.session_cookie
    }

    /// Value for the CSRF cookie
    pub fn csrf_cookie(&self) -> &str {
        &self.csrf_cookie
    }

    /// Decoded GraphQL variables of the captured request
    pub fn variables(&self) -> Result<JsonObject> {
        decode_variables(&self.query)
    }

    /// Query parameters for one page
    ///
    /// Without a cursor any `cursor` variable is removed, otherwise it is set
    /// to the given token. Every other parameter is passed through untouched.
    pub fn params_for(&self, cursor: Option<&Cursor>) -> Result<QueryParams> {
        let mut variables = self.variables()?;
        match cursor {
            None => {
                variables.remove(CURSOR_FIELD);
            }
            Some(cursor) => {
                variables.insert(
                    CURSOR_FIELD.to_string(),
                    JsonValue::String(cursor.as_str().to_string()),
                );
            }
        }

        let mut params = self.query.clone();
        params.set(VARIABLES_PARAM, vec![serde_json::to_string(&variables)?]);
        Ok(params)
    }
}

impl fmt::Debug for RequestTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestTemplate")
            .field("base_url", &self.base_url)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// Decode the first `variables` value as a JSON object
pub(crate) fn decode_variables(query: &QueryParams) -> Result<JsonObject> {
    let raw = query.first(VARIABLES_PARAM).ok_or_else(|| {
        Error::precondition(VARIABLES_PARAM, "query parameter is missing from the URL")
    })?;

    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(other) => Err(Error::precondition(
            VARIABLES_PARAM,
            format!("expected a JSON object, found {other}"),
        )),
        Err(e) => Err(Error::precondition(
            VARIABLES_PARAM,
            format!("not valid JSON: {e}"),
        )),
    }
}

//! Capture to template translation

use super::types::{
    decode_variables, QueryParams, RequestTemplate, AUTH_HEADER, CSRF_COOKIE, CSRF_HEADER,
    CURSOR_FIELD, SESSION_COOKIE, SUBJECT_FIELD, VARIABLES_PARAM,
};
use crate::capture::ParsedRequest;
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use tracing::{debug, warn};
use url::{Position, Url};

/// Translate a parsed capture into a replayable first-page template
pub fn translate(request: &ParsedRequest) -> Result<RequestTemplate> {
    let url = Url::parse(&request.url)?;
    if !request.method.eq_ignore_ascii_case("GET") {
        warn!(
            method = %request.method,
            "Captured request is not a GET, pages will be fetched with GET anyway"
        );
    }

    let base_url = url[..Position::AfterPath].to_string();
    let query = QueryParams::from_query(url.query().unwrap_or_default());

    let variables = decode_variables(&query)?;
    if !variables.contains_key(SUBJECT_FIELD) {
        return Err(Error::precondition(
            SUBJECT_FIELD,
            format!("not found in {VARIABLES_PARAM}, capture a timeline request for a single user"),
        ));
    }
    if variables.contains_key(CURSOR_FIELD) {
        return Err(Error::precondition(
            CURSOR_FIELD,
            format!("already present in {VARIABLES_PARAM}, capture the first timeline request instead"),
        ));
    }

    let auth_token = required(request.header(AUTH_HEADER), AUTH_HEADER, "header")?;
    let csrf_token = required(request.header(CSRF_HEADER), CSRF_HEADER, "header")?;
    let session_cookie = required(request.cookie(SESSION_COOKIE), SESSION_COOKIE, "cookie")?;
    let csrf_cookie = required(request.cookie(CSRF_COOKIE), CSRF_COOKIE, "cookie")?;

    debug!(
        base_url = %base_url,
        params = query.len(),
        "Translated capture into request template"
    );

    Ok(RequestTemplate::new(
        base_url,
        query,
        auth_token,
        csrf_token,
        session_cookie,
        csrf_cookie,
    ))
}

fn required(value: Option<&str>, field: &str, kind: &str) -> Result<String> {
    value
        .map(str::to_string)
        .none_if_empty()
        .ok_or_else(|| Error::precondition(field, format!("{kind} is missing from the capture")))
}

//! Capture text scanner
//!
//! Scans the fetch call line by line and decodes the options body.

use super::cookie::merge_cookie_string;
use super::types::ParsedRequest;
use crate::error::{Error, Result};
use crate::types::StringMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Opening of the captured call, up to the URL quote
pub const CALL_OPEN: &str = "fetch(";

/// Text between the closing URL quote and the options body
const OPTIONS_OPEN: &str = ", {";

/// Closing line of the captured call
pub const CALL_CLOSE: &str = "});";

/// Method used when the capture does not name one
const DEFAULT_METHOD: &str = "GET";

/// Ways the first or last line of a capture can be malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineFault {
    /// Capture has fewer than the two framing lines
    TooFewLines(usize),
    /// First line does not start with the call opening
    MissingCallOpen,
    /// Call opening is not followed by a quoted URL
    MissingUrlQuote,
    /// URL quote is never closed
    UnterminatedUrl,
    /// URL between the quotes is empty
    EmptyUrl,
    /// More quotes follow the URL
    ExtraQuote,
    /// URL is not followed by the options opening
    MissingOptionsOpen(String),
    /// Last line is not the call closing
    MissingCallClose(String),
}

impl fmt::Display for LineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewLines(count) => {
                write!(f, "expected at least 2 lines, found {count}")
            }
            Self::MissingCallOpen => write!(f, "line 1 must start with `{CALL_OPEN}`"),
            Self::MissingUrlQuote => write!(f, "line 1 must quote the URL after `{CALL_OPEN}`"),
            Self::UnterminatedUrl => write!(f, "line 1 never closes the URL quote"),
            Self::EmptyUrl => write!(f, "line 1 has an empty URL"),
            Self::ExtraQuote => write!(f, "line 1 has unexpected quotes after the URL"),
            Self::MissingOptionsOpen(found) => {
                write!(f, "line 1 must end with `{OPTIONS_OPEN}`, found `{found}`")
            }
            Self::MissingCallClose(found) => {
                write!(f, "last line must be `{CALL_CLOSE}`, found `{found}`")
            }
        }
    }
}

impl From<LineFault> for Error {
    fn from(fault: LineFault) -> Self {
        Error::parse(fault.to_string())
    }
}

/// Options argument of the captured call
#[derive(Debug, Default, Deserialize)]
struct FetchOptions {
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

/// Load and parse a capture file
pub fn load_capture(path: impl AsRef<Path>) -> Result<ParsedRequest> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    parse_capture(&text)
}

/// Parse capture text into a request description
pub fn parse_capture(text: &str) -> Result<ParsedRequest> {
    let lines: Vec<&str> = text.lines().collect();

    let [first, body @ .., last] = lines.as_slice() else {
        return Err(LineFault::TooFewLines(lines.len()).into());
    };

    let url = scan_call_line(first)?;

    if last.trim() != CALL_CLOSE {
        return Err(LineFault::MissingCallClose(last.trim().to_string()).into());
    }

    let options_json = format!("{{{}}}", body.join("\n"));
    let options: FetchOptions = serde_json::from_str(&options_json)
        .map_err(|e| Error::parse(format!("options body is not valid JSON: {e}")))?;

    let request = into_request(url, options);
    debug!(
        method = %request.method,
        headers = request.headers.len(),
        has_cookies = request.cookies.is_some(),
        "Parsed capture"
    );
    Ok(request)
}

/// Scan `fetch("<url>", {` and return the URL
fn scan_call_line(line: &str) -> std::result::Result<&str, LineFault> {
    let rest = line
        .strip_prefix(CALL_OPEN)
        .ok_or(LineFault::MissingCallOpen)?;
    let rest = rest.strip_prefix('"').ok_or(LineFault::MissingUrlQuote)?;
    let (url, tail) = rest.split_once('"').ok_or(LineFault::UnterminatedUrl)?;

    if url.is_empty() {
        return Err(LineFault::EmptyUrl);
    }

    let tail = tail.trim_end();
    if tail.contains('"') {
        return Err(LineFault::ExtraQuote);
    }
    if tail != OPTIONS_OPEN {
        return Err(LineFault::MissingOptionsOpen(tail.to_string()));
    }

    Ok(url)
}

fn into_request(url: &str, options: FetchOptions) -> ParsedRequest {
    let mut headers = StringMap::new();
    let mut cookies: Option<StringMap> = None;

    for (name, value) in options.headers {
        if name.eq_ignore_ascii_case("cookie") {
            merge_cookie_string(&value, cookies.get_or_insert_with(StringMap::new));
        } else {
            headers.insert(name, value);
        }
    }

    ParsedRequest {
        method: options
            .method
            .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
        url: url.to_string(),
        headers,
        cookies,
        body: options.body,
    }
}

//! Cookie header decoding
//!
//! Decodes a request `cookie` header (`a=1; b="two"`) into a flat map.

use crate::types::StringMap;

/// Attribute names that belong to `Set-Cookie` syntax and never name a cookie
const RESERVED_ATTRIBUTES: &[&str] = &[
    "expires", "path", "comment", "domain", "max-age", "secure", "httponly", "version",
    "samesite",
];

/// Decode a semicolon-separated cookie string
///
/// Later occurrences of the same name replace earlier ones. Pairs without an
/// `=` and reserved attribute names are skipped. A value wrapped in double
/// quotes may contain `;` and backslash escapes, and is unquoted.
pub fn parse_cookie_string(header: &str) -> StringMap {
    let mut jar = StringMap::new();
    merge_cookie_string(header, &mut jar);
    jar
}

/// Decode a cookie string into an existing jar
pub(crate) fn merge_cookie_string(header: &str, jar: &mut StringMap) {
    for pair in split_pairs(header) {
        let Some((name, value)) = pair.trim().split_once('=') else {
            continue;
        };

        let name = name.trim();
        if name.is_empty() || is_reserved(name) {
            continue;
        }

        jar.insert(name.to_string(), unquote(value.trim()));
    }
}

/// Split on `;` separators that are not inside a quoted value
///
/// A quote only opens a quoted value right after the `=`.
fn split_pairs(header: &str) -> Vec<&str> {
    let mut pairs = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' if quoted => quoted = false,
            '"' if header[start..i].trim_end().ends_with('=') => quoted = true,
            ';' if !quoted => {
                pairs.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pairs.push(&header[start..]);
    pairs
}

fn is_reserved(name: &str) -> bool {
    RESERVED_ATTRIBUTES
        .iter()
        .any(|attr| attr.eq_ignore_ascii_case(name))
}

fn unquote(value: &str) -> String {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return value.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

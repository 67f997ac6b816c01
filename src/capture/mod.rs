//! Capture module
//!
//! Parses a browser "copy as fetch (Node.js)" capture into a [`ParsedRequest`].
//!
//! # Capture grammar
//!
//! ```text
//! capture  := CALL_OPEN '"' URL '"' ', {' NEWLINE body NEWLINE '});'
//! body     := JSON object members (the options argument without its braces)
//! ```
//!
//! The first line carries the URL, the last line closes the call, and every
//! line in between is decoded as the options object. Cookie headers are
//! lifted out of the header map into a structured cookie jar.

mod cookie;
mod parser;
mod types;

pub use cookie::parse_cookie_string;
pub use parser::{load_capture, parse_capture, LineFault, CALL_CLOSE, CALL_OPEN};
pub use types::ParsedRequest;

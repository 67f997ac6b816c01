//! HTTP module
//!
//! The pagination engine only needs one capability from the network: issue a
//! GET and hand back status, headers and body text. That capability is the
//! [`PageTransport`] trait; [`HttpTransport`] implements it with reqwest.
//!
//! Non-200 responses are returned as-is, deciding what is fatal is up to the
//! caller.

mod client;
mod transport;

pub use client::{HttpTransport, HttpTransportConfig, HttpTransportConfigBuilder};
pub use transport::{cookie_header, PageRequest, PageTransport, TransportResponse};

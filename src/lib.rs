// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # timeline-walker
//!
//! Replays a timeline request captured from a browser and walks every page of
//! the timeline by following its continuation cursors.
//!
//! ## Features
//!
//! - **Capture Parsing**: Reads a "copy as fetch" capture into a structured request
//! - **Request Translation**: Keeps the endpoint, query and the four credentials
//! - **Cursor Extraction**: Finds the `Bottom` cursor in each page
//! - **Sequential Pagination**: One request at a time, fixed pause between pages
//! - **Raw Output**: Every page saved byte for byte, unreadable pages preserved
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use timeline_walker::capture::load_capture;
//! use timeline_walker::http::HttpTransport;
//! use timeline_walker::output::PageDirectory;
//! use timeline_walker::pagination::PaginationEngine;
//! use timeline_walker::translate::translate;
//!
//! #[tokio::main]
//! async fn main() -> timeline_walker::Result<()> {
//!     let template = translate(&load_capture("fetch.js")?)?;
//!     let mut pages = PageDirectory::create("out")?;
//!
//!     let mut engine = PaginationEngine::new(HttpTransport::new()?, template);
//!     let stats = engine.run(&mut pages).await?;
//!     println!("{} pages", stats.pages_fetched);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! fetch.js ──▶ capture ──▶ translate ──▶ RequestTemplate
//!                                              │
//!                         ┌────────────────────┴─────────────┐
//!                         │        PaginationEngine          │
//!                         │  http ──▶ timeline ──▶ output    │
//!                         └──────────────────────────────────┘
//!                                              │
//!                              out/1.json, out/2.json, ...
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Capture file parsing
pub mod capture;

/// Capture to replayable request translation
pub mod translate;

/// Timeline payload model and cursor extraction
pub mod timeline;

/// HTTP transport
pub mod http;

/// Cursor-driven pagination engine
pub mod pagination;

/// Page persistence
pub mod output;

/// Run configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use capture::{load_capture, parse_capture, ParsedRequest};
pub use pagination::{PaginationEngine, RunStats};
pub use timeline::{extract, PageCursor};
pub use translate::{translate, RequestTemplate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

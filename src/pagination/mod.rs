//! Pagination module
//!
//! Cursor-driven walk over a timeline.
//!
//! # Overview
//!
//! [`PaginationEngine`] replays a [`RequestTemplate`](crate::translate::RequestTemplate)
//! page after page. Each response is checked (only 200 is accepted), its
//! cursor is extracted, the raw text goes to a [`PageSink`](crate::output::PageSink),
//! and the next request carries the new cursor after a fixed pause. The walk
//! ends when a page yields no cursor.
//!
//! ```text
//! Start ──▶ FetchingPage(1, none) ──▶ FetchingPage(2, c1) ──▶ ... ──▶ Done
//!                 │                          │
//!                 └──────────────────────────┴──────────────────────▶ Failed
//! ```

mod engine;
mod types;

pub use engine::PaginationEngine;
pub use types::{EngineState, PageResult, PaginationConfig, RetryPolicy, RunStats};

#[cfg(test)]
mod tests;

//! Output module
//!
//! Persists raw pages exactly as received.
//!
//! # Overview
//!
//! This module provides:
//! - [`PageSink`], the only capability the pagination engine needs on the output side
//! - [`PageDirectory`], one `<page>.json` file per page in a fresh directory
//! - [`MemorySink`], pages kept in memory
//! - [`write_recovery_file`], the postmortem copy of a page that could not be read

mod sink;
mod writer;

pub use sink::{MemorySink, PageSink};
pub use writer::{write_recovery_file, PageDirectory, DEFAULT_RECOVERY_FILE};

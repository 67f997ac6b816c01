//! CLI module
//!
//! Command-line interface for walking a timeline.
//!
//! # Commands
//!
//! - `run` - Fetch every page and write it under the output directory
//! - `validate` - Parse and translate the capture, no network access
//! - `inspect` - Extract the cursor from a saved page

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, RunArgs};
pub use runner::Runner;

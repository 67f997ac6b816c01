//! CLI commands and argument parsing

use crate::config::RunConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Replay a captured timeline request and save every page
#[derive(Parser, Debug)]
#[command(name = "timeline-walker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for summaries
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the whole timeline and write one file per page
    Run(RunArgs),

    /// Parse and translate the capture without touching the network
    Validate {
        /// Capture file (defaults to the configured one)
        #[arg(long)]
        capture: Option<PathBuf>,
    },

    /// Extract the cursor from a saved page or recovery file
    Inspect {
        /// Page file to inspect
        page: PathBuf,
    },
}

/// Overrides for a run, each one replacing the configured value
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Capture file holding the fetch call
    #[arg(long)]
    pub capture: Option<PathBuf>,

    /// Output directory, must not hold a previous run
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Where to preserve a page that cannot be read
    #[arg(long)]
    pub recovery_file: Option<PathBuf>,

    /// Pause between pages in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Retries for retryable failures (429, 5xx, timeouts)
    #[arg(long)]
    pub retries: Option<u32>,
}

impl RunArgs {
    /// Apply these overrides on top of a loaded config
    pub fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(capture) = &self.capture {
            config.capture = capture.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(recovery_file) = &self.recovery_file {
            config.recovery_file = recovery_file.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.pagination.page_delay_ms = delay_ms;
        }
        if self.max_pages.is_some() {
            config.pagination.max_pages = self.max_pages;
        }
        if let Some(retries) = self.retries {
            config.pagination.retry.max_retries = retries;
        }
        config
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

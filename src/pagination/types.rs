//! Pagination types
//!
//! Engine state, configuration, retry policy and run statistics.

use crate::error::Error;
use crate::output::DEFAULT_RECOVERY_FILE;
use crate::types::{BackoffType, Cursor};
use std::path::PathBuf;
use std::time::Duration;

/// State of a pagination run
///
/// The cursor for the next request lives only here and is moved from one
/// state to the next.
#[derive(Debug)]
pub enum EngineState {
    /// Nothing fetched yet
    Start,
    /// Fetching a page (1-based), with the cursor to send
    FetchingPage {
        /// Page index
        page: usize,
        /// Cursor for this page, absent for the first one
        cursor: Option<Cursor>,
    },
    /// Timeline exhausted or page cap reached
    Done,
    /// Run aborted
    Failed(Error),
}

impl EngineState {
    /// Check if the run has ended, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Response text exactly as received
    pub raw_payload: String,
    /// Cursor for the following page
    pub next_cursor: Option<Cursor>,
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Bounded retry policy for failed page requests
///
/// Only retryable failures (429, 5xx, timeouts, connection errors) are
/// retried. The default makes no retries at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff_type: BackoffType::Constant,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// No retries
    pub fn none() -> Self {
        Self::default()
    }

    /// Retry up to `max_retries` times with the default backoff
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Set backoff configuration
    #[must_use]
    pub fn with_backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.backoff_type = backoff_type;
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Whether another attempt is allowed after `attempt` (0-based) failed
    pub fn should_retry(&self, attempt: u32, error: &Error) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.initial_backoff.saturating_mul(factor)
            }
        };

        std::cmp::min(delay, self.max_backoff)
    }
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Configuration for a pagination run
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Pause between pages
    pub page_delay: Duration,
    /// Stop after this many pages
    pub max_pages: Option<usize>,
    /// Retry policy for page requests
    pub retry: RetryPolicy,
    /// Where to copy a page that cannot be read, `None` to skip
    pub recovery_path: Option<PathBuf>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_millis(500),
            max_pages: None,
            retry: RetryPolicy::default(),
            recovery_path: Some(PathBuf::from(DEFAULT_RECOVERY_FILE)),
        }
    }
}

impl PaginationConfig {
    /// Create a new pagination config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pause between pages
    #[must_use]
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Set the page cap
    #[must_use]
    pub fn with_max_pages(mut self, max: Option<usize>) -> Self {
        self.max_pages = max;
        self
    }

    /// Set the retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the recovery file path
    #[must_use]
    pub fn with_recovery_path(mut self, path: Option<PathBuf>) -> Self {
        self.recovery_path = path;
        self
    }
}

// ============================================================================
// Run Statistics
// ============================================================================

/// Statistics from a pagination run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Pages fetched and written
    pub pages_fetched: usize,
    /// Entries seen across all pages, cursor markers included
    pub entries_seen: usize,
    /// Entries that were not cursor markers
    pub content_entries: usize,
    /// Requests retried
    pub retries: usize,
    /// Last cursor followed
    pub last_cursor: Option<Cursor>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl RunStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page
    pub fn add_page(&mut self, entries: usize, content: usize) {
        self.pages_fetched += 1;
        self.entries_seen += entries;
        self.content_entries += content;
    }

    /// Record a retry
    pub fn add_retry(&mut self) {
        self.retries += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

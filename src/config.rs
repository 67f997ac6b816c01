//! Run configuration
//!
//! Optional YAML file with the settings of a timeline walk. Every field has a
//! default, so an empty file (or no file at all) gives the stock behaviour:
//! read `fetch.js`, write pages under `out/`, pause half a second between
//! pages and never retry.

use crate::error::{Error, Result};
use crate::http::HttpTransportConfig;
use crate::output::DEFAULT_RECOVERY_FILE;
use crate::pagination::{PaginationConfig, RetryPolicy};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Run Config
// ============================================================================

/// Complete run configuration loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// File holding the captured fetch call
    #[serde(default = "default_capture")]
    pub capture: PathBuf,

    /// Directory receiving one file per page
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Where an unreadable page is preserved
    #[serde(default = "default_recovery_file")]
    pub recovery_file: PathBuf,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// Pagination configuration
    #[serde(default)]
    pub pagination: PaginationSettings,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            capture: default_capture(),
            output: default_output(),
            recovery_file: default_recovery_file(),
            http: HttpConfig::default(),
            pagination: PaginationSettings::default(),
        }
    }
}

fn default_capture() -> PathBuf {
    PathBuf::from("fetch.js")
}

fn default_output() -> PathBuf {
    PathBuf::from("out")
}

fn default_recovery_file() -> PathBuf {
    PathBuf::from(DEFAULT_RECOVERY_FILE)
}

impl RunConfig {
    /// Check values that parse but cannot drive a run
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::config("http.timeout_secs must be greater than 0"));
        }

        if self.pagination.max_pages == Some(0) {
            return Err(Error::config("pagination.max_pages must be greater than 0"));
        }

        let retry = &self.pagination.retry;
        if retry.initial_backoff_ms > retry.max_backoff_ms {
            return Err(Error::config(
                "pagination.retry.initial_backoff_ms cannot exceed max_backoff_ms",
            ));
        }

        Ok(())
    }

    /// Pagination settings for the engine
    pub fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig::new()
            .with_page_delay(Duration::from_millis(self.pagination.page_delay_ms))
            .with_max_pages(self.pagination.max_pages)
            .with_retry(self.pagination.retry.to_policy())
            .with_recovery_path(Some(self.recovery_file.clone()))
    }

    /// Settings for the HTTP transport
    pub fn transport_config(&self) -> HttpTransportConfig {
        let mut builder =
            HttpTransportConfig::builder().timeout(Duration::from_secs(self.http.timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            builder = builder.user_agent(agent);
        }
        builder.build()
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent, the crate's own when unset
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Pagination settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// Pause between pages in milliseconds
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,

    /// Stop after this many pages
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay(),
            max_pages: None,
            retry: RetryConfig::default(),
        }
    }
}

fn default_page_delay() -> u64 {
    500
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(default)]
    pub max_retries: u32,

    /// Type of backoff
    #[serde(default)]
    pub backoff: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

fn default_initial_backoff() -> u64 {
    1000
}

fn default_max_backoff() -> u64 {
    60000
}

impl RetryConfig {
    /// Build the engine's retry policy
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries).with_backoff(
            self.backoff,
            Duration::from_millis(self.initial_backoff_ms),
            Duration::from_millis(self.max_backoff_ms),
        )
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load a run configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<RunConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load a run configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<RunConfig> {
    if yaml.trim().is_empty() {
        return Ok(RunConfig::default());
    }

    let config: RunConfig = serde_yaml::from_str(yaml)?;

    config.validate()?;
    Ok(config)
}

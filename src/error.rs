//! Error types for timeline-walker
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Every variant is fatal to a run: the walker never skips a page, so the
//! first error aborts and is reported to the operator.

use thiserror::Error;

/// The main error type for timeline-walker
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Capture Errors
    // ============================================================================
    /// Capture text does not have the expected fetch call shape
    #[error("Failed to parse capture: {message}")]
    Parse { message: String },

    /// Captured request is not a usable first-page request
    #[error("Captured request is not usable, {field}: {message}")]
    Precondition { field: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with something other than 200
    #[error("HTTP {status}: {body} (headers: {headers:?})")]
    Transport {
        status: u16,
        body: String,
        headers: Vec<(String, String)>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Payload Errors
    // ============================================================================
    /// Page payload does not match the timeline structure
    #[error("Failed to extract cursor: {message}")]
    Extraction { message: String },

    // ============================================================================
    // Output Errors
    // ============================================================================
    /// Output destination already holds a previous run
    #[error("Output destination '{path}' already exists, remove it to continue")]
    OutputConflict { path: String },

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a capture parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a precondition error for a field of the captured request
    pub fn precondition(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Precondition {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a transport error from a non-200 response
    pub fn transport(status: u16, body: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self::Transport {
            status,
            body: body.into(),
            headers,
        }
    }

    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create an output conflict error
    pub fn output_conflict(path: impl Into<String>) -> Self {
        Self::OutputConflict { path: path.into() }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Transport { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(
        status,
        429 | 500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// Result type alias for timeline-walker
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}

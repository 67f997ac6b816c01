//! CLI runner - executes commands

use crate::capture::load_capture;
use crate::cli::commands::{Cli, Commands, OutputFormat, RunArgs};
use crate::config::{load_config, RunConfig};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpTransport;
use crate::output::PageDirectory;
use crate::pagination::{PaginationEngine, RunStats};
use crate::timeline::extract_text;
use crate::translate::{translate, RequestTemplate, SUBJECT_FIELD};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run(args) => self.walk(args).await.map(|_| ()),
            Commands::Validate { capture } => self.validate(capture.as_deref()),
            Commands::Inspect { page } => self.inspect(page),
        }
    }

    /// Load the run configuration, or the defaults without `--config`
    fn load_config(&self) -> Result<RunConfig> {
        match &self.cli.config {
            Some(path) => load_config(path),
            None => Ok(RunConfig::default()),
        }
    }

    /// Walk the timeline described by the capture
    ///
    /// The output directory is claimed before the first request, so a run
    /// that would clobber an earlier one fails without touching the network.
    async fn walk(&self, args: &RunArgs) -> Result<RunStats> {
        let config = args.apply(self.load_config()?);
        config.validate()?;

        let request = load_capture(&config.capture)?;
        let template = translate(&request)?;
        let mut pages = PageDirectory::create(&config.output)?;

        info!(
            capture = %config.capture.display(),
            output = %pages.path().display(),
            "Starting timeline walk"
        );

        let transport = HttpTransport::with_config(config.transport_config())
            .context("Failed to build HTTP client")?;
        let mut engine =
            PaginationEngine::new(transport, template).with_config(config.pagination_config());
        let stats = engine.run(&mut pages).await?;

        self.output_message(&json!({
            "type": "RESULT",
            "result": {
                "output": pages.path().display().to_string(),
                "pages": stats.pages_fetched,
                "entries": stats.content_entries,
                "retries": stats.retries,
                "last_cursor": stats.last_cursor,
                "duration_ms": stats.duration_ms,
            }
        }));

        Ok(stats)
    }

    /// Check that the capture parses and translates
    fn validate(&self, capture: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let path = capture.unwrap_or(config.capture.as_path());

        let request = load_capture(path)?;
        let template = translate(&request)?;

        self.output_message(&template_summary(&template)?);
        Ok(())
    }

    /// Run the cursor extractor on a saved page
    fn inspect(&self, page: &Path) -> Result<()> {
        let text = fs::read_to_string(page).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: page.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;

        let cursor = extract_text(&text)?;
        self.output_message(&json!({
            "type": "PAGE",
            "page": {
                "path": page.display().to_string(),
                "entries": cursor.entry_count,
                "cursor_entries": cursor.cursor_entry_count,
                "bottom_cursor": cursor.bottom_cursor,
                "exhausted": cursor.exhausted,
            }
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Describe a template without revealing its credentials
fn template_summary(template: &RequestTemplate) -> Result<Value> {
    let variables = template.variables()?;
    let params: Vec<&str> = template.query().iter().map(|(key, _)| key).collect();

    Ok(json!({
        "type": "CAPTURE",
        "capture": {
            "endpoint": template.base_url(),
            "subject": variables.get(SUBJECT_FIELD),
            "params": params,
            "variables": variables.keys().collect::<Vec<_>>(),
            "credentials": {
                "authorization": redact(template.auth_token()),
                "x-csrf-token": redact(template.csrf_token()),
                "auth_token": redact(template.session_cookie()),
                "ct0": redact(template.csrf_cookie()),
            }
        }
    }))
}

/// Replace a secret with its length
fn redact(secret: &str) -> String {
    format!("<{} chars>", secret.chars().count())
}

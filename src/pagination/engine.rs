//! Pagination engine
//!
//! Drives the fetch/advance loop: one request at a time, each one carrying
//! the cursor extracted from the page before it.

use super::types::{EngineState, PageResult, PaginationConfig, RunStats};
use crate::error::{Error, Result};
use crate::http::{PageRequest, PageTransport, TransportResponse};
use crate::output::{write_recovery_file, PageSink};
use crate::timeline::extract_text;
use crate::translate::{RequestTemplate, AUTH_HEADER, CSRF_COOKIE, CSRF_HEADER, SESSION_COOKIE};
use crate::types::Cursor;
use std::time::Instant;
use tracing::{error, info, warn};

/// Walks a timeline from its first page until it is exhausted
pub struct PaginationEngine<T> {
    /// Transport used for every page request
    transport: T,
    /// First-page request to replay
    template: RequestTemplate,
    /// Run configuration
    config: PaginationConfig,
    /// Statistics
    stats: RunStats,
}

impl<T: PageTransport> PaginationEngine<T> {
    /// Create an engine for a template
    pub fn new(transport: T, template: RequestTemplate) -> Self {
        Self {
            transport,
            template,
            config: PaginationConfig::default(),
            stats: RunStats::default(),
        }
    }

    /// Set pagination configuration
    #[must_use]
    pub fn with_config(mut self, config: PaginationConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the template being replayed
    pub fn template(&self) -> &RequestTemplate {
        &self.template
    }

    /// Get statistics
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Fetch every page and hand each one to the sink
    ///
    /// Stops when a page yields no cursor. Any failure aborts the whole run;
    /// the page that failed is never written to the sink. Statistics start
    /// from zero on every call.
    pub async fn run(&mut self, sink: &mut dyn PageSink) -> Result<RunStats> {
        let start = Instant::now();
        self.stats = RunStats::default();
        let mut state = EngineState::Start;

        while !state.is_terminal() {
            state = match state {
                EngineState::Start => EngineState::FetchingPage {
                    page: 1,
                    cursor: None,
                },
                EngineState::FetchingPage { page, cursor } => {
                    match self.step(page, cursor.as_ref(), sink).await {
                        Ok(next_cursor) => self.advance(page, next_cursor).await,
                        Err(e) => EngineState::Failed(e),
                    }
                }
                terminal => terminal,
            };
        }

        let outcome = match state {
            EngineState::Failed(e) => Err(e),
            _ => Ok(()),
        };

        self.stats.set_duration(start.elapsed().as_millis() as u64);

        match outcome {
            Ok(()) => {
                info!(
                    pages = self.stats.pages_fetched,
                    entries = self.stats.content_entries,
                    duration_ms = self.stats.duration_ms,
                    "Timeline walk complete"
                );
                Ok(self.stats.clone())
            }
            Err(e) => {
                error!(
                    pages = self.stats.pages_fetched,
                    error = %e,
                    "Timeline walk aborted"
                );
                Err(e)
            }
        }
    }

    /// Fetch one page and write it to the sink
    async fn step(
        &mut self,
        page: usize,
        cursor: Option<&Cursor>,
        sink: &mut dyn PageSink,
    ) -> Result<Option<Cursor>> {
        info!(page, "Fetching page");
        let result = self.fetch_page(cursor).await?;
        sink.write(page, &result.raw_payload)?;
        info!(page, "Fetched page");
        Ok(result.next_cursor)
    }

    /// Decide what follows a written page
    async fn advance(&mut self, page: usize, next_cursor: Option<Cursor>) -> EngineState {
        let Some(cursor) = next_cursor else {
            return EngineState::Done;
        };

        if self.config.max_pages.is_some_and(|max| page >= max) {
            info!(page, "Reached page limit, stopping");
            return EngineState::Done;
        }

        info!(cursor = %cursor, "Got next cursor");
        self.stats.last_cursor = Some(cursor.clone());
        tokio::time::sleep(self.config.page_delay).await;

        EngineState::FetchingPage {
            page: page + 1,
            cursor: Some(cursor),
        }
    }

    /// Request one page and extract its cursor
    pub async fn fetch_page(&mut self, cursor: Option<&Cursor>) -> Result<PageResult> {
        let request = self.build_request(cursor)?;
        let response = self.send(&request).await?;

        let page_cursor = match extract_text(&response.body) {
            Ok(page_cursor) => page_cursor,
            Err(e) => {
                warn!(error = %e, "Exception trying to extract cursor");
                self.preserve(&response.body);
                return Err(e);
            }
        };

        self.stats
            .add_page(page_cursor.entry_count, page_cursor.content_count());

        Ok(PageResult {
            raw_payload: response.body,
            next_cursor: page_cursor.bottom_cursor,
        })
    }

    /// Build the request for a page from the template
    pub fn build_request(&self, cursor: Option<&Cursor>) -> Result<PageRequest> {
        let params = self.template.params_for(cursor)?;

        Ok(PageRequest::new(self.template.base_url())
            .header(AUTH_HEADER, self.template.auth_token())
            .header(CSRF_HEADER, self.template.csrf_token())
            .cookie(SESSION_COOKIE, self.template.session_cookie())
            .cookie(CSRF_COOKIE, self.template.csrf_cookie())
            .params(params))
    }

    /// Send a request, retrying per policy, and reject anything but 200
    async fn send(&mut self, request: &PageRequest) -> Result<TransportResponse> {
        let mut attempt = 0;
        loop {
            let result = self.transport.get(request).await.and_then(|response| {
                if response.is_ok() {
                    Ok(response)
                } else {
                    Err(Error::transport(
                        response.status,
                        response.body,
                        response.headers,
                    ))
                }
            });

            match result {
                Ok(response) => return Ok(response),
                Err(e) if self.config.retry.should_retry(attempt, &e) => {
                    let delay = self.config.retry.calculate_backoff(attempt);
                    warn!(
                        error = %e,
                        attempt = attempt + 1,
                        max_attempts = self.config.retry.max_retries + 1,
                        "Page request failed, retrying in {delay:?}"
                    );
                    self.stats.add_retry();
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Keep a copy of an unreadable page for postmortem inspection
    fn preserve(&self, raw: &str) {
        let Some(path) = &self.config.recovery_path else {
            return;
        };
        if let Err(e) = write_recovery_file(path, raw) {
            error!(error = %e, "Could not preserve unreadable page");
        }
    }
}

impl<T> std::fmt::Debug for PaginationEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationEngine")
            .field("template", &self.template)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

//! Tests for pagination module

use super::*;
use crate::capture::parse_capture;
use crate::error::{Error, Result};
use crate::http::{PageRequest, PageTransport, TransportResponse};
use crate::output::MemorySink;
use crate::translate::{translate, RequestTemplate, VARIABLES_PARAM};
use crate::types::{BackoffType, Cursor};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::tempdir;

const CAPTURE: &str = r#"fetch("https://x.test/graphql/UserTweets?variables=%7B%22userId%22%3A%2242%22%7D", {
  "headers": {
    "authorization": "Bearer T",
    "x-csrf-token": "C",
    "cookie": "auth_token=A; ct0=C2"
  },
  "body": null,
  "method": "GET"
});"#;

/// Transport that replays canned responses and records every request
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse>>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<TransportResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageTransport for ScriptedTransport {
    async fn get(&self, request: &PageRequest) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request #{}", self.requests().len()))
    }
}

fn template() -> RequestTemplate {
    translate(&parse_capture(CAPTURE).unwrap()).unwrap()
}

fn quiet_config() -> PaginationConfig {
    PaginationConfig::new()
        .with_page_delay(Duration::ZERO)
        .with_recovery_path(None)
}

fn page_body(entries: Vec<Value>) -> String {
    json!({
        "data": {"user": {"result": {"timeline_v2": {"timeline": {"instructions": [
            {"type": "TimelineClearCache"},
            {"type": "TimelineAddEntries", "entries": entries}
        ]}}}}}
    })
    .to_string()
}

fn tweet(id: u32) -> Value {
    json!({"entryId": format!("tweet-{id}"), "content": {"entryType": "TimelineTimelineItem"}})
}

fn cursor(kind: &str, value: &str) -> Value {
    json!({"content": {"entryType": "TimelineTimelineCursor", "cursorType": kind, "value": value}})
}

fn ok(body: String) -> Result<TransportResponse> {
    Ok(TransportResponse::new(200, body))
}

fn variables(request: &PageRequest) -> Value {
    serde_json::from_str(request.params.first(VARIABLES_PARAM).unwrap()).unwrap()
}

// ============================================================================
// Run Tests
// ============================================================================

#[tokio::test]
async fn test_run_walks_until_cursor_only_page() {
    let first = page_body(vec![tweet(1), tweet(2), cursor("Bottom", "PAGE2")]);
    let last = page_body(vec![cursor("Top", "NEWER"), cursor("Bottom", "PAGE3")]);
    let transport = ScriptedTransport::new(vec![ok(first.clone()), ok(last.clone())]);

    let mut engine = PaginationEngine::new(&transport, template()).with_config(quiet_config());
    let mut sink = MemorySink::new();
    let stats = engine.run(&mut sink).await.unwrap();

    assert_eq!(sink.pages(), &[(1_usize, first), (2_usize, last)]);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.content_entries, 2);
    assert_eq!(stats.last_cursor, Some(Cursor::new("PAGE2")));

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(variables(&requests[0]), json!({"userId": "42"}));
    assert_eq!(
        variables(&requests[1]),
        json!({"userId": "42", "cursor": "PAGE2"})
    );
}

#[tokio::test]
async fn test_run_stops_after_first_page_when_exhausted() {
    let only = page_body(vec![cursor("Top", "T"), cursor("Bottom", "B")]);
    let transport = ScriptedTransport::new(vec![ok(only.clone())]);

    let mut engine = PaginationEngine::new(&transport, template()).with_config(quiet_config());
    let mut sink = MemorySink::new();
    let stats = engine.run(&mut sink).await.unwrap();

    assert_eq!(sink.pages(), &[(1_usize, only)]);
    assert_eq!(stats.pages_fetched, 1);
    assert!(stats.last_cursor.is_none());
}

#[tokio::test]
async fn test_run_aborts_on_non_200_without_writing_that_page() {
    let first = page_body(vec![tweet(1), cursor("Bottom", "PAGE2")]);
    let transport = ScriptedTransport::new(vec![
        ok(first),
        Ok(TransportResponse {
            status: 403,
            headers: vec![("x-response-time".to_string(), "12".to_string())],
            body: "{\"errors\":[{\"code\":353}]}".to_string(),
        }),
    ]);

    let mut engine = PaginationEngine::new(&transport, template()).with_config(quiet_config());
    let mut sink = MemorySink::new();
    let err = engine.run(&mut sink).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("403"));
    assert!(err.to_string().contains("x-response-time"));
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn test_run_preserves_unreadable_page_and_aborts() {
    let dir = tempdir().unwrap();
    let recovery = dir.path().join("failed.json");
    let body = json!({"data": {"user": {"result": {"__typename": "UserUnavailable"}}}}).to_string();
    let transport = ScriptedTransport::new(vec![ok(body.clone())]);

    let mut engine = PaginationEngine::new(&transport, template())
        .with_config(quiet_config().with_recovery_path(Some(recovery.clone())));
    let mut sink = MemorySink::new();
    let err = engine.run(&mut sink).await.unwrap_err();

    assert!(matches!(err, Error::Extraction { .. }));
    assert!(sink.is_empty());
    assert_eq!(std::fs::read_to_string(&recovery).unwrap(), body);
}

#[tokio::test]
async fn test_run_preserves_non_json_page() {
    let dir = tempdir().unwrap();
    let recovery = dir.path().join("failed.json");
    let transport = ScriptedTransport::new(vec![ok("<html>oops</html>".to_string())]);

    let mut engine = PaginationEngine::new(&transport, template())
        .with_config(quiet_config().with_recovery_path(Some(recovery.clone())));
    let err = engine.run(&mut MemorySink::new()).await.unwrap_err();

    assert!(matches!(err, Error::Extraction { .. }));
    assert_eq!(std::fs::read_to_string(&recovery).unwrap(), "<html>oops</html>");
}

#[tokio::test]
async fn test_run_respects_page_limit() {
    let transport = ScriptedTransport::new(vec![
        ok(page_body(vec![tweet(1), cursor("Bottom", "P2")])),
        ok(page_body(vec![tweet(2), cursor("Bottom", "P3")])),
    ]);

    let mut engine = PaginationEngine::new(&transport, template())
        .with_config(quiet_config().with_max_pages(Some(2)));
    let mut sink = MemorySink::new();
    let stats = engine.run(&mut sink).await.unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_run_stats_start_fresh_on_each_run() {
    let transport = ScriptedTransport::new(vec![
        ok(page_body(vec![tweet(1), tweet(2), cursor("Bottom", "P2")])),
        Ok(TransportResponse::new(503, "busy")),
        ok(page_body(vec![tweet(3), cursor("Bottom", "")])),
    ]);
    let retry = RetryPolicy::new(1).with_backoff(
        BackoffType::Constant,
        Duration::ZERO,
        Duration::ZERO,
    );

    let mut engine = PaginationEngine::new(&transport, template())
        .with_config(quiet_config().with_retry(retry).with_max_pages(Some(1)));

    let first = engine.run(&mut MemorySink::new()).await.unwrap();
    assert_eq!(first.pages_fetched, 1);
    assert_eq!(first.content_entries, 2);

    let second = engine.run(&mut MemorySink::new()).await.unwrap();
    assert_eq!(second.pages_fetched, 1);
    assert_eq!(second.content_entries, 1);
    assert_eq!(second.retries, 1);
    assert!(second.last_cursor.is_none());
    assert_eq!(engine.stats(), &second);
}

// ============================================================================
// Retry Tests
// ============================================================================

#[tokio::test]
async fn test_default_policy_makes_no_retries() {
    let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(503, "busy"))]);

    let mut engine = PaginationEngine::new(&transport, template()).with_config(quiet_config());
    let err = engine.run(&mut MemorySink::new()).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_retry_policy_recovers_from_retryable_status() {
    let transport = ScriptedTransport::new(vec![
        Ok(TransportResponse::new(503, "busy")),
        ok(page_body(vec![tweet(1), cursor("Bottom", "")])),
    ]);
    let retry = RetryPolicy::new(2).with_backoff(
        BackoffType::Constant,
        Duration::ZERO,
        Duration::ZERO,
    );

    let mut engine = PaginationEngine::new(&transport, template())
        .with_config(quiet_config().with_retry(retry));
    let mut sink = MemorySink::new();
    let stats = engine.run(&mut sink).await.unwrap();

    assert_eq!(stats.retries, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(transport.requests().len(), 2);
}

#[tokio::test]
async fn test_retry_policy_skips_client_errors() {
    let transport = ScriptedTransport::new(vec![Ok(TransportResponse::new(401, "unauthorized"))]);
    let retry = RetryPolicy::new(3).with_backoff(
        BackoffType::Constant,
        Duration::ZERO,
        Duration::ZERO,
    );

    let mut engine = PaginationEngine::new(&transport, template())
        .with_config(quiet_config().with_retry(retry));
    let err = engine.run(&mut MemorySink::new()).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(transport.requests().len(), 1);
}

#[test]
fn test_retry_policy_backoff() {
    let initial = Duration::from_millis(100);
    let max = Duration::from_secs(1);

    let constant = RetryPolicy::new(5).with_backoff(BackoffType::Constant, initial, max);
    assert_eq!(constant.calculate_backoff(3), initial);

    let linear = RetryPolicy::new(5).with_backoff(BackoffType::Linear, initial, max);
    assert_eq!(linear.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(linear.calculate_backoff(2), Duration::from_millis(300));

    let exponential = RetryPolicy::new(5).with_backoff(BackoffType::Exponential, initial, max);
    assert_eq!(exponential.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(exponential.calculate_backoff(3), Duration::from_millis(800));
    assert_eq!(exponential.calculate_backoff(4), max);
}

#[test]
fn test_retry_policy_should_retry() {
    let policy = RetryPolicy::new(1);
    let busy = Error::transport(503, "", vec![]);

    assert!(policy.should_retry(0, &busy));
    assert!(!policy.should_retry(1, &busy));
    assert!(!policy.should_retry(0, &Error::transport(404, "", vec![])));
    assert!(!RetryPolicy::none().should_retry(0, &busy));
}

// ============================================================================
// Request Building Tests
// ============================================================================

#[test]
fn test_build_request_carries_credentials() {
    let transport = ScriptedTransport::default();
    let engine = PaginationEngine::new(&transport, template());
    let request = engine.build_request(Some(&Cursor::new("ABC"))).unwrap();

    assert_eq!(request.url, "https://x.test/graphql/UserTweets");
    assert_eq!(
        request.headers,
        vec![
            ("authorization".to_string(), "Bearer T".to_string()),
            ("x-csrf-token".to_string(), "C".to_string()),
        ]
    );
    assert_eq!(
        request.cookies,
        vec![
            ("auth_token".to_string(), "A".to_string()),
            ("ct0".to_string(), "C2".to_string()),
        ]
    );
    assert_eq!(variables(&request)["cursor"], "ABC");
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_pagination_config_default() {
    let config = PaginationConfig::default();
    assert_eq!(config.page_delay, Duration::from_millis(500));
    assert_eq!(config.max_pages, None);
    assert_eq!(config.retry.max_retries, 0);
    assert_eq!(
        config.recovery_path.as_deref(),
        Some(std::path::Path::new("failed.json"))
    );
}

#[test]
fn test_engine_state_terminal() {
    assert!(!EngineState::Start.is_terminal());
    assert!(!EngineState::FetchingPage {
        page: 1,
        cursor: None
    }
    .is_terminal());
    assert!(EngineState::Done.is_terminal());
    assert!(EngineState::Failed(Error::extraction("x")).is_terminal());
}

#[test]
fn test_run_stats_mutations() {
    let mut stats = RunStats::new();
    stats.add_page(20, 18);
    stats.add_page(2, 0);
    stats.add_retry();
    stats.set_duration(1500);

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.entries_seen, 22);
    assert_eq!(stats.content_entries, 18);
    assert_eq!(stats.retries, 1);
    assert_eq!(stats.duration_ms, 1500);
}

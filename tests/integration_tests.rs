//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: capture text → translated request → paged
//! HTTP requests → one file per page

use serde_json::{json, Value};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use timeline_walker::http::HttpTransport;
use timeline_walker::output::PageDirectory;
use timeline_walker::pagination::{PaginationConfig, PaginationEngine};
use timeline_walker::{parse_capture, translate, Error, RequestTemplate};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const ENDPOINT: &str = "/graphql/abc123/UserTweets";

fn capture_for(server: &MockServer, variables: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("variables", variables)
        .append_pair("features", r#"{"rweb_lists_timeline_redesign_enabled":true}"#)
        .finish();

    [
        format!("fetch(\"{}{ENDPOINT}?{query}\", {{", server.uri()),
        r#"  "headers": {"#.to_string(),
        r#"    "accept": "*/*","#.to_string(),
        r#"    "authorization": "Bearer T","#.to_string(),
        r#"    "x-csrf-token": "C","#.to_string(),
        r#"    "cookie": "guest_id=v1%3A1; auth_token=A; ct0=C2""#.to_string(),
        r#"  },"#.to_string(),
        r#"  "body": null,"#.to_string(),
        r#"  "method": "GET""#.to_string(),
        "});".to_string(),
    ]
    .join("\n")
}

fn template_for(server: &MockServer) -> RequestTemplate {
    let capture = capture_for(server, r#"{"userId":"42","count":20}"#);
    translate(&parse_capture(&capture).unwrap()).unwrap()
}

fn quiet_config() -> PaginationConfig {
    PaginationConfig::new()
        .with_page_delay(Duration::ZERO)
        .with_recovery_path(None)
}

/// Match requests whose `variables` parameter decodes to `expected`
fn variables_are(expected: Value) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |request: &Request| {
        request
            .url
            .query_pairs()
            .find(|(key, _)| key == "variables")
            .and_then(|(_, value)| serde_json::from_str::<Value>(&value).ok())
            .is_some_and(|value| value == expected)
    }
}

fn page(entries: Vec<Value>) -> String {
    json!({
        "data": {"user": {"result": {"__typename": "User", "timeline_v2": {"timeline": {"instructions": [
            {"type": "TimelineClearCache"},
            {"type": "TimelineAddEntries", "entries": entries}
        ]}}}}}
    })
    .to_string()
}

fn tweet(id: u32) -> Value {
    json!({"entryId": format!("tweet-{id}"), "sortIndex": id.to_string(),
           "content": {"entryType": "TimelineTimelineItem", "itemContent": {"tweet_results": {}}}})
}

fn cursor(kind: &str, value: &str) -> Value {
    json!({"entryId": format!("cursor-{}", kind.to_lowercase()),
           "content": {"entryType": "TimelineTimelineCursor", "cursorType": kind, "value": value}})
}

// ============================================================================
// Full Walk Tests
// ============================================================================

#[tokio::test]
async fn test_walk_two_pages_into_directory() {
    let mock_server = MockServer::start().await;
    let first = page(vec![tweet(1), tweet(2), cursor("Top", "TOP"), cursor("Bottom", "PAGE2")]);
    let last = page(vec![cursor("Top", "TOP2"), cursor("Bottom", "PAGE3")]);

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(header("authorization", "Bearer T"))
        .and(header("x-csrf-token", "C"))
        .and(header("cookie", "auth_token=A; ct0=C2"))
        .and(variables_are(json!({"userId": "42", "count": 20})))
        .respond_with(ResponseTemplate::new(200).set_body_string(first.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(variables_are(json!({"userId": "42", "count": 20, "cursor": "PAGE2"})))
        .respond_with(ResponseTemplate::new(200).set_body_string(last.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let mut pages = PageDirectory::create(dir.path().join("out")).unwrap();
    let mut engine = PaginationEngine::new(HttpTransport::new().unwrap(), template_for(&mock_server))
        .with_config(quiet_config());

    let stats = engine.run(&mut pages).await.unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.content_entries, 2);
    assert_eq!(fs::read_to_string(pages.page_path(1)).unwrap(), first);
    assert_eq!(fs::read_to_string(pages.page_path(2)).unwrap(), last);
    assert!(!pages.page_path(3).exists());
}

#[tokio::test]
async fn test_walk_keeps_other_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(|request: &Request| {
            request.url.query_pairs().any(|(key, value)| {
                key == "features" && value == r#"{"rweb_lists_timeline_redesign_enabled":true}"#
            })
        })
        .respond_with(ResponseTemplate::new(200).set_body_string(page(vec![tweet(1)])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut sink = timeline_walker::output::MemorySink::new();
    let mut engine = PaginationEngine::new(HttpTransport::new().unwrap(), template_for(&mock_server))
        .with_config(quiet_config());

    // A page without a bottom cursor ends the walk
    let stats = engine.run(&mut sink).await.unwrap();
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(sink.len(), 1);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_walk_aborts_on_rejected_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(variables_are(json!({"userId": "42", "count": 20})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(page(vec![tweet(1), cursor("Bottom", "PAGE2")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(variables_are(json!({"userId": "42", "count": 20, "cursor": "PAGE2"})))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-reset", "1700000000")
                .set_body_string("Rate limit exceeded"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let mut pages = PageDirectory::create(&out).unwrap();
    let mut engine = PaginationEngine::new(HttpTransport::new().unwrap(), template_for(&mock_server))
        .with_config(quiet_config());

    let err = engine.run(&mut pages).await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    let message = err.to_string();
    assert!(message.contains("Rate limit exceeded"));
    assert!(message.contains("x-rate-limit-reset"));
    assert!(pages.page_path(1).exists());
    assert!(!pages.page_path(2).exists());
}

#[tokio::test]
async fn test_walk_preserves_unreadable_page() {
    let mock_server = MockServer::start().await;
    let body = json!({"errors": [{"message": "Authorization: Denied by access control"}]}).to_string();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempdir().unwrap();
    let recovery = dir.path().join("failed.json");
    let mut pages = PageDirectory::create(dir.path().join("out")).unwrap();
    let mut engine = PaginationEngine::new(HttpTransport::new().unwrap(), template_for(&mock_server))
        .with_config(quiet_config().with_recovery_path(Some(recovery.clone())));

    let err = engine.run(&mut pages).await.unwrap_err();

    assert!(matches!(err, Error::Extraction { .. }));
    assert_eq!(fs::read_to_string(&recovery).unwrap(), body);
    assert_eq!(pages.pages_written(), 0);
}

#[tokio::test]
async fn test_capture_with_cursor_is_rejected_before_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let capture = capture_for(&mock_server, r#"{"userId":"42","cursor":"LATER"}"#);
    let err = translate(&parse_capture(&capture).unwrap()).unwrap_err();

    assert!(matches!(err, Error::Precondition { .. }));
}

//! End-to-end tests: a real listener in front of a mocked upstream.

use icsfeed_providers::CredentialRegistry;
use icsfeed_server::{ServerConfig, ServerResult, SignalHandler, build_state, serve};
use mockito::Matcher;
use reqwest::StatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct TestServer {
    base: String,
    signals: SignalHandler,
    handle: JoinHandle<ServerResult<()>>,
}

impl TestServer {
    async fn start(upstream: &mockito::Server) -> Self {
        let config = ServerConfig::default().with_base_url(format!("{}/events", upstream.url()));
        let registry = CredentialRegistry::from_entries(
            [
                ("ICSFEED_TOKEN_TEAM_B", "token-b"),
                ("ICSFEED_TOKEN_TEAM_A", "token-a"),
                ("ICSFEED_TOKEN_CHESS_CLUB", "token-c"),
            ],
            "ICSFEED_TOKEN_",
        );
        let state = build_state(&config, registry).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let signals = SignalHandler::new();
        let handle = tokio::spawn(serve(listener, state, signals.shutdown().wait()));

        Self {
            base,
            signals,
            handle,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("{}{}", self.base, path)).await.unwrap()
    }

    async fn stop(self) {
        self.signals.trigger_shutdown();
        self.handle.await.unwrap().unwrap();
    }
}

fn page(events: serde_json::Value) -> String {
    json!({ "_embedded": { "events": events } }).to_string()
}

async fn mock_feed(
    upstream: &mut mockito::Server,
    token: &str,
    events: serde_json::Value,
) -> mockito::Mock {
    upstream
        .mock("GET", "/events")
        .match_query(Matcher::Regex("starts_after=".into()))
        .match_header("x-api-key", token)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page(events))
        .create_async()
        .await
}

#[tokio::test]
async fn health() {
    let upstream = mockito::Server::new_async().await;
    let server = TestServer::start(&upstream).await;

    let response = server.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    server.stop().await;
}

#[tokio::test]
async fn directory_lists_every_feed_once() {
    let upstream = mockito::Server::new_async().await;
    let server = TestServer::start(&upstream).await;

    let response = server.get("/feeds").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.text().await.unwrap(),
        "CHESS_CLUB\nTEAM_A\nTEAM_B"
    );

    server.stop().await;
}

#[tokio::test]
async fn missing_feed_parameter_is_rejected() {
    let upstream = mockito::Server::new_async().await;
    let server = TestServer::start(&upstream).await;

    for path in ["/events", "/events?name=Mine"] {
        let response = server.get(path).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.text().await.unwrap(),
            "at least one feed parameter is required"
        );
    }

    server.stop().await;
}

#[tokio::test]
async fn unknown_feed_is_rejected_without_fetching() {
    let mut upstream = mockito::Server::new_async().await;
    let never = upstream
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let server = TestServer::start(&upstream).await;

    let response = server.get("/events?feed=TEAM_A&feed=TEAM_X").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("TEAM_X"));

    never.assert_async().await;
    server.stop().await;
}

#[tokio::test]
async fn merges_feeds_in_request_order() {
    let mut upstream = mockito::Server::new_async().await;
    let _alpha = mock_feed(
        &mut upstream,
        "token-a",
        json!([{
            "id": "a-1",
            "start": "2030-06-01T10:00:00Z",
            "title": "Alpha Practice",
            "location": { "name": "Field A" }
        }]),
    )
    .await;
    let _bravo = mock_feed(
        &mut upstream,
        "token-b",
        json!([{
            "id": "b-1",
            "start": "2030-06-02T18:00:00+02:00",
            "end": "2030-06-02T19:30:00+02:00",
            "title": "Bravo Match",
            "location": { "name": "Stadium" },
            "url": "https://example.com/b-1"
        }]),
    )
    .await;
    let server = TestServer::start(&upstream).await;

    let response = server.get("/events?feed=TEAM_B&feed=TEAM_A").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/calendar; charset=utf-8"
    );
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"events.ics\""
    );

    let body = response.text().await.unwrap();
    assert!(body.contains("X-WR-CALNAME:Events for Team_b Team_a"));
    assert_eq!(body.matches("BEGIN:VEVENT").count(), 2);

    let bravo = body.find("SUMMARY:Bravo Match").unwrap();
    let alpha = body.find("SUMMARY:Alpha Practice").unwrap();
    assert!(bravo < alpha);

    assert!(body.contains("DTSTART:20300602T160000Z"));
    assert!(body.contains("DTEND:20300602T173000Z"));
    assert!(body.contains("DTSTART:20300601T100000Z"));
    assert!(body.contains("DTEND:20300601T120000Z"));
    assert!(body.contains("LOCATION:Field A"));

    server.stop().await;
}

#[tokio::test]
async fn name_override_is_used_verbatim() {
    let mut upstream = mockito::Server::new_async().await;
    let _chess = mock_feed(&mut upstream, "token-c", json!([])).await;
    let server = TestServer::start(&upstream).await;

    let response = server
        .get("/events?feed=CHESS_CLUB&name=Club+Nights")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.text().await.unwrap();
    assert!(body.contains("X-WR-CALNAME:Club Nights"));
    assert!(!body.contains("BEGIN:VEVENT"));

    server.stop().await;
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let mut upstream = mockito::Server::new_async().await;
    let _alpha = mock_feed(&mut upstream, "token-a", json!([])).await;
    let _bravo = upstream
        .mock("GET", "/events")
        .match_query(Matcher::Any)
        .match_header("x-api-key", "token-b")
        .with_status(503)
        .create_async()
        .await;
    let server = TestServer::start(&upstream).await;

    let response = server.get("/events?feed=TEAM_A&feed=TEAM_B").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.text().await.unwrap().contains("TEAM_B"));

    server.stop().await;
}

#[tokio::test]
async fn event_without_location_is_bad_gateway() {
    let mut upstream = mockito::Server::new_async().await;
    let _alpha = mock_feed(
        &mut upstream,
        "token-a",
        json!([{ "start": "2030-06-01T10:00:00Z", "title": "Somewhere" }]),
    )
    .await;
    let server = TestServer::start(&upstream).await;

    let response = server.get("/events?feed=TEAM_A").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.text().await.unwrap().contains("Somewhere"));

    server.stop().await;
}

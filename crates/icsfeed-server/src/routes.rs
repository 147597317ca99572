//! HTTP routes.
//!
//! - `GET /feeds` lists configured feed identifiers, one per line.
//! - `GET /events?feed=A&feed=B[&name=..]` returns the merged iCalendar.
//! - `GET /health` answers `ok`.

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use icsfeed_providers::Aggregator;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::ApiError;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_CALENDAR: &str = "text/calendar; charset=utf-8";
const ICS_DISPOSITION: &str = "attachment; filename=\"events.ics\"";

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    aggregator: Aggregator,
}

impl AppState {
    /// Creates handler state around an aggregator.
    pub fn new(aggregator: Aggregator) -> Self {
        Self { aggregator }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/feeds", get(list_feeds))
        .route("/events", get(get_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Parameters of an events request.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EventsQuery {
    /// Every `feed` value, in the order given.
    pub feeds: Vec<String>,
    /// The first non-empty `name` value.
    pub name: Option<String>,
}

impl EventsQuery {
    /// Parses a raw query string, keeping repeated `feed` keys.
    pub fn parse(query: Option<&str>) -> Self {
        let mut parsed = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "feed" => parsed.feeds.push(value.into_owned()),
                "name" if parsed.name.is_none() && !value.is_empty() => {
                    parsed.name = Some(value.into_owned());
                }
                _ => {}
            }
        }

        parsed
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn list_feeds(State(state): State<AppState>) -> impl IntoResponse {
    let body = state
        .aggregator
        .registry()
        .ids()
        .collect::<Vec<_>>()
        .join("\n");

    ([(header::CONTENT_TYPE, TEXT_PLAIN)], body)
}

async fn get_events(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let query = EventsQuery::parse(query.as_deref());
    if query.feeds.is_empty() {
        return Err(ApiError::bad_request(
            "at least one feed parameter is required",
        ));
    }

    debug!(feeds = ?query.feeds, name = ?query.name, "events requested");

    let calendar = state
        .aggregator
        .build_calendar(&query.feeds, query.name.as_deref())
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, TEXT_CALENDAR),
            (header::CONTENT_DISPOSITION, ICS_DISPOSITION),
        ],
        calendar.to_ics(),
    )
        .into_response())
}

//! Paginated upstream client.
//!
//! [`FeedClient`] issues authenticated requests against the listing endpoint
//! and follows `_links.next` until the upstream stops supplying one.
//! [`PageCursor`] exposes the chain one page at a time; [`FeedClient::fetch_all`]
//! drains it.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawEvent, UpstreamPage};

/// HTTP client for one upstream provider, shared by all feeds.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http_client: reqwest::Client,
    config: UpstreamConfig,
}

impl FeedClient {
    /// Creates a new client. The configuration is validated first.
    pub fn new(config: UpstreamConfig) -> ProviderResult<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("icsfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the upstream configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Returns the address of the first page, filtered to events starting at or after `now`.
    pub fn first_page_url(&self, now: DateTime<Utc>) -> Url {
        let mut url = self.config.base_url.clone();
        url.query_pairs_mut().append_pair(
            &self.config.filter_param,
            &now.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        url
    }

    /// Starts a new page cursor for a feed.
    ///
    /// The start-time filter is computed from the current instant at this call.
    pub fn pages<'a>(&'a self, feed_id: &'a str, token: &'a str) -> PageCursor<'a> {
        PageCursor {
            client: self,
            feed_id,
            token,
            next: Some(self.first_page_url(Utc::now())),
            pages_fetched: 0,
        }
    }

    /// Fetches every page of a feed and returns the events in page order.
    ///
    /// Any failure discards the pages fetched so far.
    pub async fn fetch_all(&self, feed_id: &str, token: &str) -> ProviderResult<Vec<RawEvent>> {
        let mut cursor = self.pages(feed_id, token);
        let mut events = Vec::new();

        while let Some(batch) = cursor.next_page().await? {
            events.extend(batch);
        }

        debug!(
            feed = feed_id,
            pages = cursor.pages_fetched(),
            events = events.len(),
            "fetched feed"
        );
        Ok(events)
    }

    /// Fetches and decodes one page.
    async fn fetch_page(&self, url: &Url, token: &str) -> ProviderResult<UpstreamPage> {
        let response = self
            .http_client
            .get(url.clone())
            .header(self.config.auth_header.as_str(), token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::network("request timeout")
                } else if e.is_connect() {
                    ProviderError::network(format!("connection failed: {}", e))
                } else {
                    ProviderError::network(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::authentication("feed token rejected"));
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProviderError::authorization("access denied to feed"));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!("listing not found at {}", url.path())));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!(
                "upstream error ({}): {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse page: {}", e)).with_source(e)
        })
    }
}

/// A lazy, finite walk over the pages of one feed.
///
/// Each call to [`next_page`](Self::next_page) issues at most one request;
/// page N+1 is only requested after page N has been decoded. Once the chain
/// ends or an error is returned the cursor is exhausted and cannot be
/// restarted.
pub struct PageCursor<'a> {
    client: &'a FeedClient,
    feed_id: &'a str,
    token: &'a str,
    next: Option<Url>,
    pages_fetched: usize,
}

impl std::fmt::Debug for PageCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageCursor")
            .field("feed_id", &self.feed_id)
            .field("next", &self.next.as_ref().map(Url::as_str))
            .field("pages_fetched", &self.pages_fetched)
            .finish_non_exhaustive()
    }
}

impl PageCursor<'_> {
    /// Fetches the next page. Returns `Ok(None)` once the feed is exhausted.
    ///
    /// Fails with a page-limit error when the upstream still supplies a next
    /// link after `max_pages` pages.
    pub async fn next_page(&mut self) -> ProviderResult<Option<Vec<RawEvent>>> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let max_pages = self.client.config.max_pages;
        if self.pages_fetched >= max_pages {
            warn!(feed = self.feed_id, max_pages, "pagination chain did not terminate");
            return Err(ProviderError::page_limit(max_pages).with_feed(self.feed_id));
        }

        debug!(feed = self.feed_id, page = self.pages_fetched + 1, "fetching page");
        let page = self
            .client
            .fetch_page(&url, self.token)
            .await
            .map_err(|e| e.with_feed(self.feed_id))?;
        self.pages_fetched += 1;

        if let Some(href) = page.next_href() {
            let next = url.join(href).map_err(|e| {
                ProviderError::invalid_response(format!("invalid next link '{}': {}", href, e))
                    .with_feed(self.feed_id)
            })?;
            self.next = Some(next);
        }

        Ok(Some(page.into_events()))
    }

    /// Returns the number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Returns true if no further request will be issued.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}

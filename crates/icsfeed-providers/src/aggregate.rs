//! Multi-feed aggregation.
//!
//! The [`Aggregator`] validates a feed selection against the
//! [`CredentialRegistry`], fetches every selected feed concurrently, and
//! flattens the results in selection order.

use std::sync::Arc;

use futures_util::future::join_all;
use icsfeed_core::{CalendarDocument, assemble, derive_calendar_name};
use tracing::{debug, info, warn};

use crate::error::AggregateError;
use crate::normalize::normalize_events;
use crate::provider::FeedSource;
use crate::raw_event::RawEvent;
use crate::registry::CredentialRegistry;

/// The merged, not yet normalized result of an aggregate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAggregate {
    /// Display name of the combined calendar.
    pub name: String,
    /// Events of all feeds, concatenated in selection order.
    pub events: Vec<RawEvent>,
}

/// Fetches and merges feeds.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<CredentialRegistry>,
    source: Arc<dyn FeedSource>,
}

impl Aggregator {
    /// Creates an aggregator over a registry and a feed source.
    pub fn new(registry: Arc<CredentialRegistry>, source: Arc<dyn FeedSource>) -> Self {
        Self { registry, source }
    }

    /// Returns the credential registry.
    pub fn registry(&self) -> &CredentialRegistry {
        &self.registry
    }

    /// Resolves every selected feed to its token.
    ///
    /// Fails on an empty selection or on the first unknown identifier, in
    /// selection order.
    fn resolve<'a>(&'a self, feed_ids: &'a [String]) -> Result<Vec<(&'a str, &'a str)>, AggregateError> {
        if feed_ids.is_empty() {
            return Err(AggregateError::EmptySelection);
        }

        feed_ids
            .iter()
            .map(|id| {
                self.registry
                    .lookup(id)
                    .map(|token| (id.as_str(), token))
                    .ok_or_else(|| AggregateError::UnknownFeed(id.clone()))
            })
            .collect()
    }

    /// Fetches all selected feeds and merges them.
    ///
    /// No request is issued unless every identifier is known. Feeds are
    /// fetched concurrently and every fetch runs to completion or failure.
    /// If any fetch fails the whole call fails with the failure of the
    /// earliest feed in `feed_ids`, and no partial result is returned. The
    /// merged sequence follows the order of `feed_ids`, not the order in
    /// which fetches complete.
    pub async fn aggregate(
        &self,
        feed_ids: &[String],
        name_override: Option<&str>,
    ) -> Result<RawAggregate, AggregateError> {
        let resolved = self.resolve(feed_ids)?;
        let name = derive_calendar_name(feed_ids, name_override);

        info!(feeds = ?feed_ids, "aggregating feeds");

        let fetches = resolved.into_iter().map(|(feed_id, token)| async move {
            let result = self.source.fetch_all(feed_id, token).await;
            match result {
                Ok(ref events) => debug!(feed = feed_id, events = events.len(), "feed fetched"),
                Err(ref e) => warn!(feed = feed_id, error = %e, "feed fetch failed"),
            }
            result.map_err(|e| e.with_feed(feed_id))
        });

        let mut events: Vec<RawEvent> = Vec::new();
        for result in join_all(fetches).await {
            events.extend(result?);
        }

        info!(name = %name, events = events.len(), "aggregated feeds");
        Ok(RawAggregate { name, events })
    }

    /// Aggregates, normalizes and assembles a calendar document.
    pub async fn build_calendar(
        &self,
        feed_ids: &[String],
        name_override: Option<&str>,
    ) -> Result<CalendarDocument, AggregateError> {
        let aggregate = self.aggregate(feed_ids, name_override).await?;
        let events = normalize_events(&aggregate.events)?;
        Ok(assemble(aggregate.name, events))
    }
}

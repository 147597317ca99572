//! Upstream feeds: fetching, normalization and aggregation.
//!
//! - [`FeedClient`] - Paginated HTTP client for the upstream listing endpoint
//! - [`FeedSource`] - Seam between the aggregator and the upstream
//! - [`CredentialRegistry`] - Feed identifier to token mapping
//! - [`normalize_event`] - Converts raw upstream records to [`NormalizedEvent`](icsfeed_core::NormalizedEvent)
//! - [`Aggregator`] - Concurrent multi-feed fetch and merge
//!
//! # Architecture
//!
//! ```text
//!   feed ids ──► CredentialRegistry ──► (feed id, token) pairs
//!                                             │
//!                                             ▼  one task per feed
//!                                      ┌─────────────┐
//!                                      │ FeedSource  │ ◄── FeedClient / PageCursor
//!                                      └──────┬──────┘
//!                                             │ Vec<RawEvent> per feed
//!                                             ▼  concatenated in selection order
//!                                      ┌─────────────┐
//!                                      │ RawAggregate│
//!                                      └──────┬──────┘
//!                                             ▼ normalize_events()
//!                                      ┌──────────────────┐
//!                                      │ CalendarDocument │
//!                                      └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use icsfeed_providers::{Aggregator, CredentialRegistry, FeedClient, UpstreamConfig};
//!
//! let client = FeedClient::new(UpstreamConfig::parse("https://api.example.com/events")?)?;
//! let aggregator = Aggregator::new(Arc::new(CredentialRegistry::from_env()), Arc::new(client));
//! let calendar = aggregator.build_calendar(&["TEAM_A".into()], None).await?;
//! println!("{}", calendar.to_ics());
//! ```

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod raw_event;
pub mod registry;

// Re-export main types at crate root
pub use aggregate::{Aggregator, RawAggregate};
pub use client::{FeedClient, PageCursor};
pub use config::{
    DEFAULT_AUTH_HEADER, DEFAULT_FILTER_PARAM, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT, UpstreamConfig,
};
pub use error::{AggregateError, NormalizeError, ProviderError, ProviderErrorCode, ProviderResult};
pub use normalize::{normalize_event, normalize_events};
pub use provider::{BoxFuture, FeedSource};
pub use raw_event::{RawEvent, RawLocation, UpstreamPage};
pub use registry::{CredentialRegistry, TOKEN_PREFIX};

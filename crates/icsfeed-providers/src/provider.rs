//! FeedSource trait definition.
//!
//! The aggregator talks to upstream feeds through [`FeedSource`], so the
//! HTTP client can be swapped for an in-memory source in tests.

use std::future::Future;
use std::pin::Pin;

use crate::client::FeedClient;
use crate::error::ProviderResult;
use crate::raw_event::RawEvent;

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so it can be shared as
/// `Arc<dyn FeedSource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can return every upcoming event of a feed.
///
/// Implementations must return events in upstream page order and must fail
/// the whole call if any page fails.
pub trait FeedSource: Send + Sync {
    /// Fetches all events of `feed_id`, authenticating with `token`.
    fn fetch_all<'a>(
        &'a self,
        feed_id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>>;
}

impl FeedSource for FeedClient {
    fn fetch_all<'a>(
        &'a self,
        feed_id: &'a str,
        token: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Vec<RawEvent>>> {
        Box::pin(FeedClient::fetch_all(self, feed_id, token))
    }
}

//! Upstream payload schema.
//!
//! The listing endpoint answers with a HAL-style envelope:
//!
//! ```json
//! {
//!   "_embedded": { "events": [ { "start": "...", "title": "...", ... } ] },
//!   "_links": { "next": { "href": "https://..." } }
//! }
//! ```
//!
//! Both `_embedded` and `_links` may be missing on an empty or final page.
//! Inside an event, `start` and `title` are required; a record without them
//! (or with a wrongly typed field) fails decoding of the whole page.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// The location sub-record of an upstream event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawLocation {
    /// Venue name shown in calendar clients.
    pub name: Option<String>,
}

/// A single event as returned by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawEvent {
    /// Provider identifier of the event.
    pub id: Option<String>,
    /// When the event starts, with the offset the upstream reported.
    pub start: DateTime<FixedOffset>,
    /// When the event ends, if the upstream knows.
    pub end: Option<DateTime<FixedOffset>>,
    /// The event title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Where the event takes place.
    pub location: Option<RawLocation>,
    /// Public event page.
    pub url: Option<String>,
}

impl RawEvent {
    /// Creates a raw event with only the required fields.
    pub fn new(start: DateTime<FixedOffset>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            start,
            end: None,
            title: title.into(),
            description: None,
            location: None,
            url: None,
        }
    }

    /// Returns the venue name, if both the location and its name are present.
    pub fn venue(&self) -> Option<&str> {
        self.location.as_ref()?.name.as_deref()
    }

    /// Builder method to set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: DateTime<FixedOffset>) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the venue name.
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.location = Some(RawLocation {
            name: Some(venue.into()),
        });
        self
    }

    /// Builder method to set the event URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One page of the upstream listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpstreamPage {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedEvents,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

/// The `_embedded` object of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// The `_links` object of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageLinks {
    pub next: Option<Link>,
}

/// A HAL link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Link {
    pub href: String,
}

impl UpstreamPage {
    /// Returns the address of the next page; `None` means the feed is exhausted.
    pub fn next_href(&self) -> Option<&str> {
        self.links.next.as_ref().map(|link| link.href.as_str())
    }

    /// Consumes the page, returning its events.
    pub fn into_events(self) -> Vec<RawEvent> {
        self.embedded.events
    }
}

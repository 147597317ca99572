//! Normalized event type.
//!
//! A [`NormalizedEvent`] is the minimal, repaired representation of an
//! upstream event: an absolute time range plus the handful of text fields
//! that end up in the calendar output.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Duration given to events whose upstream record carries no end time.
pub const DEFAULT_EVENT_DURATION: Duration = Duration::hours(2);

/// A normalized event ready to be placed in a calendar document.
///
/// `end` is always strictly after `start`; the normalizer refuses to build
/// an event that would break this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    /// Upstream identifier, used as the iCalendar UID when present.
    pub uid: Option<String>,
    /// When the event starts.
    pub start: DateTime<Utc>,
    /// When the event ends.
    pub end: DateTime<Utc>,
    /// The event title.
    pub title: String,
    /// Free-form description, copied verbatim.
    pub description: Option<String>,
    /// Venue name taken from the upstream location record.
    pub venue: String,
    /// Public link to the event page, if the upstream provides one.
    pub url: Option<String>,
}

impl NormalizedEvent {
    /// Creates a new event with the required fields.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        title: impl Into<String>,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            uid: None,
            start,
            end,
            title: title.into(),
            description: None,
            venue: venue.into(),
            url: None,
        }
    }

    /// Builder method to set the upstream identifier.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the event URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns the duration of the event.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn builder_sets_optional_fields() {
        let event = NormalizedEvent::new(
            sample_start(),
            sample_start() + Duration::minutes(90),
            "Open Mic",
            "The Basement",
        )
        .with_uid("evt-1")
        .with_description("Bring a song")
        .with_url("https://example.com/e/1");

        assert_eq!(event.uid.as_deref(), Some("evt-1"));
        assert_eq!(event.description.as_deref(), Some("Bring a song"));
        assert_eq!(event.url.as_deref(), Some("https://example.com/e/1"));
        assert_eq!(event.duration(), Duration::minutes(90));
    }

    #[test]
    fn default_duration_is_two_hours() {
        assert_eq!(DEFAULT_EVENT_DURATION, Duration::hours(2));
    }

    #[test]
    fn serializes_times_as_rfc3339() {
        let event = NormalizedEvent::new(
            sample_start(),
            sample_start() + DEFAULT_EVENT_DURATION,
            "Quiz Night",
            "Pub",
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["start"], "2024-06-01T10:00:00Z");
        assert_eq!(json["end"], "2024-06-01T12:00:00Z");
    }
}

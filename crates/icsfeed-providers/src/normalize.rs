//! RawEvent to NormalizedEvent conversion.
//!
//! Normalization is pure: it repairs a missing end time, converts both ends
//! to UTC instants and keeps only the fields a calendar entry needs.
//!
//! A record without a venue fails the conversion instead of producing an
//! entry with an empty location.

use chrono::Utc;
use icsfeed_core::{DEFAULT_EVENT_DURATION, NormalizedEvent};

use crate::error::NormalizeError;
use crate::raw_event::RawEvent;

/// Converts a [`RawEvent`] to a [`NormalizedEvent`].
///
/// - A missing end becomes `start + 2h`; a present end is kept as is.
/// - A present end that is not after the start is rejected.
/// - A missing location, or a location without a name, is rejected.
pub fn normalize_event(raw: &RawEvent) -> Result<NormalizedEvent, NormalizeError> {
    let start = raw.start.with_timezone(&Utc);
    let end = match raw.end {
        Some(end) => end.with_timezone(&Utc),
        None => start + DEFAULT_EVENT_DURATION,
    };

    if end <= start {
        return Err(NormalizeError::InvalidTimeRange {
            title: raw.title.clone(),
            start,
            end,
        });
    }

    let venue = raw.venue().ok_or_else(|| NormalizeError::MissingLocation {
        title: raw.title.clone(),
    })?;

    let mut event = NormalizedEvent::new(start, end, &raw.title, venue);

    if let Some(ref id) = raw.id {
        event = event.with_uid(id);
    }

    if let Some(ref description) = raw.description {
        event = event.with_description(description);
    }

    if let Some(ref url) = raw.url {
        event = event.with_url(url);
    }

    Ok(event)
}

/// Normalizes a batch of events, stopping at the first failure.
pub fn normalize_events(raw_events: &[RawEvent]) -> Result<Vec<NormalizedEvent>, NormalizeError> {
    raw_events.iter().map(normalize_event).collect()
}

//! Calendar document assembly and iCalendar encoding.
//!
//! [`assemble`] builds the in-memory [`CalendarDocument`];
//! [`CalendarDocument::to_ics`] hands it to the `icalendar` encoder to
//! produce the RFC 5545 wire format.

use icalendar::{Calendar, Component, Event, EventLike};

use crate::event::NormalizedEvent;

/// The full output calendar prior to wire encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDocument {
    /// Display name of the calendar.
    pub name: String,
    /// Events in aggregate order.
    pub events: Vec<NormalizedEvent>,
}

/// Builds a calendar document with one entry per event.
///
/// Events are kept in the given order. Entries sharing a time range or title
/// are not merged.
pub fn assemble(name: impl Into<String>, events: Vec<NormalizedEvent>) -> CalendarDocument {
    CalendarDocument {
        name: name.into(),
        events,
    }
}

impl CalendarDocument {
    /// Returns the number of events in the document.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the document holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Converts the document into an `icalendar` calendar.
    pub fn to_icalendar(&self) -> Calendar {
        let mut calendar = Calendar::new();
        calendar.name(&self.name);

        for event in &self.events {
            calendar.push(to_vevent(event));
        }

        calendar.done()
    }

    /// Encodes the document as an iCalendar string.
    pub fn to_ics(&self) -> String {
        self.to_icalendar().to_string()
    }
}

fn to_vevent(event: &NormalizedEvent) -> Event {
    let mut vevent = Event::new();
    vevent
        .summary(&event.title)
        .location(&event.venue)
        .starts(event.start)
        .ends(event.end);

    if let Some(ref uid) = event.uid {
        vevent.uid(uid);
    }
    if let Some(ref description) = event.description {
        vevent.description(description);
    }
    if let Some(ref url) = event.url {
        vevent.url(url);
    }

    vevent.done()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_event(title: &str, hour: u32) -> NormalizedEvent {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap();
        NormalizedEvent::new(start, start + Duration::hours(2), title, "Town Hall")
    }

    #[test]
    fn assemble_keeps_order_and_duplicates() {
        let events = vec![
            sample_event("Board Games", 18),
            sample_event("Board Games", 18),
            sample_event("Chess", 10),
        ];
        let doc = assemble("Events for Games", events.clone());

        assert_eq!(doc.name, "Events for Games");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.events, events);
    }

    #[test]
    fn empty_document_encodes() {
        let doc = assemble("Nothing Yet", Vec::new());
        assert!(doc.is_empty());

        let ics = doc.to_ics();
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.contains("X-WR-CALNAME:Nothing Yet"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn encodes_event_fields() {
        let event = sample_event("Chess", 10)
            .with_uid("evt-42")
            .with_description("Bring a board")
            .with_url("https://example.com/e/42");
        let ics = assemble("Events for Chess", vec![event]).to_ics();

        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("SUMMARY:Chess"));
        assert!(ics.contains("LOCATION:Town Hall"));
        assert!(ics.contains("DESCRIPTION:Bring a board"));
        assert!(ics.contains("UID:evt-42"));
        assert!(ics.contains("DTSTART:20240601T100000Z"));
        assert!(ics.contains("DTEND:20240601T120000Z"));
        assert!(ics.contains("URL:https://example.com/e/42"));
    }

    #[test]
    fn one_vevent_per_event() {
        let doc = assemble(
            "Events for Two",
            vec![sample_event("One", 9), sample_event("Two", 12)],
        );
        let ics = doc.to_ics();
        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 2);
    }
}

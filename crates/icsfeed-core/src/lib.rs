//! Core types: normalized events, calendar documents, naming, tracing

pub mod calendar;
pub mod event;
pub mod naming;
pub mod tracing;

pub use calendar::{CalendarDocument, assemble};
pub use event::{DEFAULT_EVENT_DURATION, NormalizedEvent};
pub use naming::{CALENDAR_NAME_PREFIX, derive_calendar_name, title_case_token};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

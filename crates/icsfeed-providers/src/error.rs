//! Error types for feed fetching, normalization and aggregation.
//!
//! - [`ProviderError`] covers anything that goes wrong talking to an
//!   upstream feed.
//! - [`NormalizeError`] covers upstream records that cannot be turned into a
//!   calendar entry.
//! - [`AggregateError`] is what a whole aggregate request fails with.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// The upstream rejected the feed token (401).
    AuthenticationFailed,
    /// The token is valid but lacks access (403).
    AuthorizationFailed,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// Rate limit exceeded - too many requests.
    RateLimited,
    /// Upstream returned an unexpected non-success status.
    ServerError,
    /// Response body did not match the expected page schema.
    InvalidResponse,
    /// Listing endpoint not found (404).
    NotFound,
    /// The pagination chain did not terminate within the page bound.
    PageLimitExceeded,
    /// Configuration error - missing or invalid config.
    ConfigurationError,
}

impl ProviderErrorCode {
    /// Returns true if this error is transient and the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::AuthorizationFailed => "authorization_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::PageLimitExceeded => "page_limit_exceeded",
            Self::ConfigurationError => "configuration_error",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while fetching an upstream feed.
#[derive(Debug, Error)]
pub struct ProviderError {
    code: ProviderErrorCode,
    message: String,
    /// The feed identifier the failing fetch belonged to.
    feed: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            feed: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthenticationFailed, message)
    }

    /// Creates an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::AuthorizationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a rate limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::RateLimited, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    /// Creates a page limit error.
    pub fn page_limit(max_pages: usize) -> Self {
        Self::new(
            ProviderErrorCode::PageLimitExceeded,
            format!("pagination did not end within {max_pages} pages"),
        )
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ConfigurationError, message)
    }

    /// Tags this error with the feed it belongs to.
    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the feed identifier, if set.
    pub fn feed(&self) -> Option<&str> {
        self.feed.as_deref()
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref feed) = self.feed {
            write!(f, "[{}] ", feed)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// An upstream record that cannot become a calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The record has no location, or the location has no venue name.
    #[error("event '{title}' has no location")]
    MissingLocation { title: String },

    /// The record carries an end time that is not after its start.
    #[error("event '{title}' ends at {end} which is not after its start {start}")]
    InvalidTimeRange {
        title: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Why an aggregate request failed.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// No feed identifiers were supplied.
    #[error("at least one feed must be selected")]
    EmptySelection,

    /// A supplied feed identifier is not configured.
    #[error("unknown feed: {0}")]
    UnknownFeed(String),

    /// Fetching one of the feeds failed.
    #[error("failed to fetch feed: {0}")]
    Fetch(#[from] ProviderError),

    /// An upstream record could not be normalized.
    #[error("failed to normalize event: {0}")]
    Normalize(#[from] NormalizeError),
}

impl AggregateError {
    /// Returns true if the request itself was invalid (nothing was fetched).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptySelection | Self::UnknownFeed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_retryable() {
        assert!(ProviderErrorCode::NetworkError.is_retryable());
        assert!(ProviderErrorCode::RateLimited.is_retryable());
        assert!(ProviderErrorCode::ServerError.is_retryable());
        assert!(!ProviderErrorCode::AuthenticationFailed.is_retryable());
        assert!(!ProviderErrorCode::PageLimitExceeded.is_retryable());
    }

    #[test]
    fn provider_error_with_feed() {
        let err = ProviderError::network("connection timeout").with_feed("TEAM_A");
        assert_eq!(err.code(), ProviderErrorCode::NetworkError);
        assert_eq!(err.feed(), Some("TEAM_A"));
        assert_eq!(err.to_string(), "[TEAM_A] network_error: connection timeout");
    }

    #[test]
    fn provider_error_without_feed() {
        let err = ProviderError::page_limit(100);
        assert!(err.feed().is_none());
        assert_eq!(
            err.to_string(),
            "page_limit_exceeded: pagination did not end within 100 pages"
        );
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("reset");
        let err = ProviderError::network("read failed").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn aggregate_error_classification() {
        assert!(AggregateError::EmptySelection.is_client_error());
        assert!(AggregateError::UnknownFeed("X".into()).is_client_error());
        assert!(!AggregateError::from(ProviderError::server("boom")).is_client_error());
        assert!(
            !AggregateError::from(NormalizeError::MissingLocation {
                title: "Quiz".into()
            })
            .is_client_error()
        );
    }

    #[test]
    fn unknown_feed_names_the_id() {
        let err = AggregateError::UnknownFeed("TEAM_Z".into());
        assert_eq!(err.to_string(), "unknown feed: TEAM_Z");
    }
}

//! Server error types.

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use icsfeed_core::TracingError;
use icsfeed_providers::{AggregateError, ProviderError};
use thiserror::Error;
use tracing::{error, warn};

/// Result type for server startup and shutdown.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The upstream client could not be created.
    #[error("upstream client error: {0}")]
    Provider(#[from] ProviderError),

    /// Logging could not be initialized.
    #[error("tracing error: {0}")]
    Tracing(#[from] TracingError),

    /// IO error (reading config, binding the listener, serving).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A request failure rendered as a plain-text HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response body.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        if err.is_client_error() {
            warn!(error = %err, "rejected feed selection");
            Self::bad_request(err.to_string())
        } else {
            error!(error = %err, "aggregation failed");
            Self::new(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsfeed_providers::NormalizeError;

    #[test]
    fn selection_errors_are_bad_requests() {
        let err = ApiError::from(AggregateError::UnknownFeed("TEAM_Z".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "unknown feed: TEAM_Z");

        let err = ApiError::from(AggregateError::EmptySelection);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_are_bad_gateway() {
        let err = ApiError::from(AggregateError::Fetch(
            ProviderError::server("boom").with_feed("TEAM_A"),
        ));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.message().contains("TEAM_A"));
    }

    #[test]
    fn normalize_errors_are_bad_gateway() {
        let err = ApiError::from(AggregateError::Normalize(NormalizeError::MissingLocation {
            title: "Picnic".into(),
        }));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.message().contains("Picnic"));
    }

    #[test]
    fn response_is_plain_text() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn tracing_setup_failure_becomes_server_error() {
        use icsfeed_core::{TracingConfig, init_tracing};

        let err: ServerError = init_tracing(TracingConfig::server().with_env_filter("icsfeed=loud"))
            .unwrap_err()
            .into();
        assert!(matches!(err, ServerError::Tracing(_)));
        assert!(err.to_string().starts_with("tracing error:"));
    }

    #[test]
    fn server_error_display() {
        let err = ServerError::Config("upstream.base_url is required".into());
        assert_eq!(
            err.to_string(),
            "configuration error: upstream.base_url is required"
        );
    }
}

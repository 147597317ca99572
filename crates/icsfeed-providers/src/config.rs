//! Upstream listing endpoint configuration.

use std::time::Duration;

use url::Url;

use crate::error::{ProviderError, ProviderResult};

/// Query parameter restricting the listing to events starting at or after an instant.
pub const DEFAULT_FILTER_PARAM: &str = "starts_after";

/// Header carrying the feed token.
pub const DEFAULT_AUTH_HEADER: &str = "X-Api-Key";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on pages followed for a single feed.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// How to reach and page through the upstream listing endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Canonical listing endpoint; the first page of every feed is fetched here.
    pub base_url: Url,
    /// Name of the start-time filter query parameter.
    pub filter_param: String,
    /// Name of the header carrying the feed token.
    pub auth_header: String,
    /// Timeout applied to every upstream request.
    pub timeout: Duration,
    /// Maximum number of pages fetched per feed.
    pub max_pages: usize,
}

impl UpstreamConfig {
    /// Creates a configuration for the given listing endpoint with defaults.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            filter_param: DEFAULT_FILTER_PARAM.to_string(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Parses `base_url` and creates a configuration with defaults.
    pub fn parse(base_url: &str) -> ProviderResult<Self> {
        let url = Url::parse(base_url).map_err(|e| {
            ProviderError::configuration(format!("invalid upstream URL '{}': {}", base_url, e))
                .with_source(e)
        })?;
        Ok(Self::new(url))
    }

    /// Builder: set the filter parameter name.
    pub fn with_filter_param(mut self, param: impl Into<String>) -> Self {
        self.filter_param = param.into();
        self
    }

    /// Builder: set the authentication header name.
    pub fn with_auth_header(mut self, header: impl Into<String>) -> Self {
        self.auth_header = header.into();
        self
    }

    /// Builder: set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder: set the maximum page count.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Checks the configuration for values that can never work.
    pub fn validate(&self) -> ProviderResult<()> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(ProviderError::configuration(format!(
                "upstream URL must be http or https, got '{}'",
                self.base_url.scheme()
            )));
        }
        if self.filter_param.trim().is_empty() {
            return Err(ProviderError::configuration("filter parameter must not be empty"));
        }
        if reqwest::header::HeaderName::from_bytes(self.auth_header.as_bytes()).is_err() {
            return Err(ProviderError::configuration(format!(
                "invalid authentication header name '{}'",
                self.auth_header
            )));
        }
        if self.max_pages == 0 {
            return Err(ProviderError::configuration("max_pages must be at least 1"));
        }
        Ok(())
    }
}

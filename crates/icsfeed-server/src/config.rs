//! Server configuration.
//!
//! Settings come from an optional TOML file:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [upstream]
//! base_url = "https://api.example.com/v1/events"
//! filter_param = "starts_after"
//! auth_header = "X-Api-Key"
//! timeout_secs = 30
//! max_pages = 100
//! ```
//!
//! Every field has a default except `upstream.base_url`, which must come
//! from the file or the command line. Feed tokens are never read from this
//! file; see [`icsfeed_providers::CredentialRegistry::from_env`].

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use icsfeed_providers::{
    DEFAULT_AUTH_HEADER, DEFAULT_FILTER_PARAM, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT, UpstreamConfig,
};
use serde::Deserialize;

use crate::error::{ServerError, ServerResult};

/// Default listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Configuration for the icsfeed server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener settings.
    pub server: ListenSettings,

    /// Upstream listing endpoint settings.
    pub upstream: UpstreamSettings,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListenSettings {
    /// Socket address to listen on.
    pub bind: String,
}

impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Upstream listing endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UpstreamSettings {
    /// Canonical listing endpoint.
    pub base_url: Option<String>,

    /// Start-time filter query parameter.
    pub filter_param: String,

    /// Header carrying the feed token.
    pub auth_header: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum pages followed per feed.
    pub max_pages: usize,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            filter_param: DEFAULT_FILTER_PARAM.to_string(),
            auth_header: DEFAULT_AUTH_HEADER.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ServerConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from a file.
    pub fn load_from(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Builder: set the listen address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.server.bind = bind.into();
        self
    }

    /// Builder: set the upstream listing endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upstream.base_url = Some(base_url.into());
        self
    }

    /// Returns the parsed listen address.
    pub fn bind_addr(&self) -> ServerResult<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            ServerError::Config(format!("invalid bind address '{}': {}", self.server.bind, e))
        })
    }

    /// Builds and validates the upstream client configuration.
    pub fn upstream_config(&self) -> ServerResult<UpstreamConfig> {
        let base_url = self
            .upstream
            .base_url
            .as_deref()
            .ok_or_else(|| ServerError::Config("upstream.base_url is required".to_string()))?;

        if self.upstream.timeout_secs == 0 {
            return Err(ServerError::Config(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }

        let config = UpstreamConfig::parse(base_url)?
            .with_filter_param(&self.upstream.filter_param)
            .with_auth_header(&self.upstream.auth_header)
            .with_timeout(Duration::from_secs(self.upstream.timeout_secs))
            .with_max_pages(self.upstream.max_pages);
        config.validate()?;
        Ok(config)
    }
}

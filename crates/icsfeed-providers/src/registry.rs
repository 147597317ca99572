//! Credential registry: feed identifier to upstream token.
//!
//! Built once at startup from configuration entries and never mutated
//! afterwards, so it is shared across concurrent fetches as a plain
//! `Arc<CredentialRegistry>`.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

/// Prefix marking an environment variable as a feed token.
pub const TOKEN_PREFIX: &str = "ICSFEED_TOKEN_";

/// Immutable mapping from feed identifier to access token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialRegistry {
    tokens: BTreeMap<String, String>,
}

impl CredentialRegistry {
    /// Builds a registry from `(name, value)` configuration entries.
    ///
    /// Every entry whose name starts with `prefix` becomes one feed, keyed by
    /// the rest of the name. Other entries are ignored, as are entries whose
    /// name is exactly the prefix.
    pub fn from_entries<I, K, V>(entries: I, prefix: &str) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut tokens = BTreeMap::new();

        for (name, value) in entries {
            let Some(feed_id) = name.as_ref().strip_prefix(prefix) else {
                continue;
            };
            if feed_id.is_empty() {
                warn!(name = name.as_ref(), "ignoring token entry without a feed identifier");
                continue;
            }
            tokens.insert(feed_id.to_string(), value.into());
        }

        Self { tokens }
    }

    /// Builds a registry from the process environment using [`TOKEN_PREFIX`].
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        let entries = std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
        Self::from_entries(entries, TOKEN_PREFIX)
    }

    /// Returns the token of a feed.
    pub fn lookup(&self, feed_id: &str) -> Option<&str> {
        self.tokens.get(feed_id).map(String::as_str)
    }

    /// Returns true if the feed is configured.
    pub fn contains(&self, feed_id: &str) -> bool {
        self.tokens.contains_key(feed_id)
    }

    /// Returns the configured feed identifiers in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.keys().map(String::as_str)
    }

    /// Returns the number of configured feeds.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no feed is configured.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Debug for CredentialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRegistry")
            .field("feeds", &self.tokens.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

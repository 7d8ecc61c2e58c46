//! Error types for feed loading, article resolution and configuration.

use std::sync::Arc;
use std::time::Duration;

/// Why a feed reload failed.
///
/// Transport, status and timeout errors are fetch failures; malformed bodies
/// are parse failures. Neither leaves a mark on the cached snapshot.
///
/// Cloneable so that every caller waiting on the same reload gets the same
/// failure.
#[derive(thiserror::Error, Debug, Clone)]
pub enum LoadError {
    /// The request never produced a response.
    #[error("feed request failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    /// The host answered with a non-success status.
    #[error("feed host returned HTTP {status}")]
    Status { status: u16 },

    /// No response within the configured timeout.
    #[error("feed request timed out after {after:?}")]
    Timeout { after: Duration },

    /// The body was not a valid feed document.
    #[error("feed body is not a valid news document: {0}")]
    Parse(#[source] Arc<serde_json::Error>),
}

impl From<reqwest::Error> for LoadError {
    fn from(e: reqwest::Error) -> Self {
        LoadError::Transport(Arc::new(e))
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(Arc::new(e))
    }
}

impl LoadError {
    pub fn is_fetch_failure(&self) -> bool {
        !self.is_parse_failure()
    }

    pub fn is_parse_failure(&self) -> bool {
        matches!(self, LoadError::Parse(_))
    }
}

/// Outcome of a slug lookup that did not yield a record.
#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    /// The feed loaded but holds no record with this slug.
    #[error("no news item with slug {slug:?}")]
    NotFound { slug: String },

    /// The feed itself could not be loaded.
    #[error("news feed temporarily unavailable: {0}")]
    Unavailable(#[from] LoadError),
}

/// Invalid or unreadable configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid feed URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("feed URL must use http or https, got {scheme:?}")]
    UnsupportedScheme { scheme: String },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

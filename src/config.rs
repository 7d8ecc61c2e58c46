//! Runtime configuration: built-in defaults, an optional YAML file, and
//! command-line/environment overrides, applied in that order.
//!
//! ```yaml
//! feed_url: https://raw.githubusercontent.com/RamezHany/IGCCe-tr/refs/heads/main/news.json
//! timeout_secs: 10
//! use_shared_cache: true
//! prewarm_locale: en
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_FEED_URL: &str =
    "https://raw.githubusercontent.com/RamezHany/IGCCe-tr/refs/heads/main/news.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Where the feed document lives.
    pub feed_url: String,
    /// Upper bound for one feed fetch.
    pub timeout_secs: u64,
    /// `false` makes every lookup fetch the feed itself.
    pub use_shared_cache: bool,
    /// Locale to load into the cache at startup.
    pub prewarm_locale: Option<String>,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_shared_cache: true,
            prewarm_locale: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FeedConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML config file. Missing keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&yaml)?;
        debug!(?config, "Loaded config file");
        Ok(config)
    }

    /// Build the effective configuration for a command line.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.feed_url()?;
        config.timeout()?;
        Ok(config)
    }

    /// Let explicit flags (and their environment variables) win.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.feed_url {
            self.feed_url = url.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = secs;
        }
        if cli.fresh {
            self.use_shared_cache = false;
        }
        if let Some(locale) = &cli.prewarm {
            self.prewarm_locale = Some(locale.clone());
        }
    }

    /// The feed URL, checked to be absolute http(s).
    pub fn feed_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.feed_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.feed_url.clone(),
            source,
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::UnsupportedScheme {
                scheme: other.to_string(),
            }),
        }
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }
}

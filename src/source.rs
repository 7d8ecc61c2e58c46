//! Transport seam for the news feed document.
//!
//! [`FeedSource`] abstracts "get me the current feed body" so the loader can
//! be driven by the real HTTP host in production and by in-memory sources in
//! tests. [`HttpFeedSource`] is the production implementation.

use crate::error::LoadError;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// Something that can produce the raw body of the feed document.
///
/// Implementations may write `async fn fetch`; the returned future must be
/// `Send` so a loader can be driven from a multi-threaded runtime.
pub trait FeedSource {
    /// Fetch the feed body once. Implementations must not cache.
    fn fetch(&self) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Fetches the feed with an HTTP GET against a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpFeedSource {
    /// Build a source for `url`. The loader bounds each fetch with its own
    /// timeout, so the client is created without one.
    pub fn new(url: Url, user_agent: &str) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FeedSource for HttpFeedSource {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch(&self) -> Result<String, LoadError> {
        let t0 = Instant::now();
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Feed host returned non-success status"
            );
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched feed body"
        );
        Ok(body)
    }
}

//! Locale-aware feed loader with a single-snapshot cache.
//!
//! The loader keeps exactly one [`FeedSnapshot`] at a time, tagged with the
//! locale it was resolved for. A request reloads the feed when its locale
//! differs from the cached one or when the cached snapshot holds no records;
//! otherwise the cached snapshot is handed back without touching the network.
//!
//! # Lifecycle
//!
//! Construct one loader at process start and pass it by reference to
//! whatever needs the feed. The cache starts empty, is replaced wholesale by
//! each successful reload and lives until the loader is dropped or
//! [`FeedLoader::invalidate`] clears it.
//!
//! # Concurrency
//!
//! Cache hits are lock-free reads of an [`ArcSwapOption`]. Reloads run
//! behind an async gate that also records the outcome of the last reload.
//! A caller that had to wait takes the result of any reload for its locale
//! that finished while it waited, success or failure, so concurrent requests
//! for the same locale share one fetch and none waits longer than one
//! timeout past the reload it queued behind. A snapshot is published with a single atomic store and only after
//! it is fully built, so readers see either the old snapshot or the new one.

use crate::error::LoadError;
use crate::models::{FeedDocument, FeedSnapshot, Locale};
use crate::source::FeedSource;
use crate::utils::truncate_for_log;
use arc_swap::ArcSwapOption;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

pub struct FeedLoader<S> {
    source: S,
    timeout: Duration,
    current: ArcSwapOption<FeedSnapshot>,
    /// Finished reload attempts. Only bumped while `reload_gate` is held.
    reloads: AtomicU64,
    reload_gate: Mutex<Option<LastReload>>,
}

/// Outcome of the most recent reload attempt.
#[derive(Debug)]
struct LastReload {
    reload: u64,
    locale: Locale,
    outcome: Result<Arc<FeedSnapshot>, LoadError>,
}

impl<S> fmt::Debug for FeedLoader<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = self.current.load_full();
        f.debug_struct("FeedLoader")
            .field("timeout", &self.timeout)
            .field("cached_locale", &cached.as_ref().map(|s| s.locale.as_str()))
            .field("cached_items", &cached.as_ref().map(|s| s.len()))
            .finish()
    }
}

impl<S: FeedSource> FeedLoader<S> {
    /// Create a loader with an empty cache. Every fetch is bounded by `timeout`.
    pub fn new(source: S, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            current: ArcSwapOption::empty(),
            reloads: AtomicU64::new(0),
            reload_gate: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Locale of the cached snapshot, if any.
    pub fn cached_locale(&self) -> Option<Locale> {
        self.current
            .load_full()
            .map(|snapshot| snapshot.locale.clone())
    }

    /// The cached snapshot, whatever its locale.
    pub fn snapshot(&self) -> Option<Arc<FeedSnapshot>> {
        self.current.load_full()
    }

    /// Drop the cached snapshot; the next request reloads.
    pub fn invalidate(&self) {
        if self.current.swap(None).is_some() {
            info!("News feed cache invalidated");
        }
    }

    /// The cached snapshot when it can serve `locale` as-is.
    fn cached_for(&self, locale: &Locale) -> Option<Arc<FeedSnapshot>> {
        let current = self.current.load_full()?;
        (current.locale == *locale && !current.is_empty()).then_some(current)
    }

    /// Feed for `locale`, reloading when needed.
    ///
    /// On failure the previous snapshot, if any, stays cached untouched.
    #[instrument(level = "info", skip_all, fields(%locale))]
    pub async fn try_get_feed(&self, locale: &Locale) -> Result<Arc<FeedSnapshot>, LoadError> {
        if let Some(snapshot) = self.cached_for(locale) {
            debug!(items = snapshot.len(), "Using cached news feed");
            return Ok(snapshot);
        }

        let seen = self.reloads.load(Ordering::SeqCst);
        let mut last_reload = self.reload_gate.lock().await;

        // Another caller may have finished the same reload while we waited.
        if let Some(snapshot) = self.cached_for(locale) {
            debug!(items = snapshot.len(), "News feed reloaded by a concurrent request");
            return Ok(snapshot);
        }
        // Reuse a reload for this locale that finished while we waited, even
        // when it failed or came back empty.
        if let Some(last) = last_reload.as_ref() {
            if last.reload > seen && last.locale == *locale {
                debug!(ok = last.outcome.is_ok(), "Sharing outcome of a concurrent reload");
                return last.outcome.clone();
            }
        }

        let previous = self.cached_locale();
        info!(previous_locale = ?previous.as_ref().map(Locale::as_str), "Reloading news feed");

        let outcome = self.load(locale).await.map(Arc::new);
        if let Ok(snapshot) = &outcome {
            self.current.store(Some(Arc::clone(snapshot)));
            info!(items = snapshot.len(), "News feed loaded");
        }

        let reload = self.reloads.fetch_add(1, Ordering::SeqCst) + 1;
        *last_reload = Some(LastReload {
            reload,
            locale: locale.clone(),
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Feed for `locale`; never fails.
    ///
    /// Load errors are logged and reported as an empty snapshot, which is
    /// not cached.
    pub async fn get_feed(&self, locale: &Locale) -> Arc<FeedSnapshot> {
        match self.try_get_feed(locale).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(
                    %locale,
                    error = %e,
                    parse_failure = e.is_parse_failure(),
                    "Failed to load news feed; returning empty feed"
                );
                Arc::new(FeedSnapshot::empty(locale))
            }
        }
    }

    /// Fetch and resolve the feed without reading or writing the cache.
    #[instrument(level = "info", skip_all, fields(%locale))]
    pub async fn fetch_fresh(&self, locale: &Locale) -> Result<FeedSnapshot, LoadError> {
        let snapshot = self.load(locale).await?;
        debug!(items = snapshot.len(), "Fetched fresh news feed");
        Ok(snapshot)
    }

    /// One fetch, parse and transform. Touches no shared state.
    async fn load(&self, locale: &Locale) -> Result<FeedSnapshot, LoadError> {
        let t0 = Instant::now();
        let body = match tokio::time::timeout(self.timeout, self.source.fetch()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(timeout = ?self.timeout, "News feed fetch timed out");
                return Err(LoadError::Timeout {
                    after: self.timeout,
                });
            }
        };

        let document: FeedDocument = serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 200),
                "News feed body did not parse"
            );
            LoadError::from(e)
        })?;

        let snapshot = FeedSnapshot::from_document(document, locale);
        debug!(
            items = snapshot.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Resolved news feed"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Reply, ScriptedSource, LAUNCH_FEED, SAMPLE_FEED};
    use futures::future::join_all;

    fn loader(source: ScriptedSource) -> FeedLoader<ScriptedSource> {
        FeedLoader::new(source, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_same_locale_fetches_once() {
        let loader = loader(ScriptedSource::always(SAMPLE_FEED));
        let en = Locale::from("en");

        let first = loader.get_feed(&en).await;
        let second = loader.get_feed(&en).await;
        let third = loader.get_feed(&en).await;

        assert_eq!(loader.source().fetches(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &third));
        assert_eq!(first.len(), 3);
    }

    #[tokio::test]
    async fn test_locale_change_reloads_each_time() {
        let loader = loader(ScriptedSource::always(SAMPLE_FEED));

        let en = loader.get_feed(&"en".into()).await;
        assert_eq!(loader.source().fetches(), 1);
        let ar = loader.get_feed(&"ar".into()).await;
        assert_eq!(loader.source().fetches(), 2);
        loader.get_feed(&"en".into()).await;
        assert_eq!(loader.source().fetches(), 3);

        assert_eq!(en.locale.as_str(), "en");
        assert_eq!(ar.locale.as_str(), "ar");
        assert_eq!(en.records[0].title, "Annual Conference");
        assert_eq!(ar.records[0].title, "المؤتمر السنوي");
        assert_eq!(loader.cached_locale(), Some(Locale::from("en")));
    }

    #[tokio::test]
    async fn test_server_error_without_cache_leaves_cache_empty() {
        let loader = loader(ScriptedSource::sequence(vec![
            Reply::Status(500),
            Reply::Body(LAUNCH_FEED.to_string()),
        ]));
        let en = Locale::from("en");

        let feed = loader.get_feed(&en).await;
        assert!(feed.is_empty());
        assert_eq!(loader.cached_locale(), None);
        assert!(loader.snapshot().is_none());

        let feed = loader.get_feed(&en).await;
        assert_eq!(loader.source().fetches(), 2);
        assert_eq!(feed.len(), 1);
        assert_eq!(loader.cached_locale(), Some(en));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let loader = loader(ScriptedSource::sequence(vec![
            Reply::Body(SAMPLE_FEED.to_string()),
            Reply::Status(503),
        ]));

        let en = loader.get_feed(&"en".into()).await;
        let ar = loader.get_feed(&"ar".into()).await;
        assert!(ar.is_empty());

        assert_eq!(loader.cached_locale(), Some(Locale::from("en")));
        let cached = loader.snapshot().unwrap();
        assert!(Arc::ptr_eq(&cached, &en));

        loader.get_feed(&"en".into()).await;
        assert_eq!(loader.source().fetches(), 2);
    }

    #[tokio::test]
    async fn test_try_get_feed_reports_errors() {
        let loader = loader(ScriptedSource::sequence(vec![
            Reply::Status(404),
            Reply::Body("<html>not json</html>".to_string()),
        ]));
        let en = Locale::from("en");

        let err = loader.try_get_feed(&en).await.unwrap_err();
        assert!(matches!(err, LoadError::Status { status: 404 }));
        assert!(err.is_fetch_failure());

        let err = loader.try_get_feed(&en).await.unwrap_err();
        assert!(err.is_parse_failure());
        assert!(loader.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_timeout_is_fetch_failure() {
        let source = ScriptedSource::always(SAMPLE_FEED).with_delay(Duration::from_secs(5));
        let loader = FeedLoader::new(source, Duration::from_millis(50));

        let err = loader.try_get_feed(&"en".into()).await.unwrap_err();
        assert!(matches!(err, LoadError::Timeout { .. }));
        assert!(err.is_fetch_failure());
        assert!(loader.get_feed(&"en".into()).await.is_empty());
        assert!(loader.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_same_locale_requests_share_one_fetch() {
        let source = ScriptedSource::always(SAMPLE_FEED).with_delay(Duration::from_millis(20));
        let loader = loader(source);
        let en = Locale::from("en");

        let feeds = join_all((0..8).map(|_| loader.get_feed(&en))).await;

        assert_eq!(loader.source().fetches(), 1);
        assert!(feeds.iter().all(|feed| Arc::ptr_eq(feed, &feeds[0])));
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_failed_fetch() {
        let source = ScriptedSource::sequence(vec![
            Reply::Status(500),
            Reply::Body(SAMPLE_FEED.to_string()),
        ])
        .with_delay(Duration::from_millis(100));
        let loader = loader(source);
        let en = Locale::from("en");

        let started = Instant::now();
        let results = join_all((0..8).map(|_| loader.try_get_feed(&en))).await;

        assert_eq!(loader.source().fetches(), 1);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(results
            .iter()
            .all(|r| matches!(r, Err(LoadError::Status { status: 500 }))));
        assert!(loader.snapshot().is_none());

        // A request arriving after the failure tries again.
        assert_eq!(loader.get_feed(&en).await.len(), 3);
        assert_eq!(loader.source().fetches(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_timeout() {
        let source = ScriptedSource::always(SAMPLE_FEED).with_delay(Duration::from_secs(5));
        let loader = FeedLoader::new(source, Duration::from_millis(200));
        let en = Locale::from("en");

        let started = Instant::now();
        let feeds = join_all((0..5).map(|_| loader.get_feed(&en))).await;

        assert_eq!(loader.source().fetches(), 1);
        assert!(started.elapsed() < Duration::from_millis(600));
        assert!(feeds.iter().all(|feed| feed.is_empty()));
    }

    #[tokio::test]
    async fn test_waiters_for_other_locale_still_reload() {
        let source = ScriptedSource::sequence(vec![
            Reply::Status(500),
            Reply::Body(SAMPLE_FEED.to_string()),
        ])
        .with_delay(Duration::from_millis(20));
        let loader = loader(source);
        let en = Locale::from("en");
        let ar = Locale::from("ar");

        let (en_result, ar_result) =
            futures::join!(loader.try_get_feed(&en), loader.try_get_feed(&ar));

        assert!(en_result.is_err());
        assert_eq!(ar_result.unwrap().locale, ar);
        assert_eq!(loader.source().fetches(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_empty_fetch() {
        let source = ScriptedSource::always(r#"{"news": []}"#).with_delay(Duration::from_millis(20));
        let loader = loader(source);
        let en = Locale::from("en");

        let feeds = join_all((0..4).map(|_| loader.get_feed(&en))).await;

        assert_eq!(loader.source().fetches(), 1);
        assert!(feeds.iter().all(|feed| feed.is_empty()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_loader_shared_across_spawned_tasks() {
        let source = ScriptedSource::always(SAMPLE_FEED).with_delay(Duration::from_millis(20));
        let loader = Arc::new(loader(source));

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let loader = Arc::clone(&loader);
                tokio::spawn(async move { loader.get_feed(&Locale::from("ar")).await.len() })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 3);
        }
        assert_eq!(loader.source().fetches(), 1);
    }

    #[tokio::test]
    async fn test_empty_feed_is_reloaded_on_next_call() {
        let loader = loader(ScriptedSource::sequence(vec![
            Reply::Body(r#"{"news": []}"#.to_string()),
            Reply::Body(LAUNCH_FEED.to_string()),
        ]));
        let en = Locale::from("en");

        assert!(loader.get_feed(&en).await.is_empty());
        assert_eq!(loader.cached_locale(), Some(en.clone()));

        assert_eq!(loader.get_feed(&en).await.len(), 1);
        assert_eq!(loader.source().fetches(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let loader = loader(ScriptedSource::always(SAMPLE_FEED));
        let en = Locale::from("en");

        loader.get_feed(&en).await;
        loader.invalidate();
        assert!(loader.snapshot().is_none());
        loader.get_feed(&en).await;

        assert_eq!(loader.source().fetches(), 2);
    }

    #[tokio::test]
    async fn test_fetch_fresh_bypasses_cache() {
        let loader = loader(ScriptedSource::always(SAMPLE_FEED));
        let en = Locale::from("en");

        let cached = loader.get_feed(&en).await;
        let fresh = loader.fetch_fresh(&"ar".into()).await.unwrap();

        assert_eq!(loader.source().fetches(), 2);
        assert_eq!(fresh.locale.as_str(), "ar");
        assert!(Arc::ptr_eq(&loader.snapshot().unwrap(), &cached));
        assert_eq!(*cached, loader.fetch_fresh(&en).await.unwrap());
    }
}

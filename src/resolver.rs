//! Slug lookup on top of the feed loader.
//!
//! A [`DetailResolver`] answers "which record does this slug name, in this
//! locale?". Where the feed comes from is a [`FeedStrategy`]:
//!
//! | Strategy | Network cost | Freshness |
//! |----------|--------------|-----------|
//! | [`FeedStrategy::SharedCache`] | one fetch per locale change | as old as the last reload |
//! | [`FeedStrategy::Fresh`] | one fetch per lookup | always current |
//!
//! Both strategies resolve records with the same rules, so for the same feed
//! body they return equal records.

use crate::error::{LoadError, ResolveError};
use crate::loader::FeedLoader;
use crate::models::{FeedSnapshot, Locale, ResolvedNewsRecord};
use crate::source::FeedSource;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where the resolver gets its feed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStrategy {
    /// Go through the loader's cache.
    #[default]
    SharedCache,
    /// Fetch the feed for every lookup and leave the cache alone.
    Fresh,
}

impl From<bool> for FeedStrategy {
    /// `true` selects the shared cache.
    fn from(use_shared_cache: bool) -> Self {
        if use_shared_cache {
            FeedStrategy::SharedCache
        } else {
            FeedStrategy::Fresh
        }
    }
}

#[derive(Debug)]
pub struct DetailResolver<'a, S> {
    loader: &'a FeedLoader<S>,
    strategy: FeedStrategy,
}

impl<'a, S: FeedSource> DetailResolver<'a, S> {
    pub fn new(loader: &'a FeedLoader<S>, strategy: FeedStrategy) -> Self {
        Self { loader, strategy }
    }

    pub fn strategy(&self) -> FeedStrategy {
        self.strategy
    }

    /// The whole feed for `locale`, obtained according to the strategy.
    pub async fn list(&self, locale: &Locale) -> Result<Arc<FeedSnapshot>, LoadError> {
        match self.strategy {
            FeedStrategy::SharedCache => self.loader.try_get_feed(locale).await,
            FeedStrategy::Fresh => self.loader.fetch_fresh(locale).await.map(Arc::new),
        }
    }

    /// Find the record whose slug equals `slug` exactly.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] when the feed loaded but has no such slug
    ///   (an empty slug never matches and does not touch the feed)
    /// - [`ResolveError::Unavailable`] when the feed could not be loaded
    #[instrument(level = "info", skip_all, fields(%slug, %locale, strategy = ?self.strategy))]
    pub async fn resolve(
        &self,
        slug: &str,
        locale: &Locale,
    ) -> Result<ResolvedNewsRecord, ResolveError> {
        if slug.is_empty() {
            warn!("Empty slug requested");
            return Err(ResolveError::NotFound {
                slug: String::new(),
            });
        }

        let feed = self.list(locale).await.map_err(|e| {
            warn!(error = %e, "News feed unavailable for detail lookup");
            ResolveError::Unavailable(e)
        })?;

        match feed.find(slug) {
            Some(record) => {
                debug!(id = %record.id, "Resolved news item");
                Ok(record.clone())
            }
            None => {
                info!(items = feed.len(), "No news item matches slug");
                Err(ResolveError::NotFound {
                    slug: slug.to_string(),
                })
            }
        }
    }
}

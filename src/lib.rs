//! # news_detail
//!
//! Loads the bilingual (Arabic/English) news feed published as a static JSON
//! document, resolves it for one locale, and looks articles up by slug.
//!
//! ## Architecture
//!
//! 1. **Source**: fetch the feed body over HTTP ([`source`])
//! 2. **Loader**: parse, resolve per locale, cache one snapshot ([`loader`])
//! 3. **Resolver**: pick the record for a slug ([`resolver`])
//! 4. **Output**: JSON or Markdown rendering ([`outputs`])
//!
//! ```ignore
//! let source = HttpFeedSource::new(config.feed_url()?, &config.user_agent)?;
//! let loader = FeedLoader::new(source, config.timeout()?);
//! let resolver = DetailResolver::new(&loader, FeedStrategy::SharedCache);
//! match resolver.resolve("launch-2024", &Locale::from("ar")).await {
//!     Ok(record) => println!("{}", record.title),
//!     Err(ResolveError::NotFound { .. }) => println!("not found"),
//!     Err(ResolveError::Unavailable(e)) => eprintln!("feed down: {e}"),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod outputs;
pub mod resolver;
pub mod source;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{ConfigError, LoadError, ResolveError};
pub use loader::FeedLoader;
pub use models::{FeedSnapshot, Locale, ResolvedNewsRecord};
pub use resolver::{DetailResolver, FeedStrategy};
pub use source::{FeedSource, HttpFeedSource};

//! # news_detail
//!
//! Loads the bilingual (Arabic/English) news feed published as a static JSON
//! document, resolves it for one locale, and prints either a single article
//! (looked up by slug) or the whole feed.
//!
//! ## Usage
//!
//! ```sh
//! news_detail --locale ar show launch-2024
//! news_detail --format markdown list
//! ```
//!
//! Logs go to stderr; stdout only carries the rendered result.
//!
//! ## Exit codes
//!
//! - `0`: success
//! - `2`: no article with that slug
//! - `3`: the feed could not be loaded

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

use news_detail::cli::{Cli, Command};
use news_detail::config::FeedConfig;
use news_detail::outputs::{json, markdown, messages, OutputFormat};
use news_detail::{DetailResolver, FeedLoader, FeedStrategy, HttpFeedSource, Locale, ResolveError};

const EXIT_NOT_FOUND: u8 = 2;
const EXIT_UNAVAILABLE: u8 = 3;

#[tokio::main]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args.command, locale = %args.locale, "Parsed CLI arguments");

    let config = FeedConfig::resolve(&args)?;
    let strategy = FeedStrategy::from(config.use_shared_cache);
    info!(
        feed_url = %config.feed_url,
        timeout_secs = config.timeout_secs,
        ?strategy,
        "news_detail starting up"
    );

    // One loader for the whole process; everything below borrows it.
    let source = HttpFeedSource::new(config.feed_url()?, &config.user_agent)?;
    debug!(url = %source.url(), "Feed source ready");
    let loader = FeedLoader::new(source, config.timeout()?);

    if let Some(prewarm) = &config.prewarm_locale {
        let feed = loader.get_feed(&Locale::new(prewarm.as_str())).await;
        info!(locale = %prewarm, items = feed.len(), "Pre-warmed news feed cache");
    }

    let locale = Locale::new(args.locale.as_str());
    let resolver = DetailResolver::new(&loader, strategy);

    let code = match &args.command {
        Command::Show { slug } => show(&resolver, slug, &locale, args.format).await?,
        Command::List => list(&resolver, &locale, args.format).await?,
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, exit_code = ?code, "Execution complete");
    Ok(code)
}

async fn show(
    resolver: &DetailResolver<'_, HttpFeedSource>,
    slug: &str,
    locale: &Locale,
    format: OutputFormat,
) -> Result<ExitCode, Box<dyn Error>> {
    match resolver.resolve(slug, locale).await {
        Ok(record) => {
            let rendered = match format {
                OutputFormat::Json => json::detail_to_json(&record)?,
                OutputFormat::Markdown => markdown::detail_to_markdown(&record, locale),
            };
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Err(ResolveError::NotFound { .. }) => {
            println!("{}", messages::not_found(locale));
            Ok(ExitCode::from(EXIT_NOT_FOUND))
        }
        Err(ResolveError::Unavailable(e)) => {
            warn!(error = %e, "Cannot show article");
            println!("{}", messages::unavailable(locale));
            Ok(ExitCode::from(EXIT_UNAVAILABLE))
        }
    }
}

async fn list(
    resolver: &DetailResolver<'_, HttpFeedSource>,
    locale: &Locale,
    format: OutputFormat,
) -> Result<ExitCode, Box<dyn Error>> {
    match resolver.list(locale).await {
        Ok(feed) => {
            let rendered = match format {
                OutputFormat::Json => json::feed_to_json(&feed)?,
                OutputFormat::Markdown => markdown::feed_to_markdown(&feed, locale),
            };
            println!("{rendered}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!(error = %e, "Cannot list articles");
            println!("{}", messages::unavailable(locale));
            Ok(ExitCode::from(EXIT_UNAVAILABLE))
        }
    }
}

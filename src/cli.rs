//! Command-line interface definitions for news_detail.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Feed location and locale can also come from environment variables.

use crate::outputs::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the news_detail application.
///
/// # Examples
///
/// ```sh
/// # One article, Arabic, as Markdown
/// news_detail --locale ar --format markdown show launch-2024
///
/// # The whole feed from a mirror, bypassing the cache
/// news_detail --feed-url https://mirror.example.com/news.json --fresh list
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// URL of the JSON news feed
    #[arg(long, env = "NEWS_FEED_URL")]
    pub feed_url: Option<String>,

    /// Seconds to wait for the feed before giving up
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Fetch the feed for every lookup instead of going through the cache
    #[arg(long)]
    pub fresh: bool,

    /// Load the feed for this locale before serving the request
    #[arg(long)]
    pub prewarm: Option<String>,

    /// Locale to resolve records for (e.g. "en", "ar")
    #[arg(short, long, env = "NEWS_LOCALE", default_value = "en", global = true)]
    pub locale: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the article with the given slug
    Show {
        /// Slug of the article, exactly as it appears in the feed
        slug: String,
    },
    /// List every article in the feed
    List,
}

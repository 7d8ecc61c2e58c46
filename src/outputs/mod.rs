//! Rendering of resolved news records for the terminal.
//!
//! # Submodules
//!
//! - [`json`]: records and feeds as pretty-printed JSON
//! - [`markdown`]: article and feed views as Markdown, right-to-left for Arabic
//! - [`messages`]: the localized "not found" and "unavailable" notices

pub mod json;
pub mod markdown;
pub mod messages;

use clap::ValueEnum;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

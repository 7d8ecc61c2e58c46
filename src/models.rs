//! Data models for the news feed and its locale-resolved representation.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FeedDocument`] / [`RawNewsRecord`]: the feed exactly as the remote host serves it
//! - [`ResolvedNewsRecord`]: one record after locale selection and image normalization
//! - [`FeedSnapshot`]: an immutable, locale-tagged list of resolved records
//! - [`Locale`]: the language tag that drives field selection
//!
//! Wire field names are camelCase (`shortDescription`, `shortDescription_ar`),
//! so the affected fields carry explicit `#[serde(rename)]` attributes.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Width given to an image that was published as a bare URL.
pub const DEFAULT_IMAGE_WIDTH: u32 = 800;
/// Height given to an image that was published as a bare URL.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 600;

/// A language tag such as `"en"`, `"ar"` or `"ar-EG"`.
///
/// Cache bookkeeping compares tags verbatim; only field selection looks at
/// the primary language subtag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

/// Reading direction for a locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` when the primary subtag is `ar`, ignoring case.
    ///
    /// Anything else, including tags that are not real languages, selects
    /// the base (English) fields.
    pub fn is_arabic(&self) -> bool {
        self.0
            .split(['-', '_'])
            .next()
            .is_some_and(|primary| primary.eq_ignore_ascii_case("ar"))
    }

    pub fn direction(&self) -> TextDirection {
        if self.is_arabic() {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// The feed document as served: `{ "news": [...] }`.
///
/// Records are kept as raw JSON here and decoded one at a time, so a single
/// malformed record cannot take the rest of the feed down with it.
#[derive(Debug, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub news: Vec<serde_json::Value>,
}

/// Record identifiers show up both as numbers and as strings in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl Default for RecordId {
    fn default() -> Self {
        RecordId::Text(String::new())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// A description is either one block of text or a list of paragraphs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDescription {
    Text(String),
    Paragraphs(Vec<String>),
}

impl RawDescription {
    fn is_empty(&self) -> bool {
        match self {
            RawDescription::Text(text) => text.is_empty(),
            RawDescription::Paragraphs(paragraphs) => paragraphs.is_empty(),
        }
    }

    /// Canonical paragraph list.
    ///
    /// Text is split on blank lines; each piece is trimmed and empty pieces
    /// are dropped. A list is kept exactly as published.
    pub fn into_paragraphs(self) -> Vec<String> {
        match self {
            RawDescription::Paragraphs(paragraphs) => paragraphs,
            RawDescription::Text(text) => {
                let normalized = text.replace("\r\n", "\n");
                let mut paragraphs = Vec::new();
                let mut current: Vec<&str> = Vec::new();
                for line in normalized.lines() {
                    if line.trim().is_empty() {
                        if !current.is_empty() {
                            paragraphs.push(current.join("\n").trim().to_string());
                            current.clear();
                        }
                    } else {
                        current.push(line);
                    }
                }
                if !current.is_empty() {
                    paragraphs.push(current.join("\n").trim().to_string());
                }
                paragraphs
            }
        }
    }
}

/// An image attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// An image list entry as published; missing or `null` sizes get defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawImageDescriptor {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl From<RawImageDescriptor> for ImageDescriptor {
    fn from(raw: RawImageDescriptor) -> Self {
        Self {
            url: raw.url,
            width: raw.width.unwrap_or(DEFAULT_IMAGE_WIDTH),
            height: raw.height.unwrap_or(DEFAULT_IMAGE_HEIGHT),
        }
    }
}

impl ImageDescriptor {
    /// Promote a bare URL to a descriptor with the default dimensions.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    List(Vec<RawImageDescriptor>),
}

impl RawImage {
    pub fn into_descriptors(self) -> Vec<ImageDescriptor> {
        match self {
            RawImage::Url(url) => vec![ImageDescriptor::from_url(url)],
            RawImage::List(images) => images.into_iter().map(ImageDescriptor::from).collect(),
        }
    }
}

/// A news record exactly as received from the feed host.
///
/// Every field except `slug` may be missing or `null`; missing text reads
/// as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNewsRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub slug: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_ar: Option<String>,
    #[serde(default)]
    pub description: Option<RawDescription>,
    #[serde(default)]
    pub description_ar: Option<RawDescription>,
    #[serde(default, rename = "shortDescription")]
    pub short_description: Option<String>,
    #[serde(default, rename = "shortDescription_ar")]
    pub short_description_ar: Option<String>,
    #[serde(default)]
    pub image: Option<RawImage>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Pick the Arabic variant when it applies and is non-empty, else the base.
fn pick_text(locale: &Locale, base: Option<String>, arabic: Option<String>) -> String {
    match arabic {
        Some(ar) if locale.is_arabic() && !ar.is_empty() => ar,
        _ => base.unwrap_or_default(),
    }
}

fn pick_description(
    locale: &Locale,
    base: Option<RawDescription>,
    arabic: Option<RawDescription>,
) -> Vec<String> {
    match arabic {
        Some(ar) if locale.is_arabic() && !ar.is_empty() => ar.into_paragraphs(),
        _ => base.map(RawDescription::into_paragraphs).unwrap_or_default(),
    }
}

impl RawNewsRecord {
    /// Apply the locale rule to every paired field and normalize the image.
    pub fn resolve(self, locale: &Locale) -> ResolvedNewsRecord {
        ResolvedNewsRecord {
            id: self.id.unwrap_or_default(),
            slug: self.slug,
            title: pick_text(locale, self.title, self.title_ar),
            description: pick_description(locale, self.description, self.description_ar),
            short_description: pick_text(
                locale,
                self.short_description,
                self.short_description_ar,
            ),
            image: self
                .image
                .map(RawImage::into_descriptors)
                .unwrap_or_default(),
            date: self.date.unwrap_or_default(),
        }
    }
}

/// One news record after locale selection.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResolvedNewsRecord {
    pub id: RecordId,
    pub slug: String,
    pub title: String,
    /// Body paragraphs in reading order.
    pub description: Vec<String>,
    #[serde(rename = "shortDescription")]
    pub short_description: String,
    pub image: Vec<ImageDescriptor>,
    /// The publication date exactly as published.
    pub date: String,
}

impl ResolvedNewsRecord {
    /// The image shown at the top of the article, if any.
    pub fn hero_image(&self) -> Option<&ImageDescriptor> {
        self.image.first()
    }
}

/// A complete feed resolved for a single locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub locale: Locale,
    pub records: Vec<ResolvedNewsRecord>,
}

impl FeedSnapshot {
    /// Resolve every raw record of `document` for `locale`, keeping feed order.
    ///
    /// Records that do not decode (no slug, wrong field types) are logged
    /// and skipped.
    pub fn from_document(document: FeedDocument, locale: &Locale) -> Self {
        let records: Vec<ResolvedNewsRecord> = document
            .news
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<RawNewsRecord>(value) {
                    Ok(raw) => Some(raw.resolve(locale)),
                    Err(e) => {
                        warn!(%locale, index, error = %e, "Skipping malformed news record");
                        None
                    }
                }
            })
            .collect();

        let duplicates: Vec<&str> = records
            .iter()
            .map(|r| r.slug.as_str())
            .duplicates()
            .collect();
        if !duplicates.is_empty() {
            warn!(%locale, ?duplicates, "Feed contains duplicate slugs; first occurrence wins");
        }

        Self {
            locale: locale.clone(),
            records,
        }
    }

    pub fn empty(locale: &Locale) -> Self {
        Self {
            locale: locale.clone(),
            records: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// First record whose slug equals `slug` exactly.
    pub fn find(&self, slug: &str) -> Option<&ResolvedNewsRecord> {
        self.records.iter().find(|r| r.slug == slug)
    }
}

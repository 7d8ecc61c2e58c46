//! Markdown rendering of an article and of the feed listing.
//!
//! Arabic output is wrapped in a `<div dir="rtl">` block so Markdown viewers
//! that pass HTML through lay it out right-to-left.

use crate::models::{FeedSnapshot, Locale, ResolvedNewsRecord, TextDirection};
use crate::utils::display_date;

fn wrap_direction(body: String, locale: &Locale) -> String {
    match locale.direction() {
        TextDirection::Ltr => body,
        TextDirection::Rtl => format!("<div dir=\"rtl\">\n\n{}\n</div>\n", body.trim_end()),
    }
}

/// Render one article: title, date, hero image, then the body paragraphs.
pub fn detail_to_markdown(record: &ResolvedNewsRecord, locale: &Locale) -> String {
    let mut md = format!("# {}\n\n", record.title);

    if !record.date.is_empty() {
        md.push_str(&format!("*{}*\n\n", display_date(&record.date, locale)));
    }

    if let Some(image) = record.hero_image() {
        md.push_str(&format!("![{}]({})\n\n", record.title, image.url));
    }

    for paragraph in &record.description {
        md.push_str(paragraph);
        md.push_str("\n\n");
    }

    wrap_direction(md, locale)
}

/// Render the feed as a list of linked headlines with their short descriptions.
pub fn feed_to_markdown(snapshot: &FeedSnapshot, locale: &Locale) -> String {
    let heading = if locale.is_arabic() { "الأخبار" } else { "News" };
    let mut md = format!("# {heading}\n\n");

    for record in &snapshot.records {
        md.push_str(&format!("- **[{}](news/{})**", record.title, record.slug));
        if !record.date.is_empty() {
            md.push_str(&format!(" · {}", display_date(&record.date, locale)));
        }
        md.push('\n');
        if !record.short_description.is_empty() {
            md.push_str(&format!("  {}\n", record.short_description));
        }
    }

    wrap_direction(md, locale)
}

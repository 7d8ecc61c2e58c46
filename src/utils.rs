//! Small helpers for logging and date display.

use crate::models::Locale;
use chrono::{DateTime, Datelike, NaiveDate};

/// Month names as used on the Arabic pages (Egyptian/Levantine usage).
const ARABIC_MONTHS: [&str; 12] = [
    "يناير",
    "فبراير",
    "مارس",
    "أبريل",
    "مايو",
    "يونيو",
    "يوليو",
    "أغسطس",
    "سبتمبر",
    "أكتوبر",
    "نوفمبر",
    "ديسمبر",
];

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` characters are cut at a character boundary and
/// get `"…(+N bytes)"` appended, where N counts the dropped bytes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Parse a feed date: `YYYY-MM-DD`, or a full RFC 3339 timestamp.
pub fn parse_feed_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(date).ok().map(|dt| dt.date_naive()))
}

/// Human-readable publication date for `locale`.
///
/// English gets `January 5, 2024`, Arabic gets `5 يناير 2024`. Dates that do
/// not parse are shown exactly as published.
pub fn display_date(date: &str, locale: &Locale) -> String {
    let Some(day) = parse_feed_date(date) else {
        return date.to_string();
    };

    if locale.is_arabic() {
        format!(
            "{} {} {}",
            day.day(),
            ARABIC_MONTHS[day.month0() as usize],
            day.year()
        )
    } else {
        day.format("%B %-d, %Y").to_string()
    }
}

//! JSON output.
//!
//! Records serialize with the feed's own field names (`shortDescription`),
//! so the output can be fed back to anything that reads the upstream feed
//! after locale resolution.

use crate::models::{FeedSnapshot, ResolvedNewsRecord};

/// Pretty JSON for a single resolved record.
pub fn detail_to_json(record: &ResolvedNewsRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// Pretty JSON for a whole snapshot: `{ "locale": ..., "records": [...] }`.
pub fn feed_to_json(snapshot: &FeedSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}

//! The computed "display date" of a content item.
//!
//! Editors may override the date shown for a piece of content; without an
//! override the last-modified time is used. The value is recomputed on every
//! access.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::content::ContentNode;

/// Parse a stored date value as a UTC instant.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` (stored
/// in UTC), a bare `YYYY-MM-DD` (midnight UTC) and unix timestamps.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
    }

    None
}

/// The override when present and parseable, the fallback otherwise.
pub fn resolve_display_date(
    explicit_override: Option<&str>,
    fallback: DateTime<Utc>,
) -> DateTime<Utc> {
    match explicit_override {
        Some(raw) => parse_instant(raw).unwrap_or_else(|| {
            debug!(value = raw, "unparseable display date override, using fallback");
            fallback
        }),
        None => fallback,
    }
}

/// Display date of a content node, falling back to its changed time.
pub fn display_date_for(node: &ContentNode) -> DateTime<Utc> {
    resolve_display_date(node.display_date.as_deref(), node.changed)
}

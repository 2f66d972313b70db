//! Timestamp utilities
//!
//! Consultation timestamps are stored as RFC 3339 UTC text with a fixed
//! microsecond precision, so lexical order in SQLite matches time order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp in the stored representation
pub fn to_storage(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Current time in the stored representation
pub fn now_storage() -> String {
    to_storage(now())
}

/// Human-readable UTC form, e.g. `Oct 17, 2026, 3:04 PM UTC`
///
/// Dashboard cards carry this as fallback text; the page re-renders it in
/// the viewer's local time from the `datetime` attribute. Unparseable input
/// is returned unchanged.
pub fn format_display(stored: &str) -> String {
    match DateTime::parse_from_rfc3339(stored) {
        Ok(ts) => ts
            .with_timezone(&Utc)
            .format("%b %-d, %Y, %-I:%M %p UTC")
            .to_string(),
        Err(_) => stored.to_string(),
    }
}

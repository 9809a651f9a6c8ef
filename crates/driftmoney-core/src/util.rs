//! Shared utility functions used across multiple modules.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};

/// Current UTC time as an ISO-8601 string with millisecond precision.
///
/// All locally written timestamps use this shape so that they sort lexically.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Timestamp for a local mutation of a record last stamped `previous`.
///
/// Always strictly later than `previous`: when the clock has not passed it
/// (same millisecond, or the clock went backwards) the result is `previous`
/// plus one millisecond.
pub fn next_timestamp(previous: &str) -> String {
    let now = Utc::now().trunc_subsecs(3);
    match parse_timestamp(previous) {
        Some(previous) if previous >= now => {
            format_timestamp(previous.trunc_subsecs(3) + Duration::milliseconds(1))
        }
        _ => format_timestamp(now),
    }
}

/// Uppercased ISO 4217 style code, or `None` unless `value` is three ASCII
/// letters once trimmed.
pub fn normalize_currency_code(value: &str) -> Option<String> {
    let value = value.trim();
    (value.len() == 3 && value.chars().all(|ch| ch.is_ascii_alphabetic()))
        .then(|| value.to_ascii_uppercase())
}

/// Whether `candidate` is strictly later than `baseline`.
///
/// Both sides are compared as instants when they parse as RFC 3339, so
/// `2024-01-01T00:00:00Z` and `2024-01-01T00:00:00.000Z` are equal. Anything
/// unparseable falls back to lexical comparison.
pub fn is_newer(candidate: &str, baseline: &str) -> bool {
    match (parse_timestamp(candidate), parse_timestamp(baseline)) {
        (Some(candidate), Some(baseline)) => candidate > baseline,
        _ => candidate > baseline,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Generate a new entity id (UUID v7, time-sortable).
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

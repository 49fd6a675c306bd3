//! Block timestamp parsing.
//!
//! The node reports block acceptance times as ISO-8601-like strings with a
//! fractional-seconds field of varying width and a trailing zone marker,
//! e.g. `2024-01-01T12:34:56.789012Z`. The fraction is normalized to a fixed
//! width before parsing instead of assuming what the node truncated to.

use crate::error::CoreError;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Fractional digits the parser normalizes to (microsecond resolution).
const FRACTION_DIGITS: usize = 6;

/// Parses one block acceptance timestamp into a comparable instant.
///
/// Malformed input is an error for the whole poll cycle; the caller decides
/// whether to skip the cycle, never this function.
pub fn parse_block_time(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let trimmed = raw.trim();

    // Drop a single trailing zone marker (`Z` in practice).
    let body = match trimmed.chars().last() {
        Some(last) if !last.is_ascii_digit() => &trimmed[..trimmed.len() - last.len_utf8()],
        _ => trimmed,
    };

    let (seconds, fraction) = match body.split_once('.') {
        Some((seconds, fraction)) => (seconds, fraction),
        None => (body, ""),
    };

    if !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::MalformedTimestamp {
            value: raw.to_string(),
            reason: "non-digit characters in fractional seconds".to_string(),
        });
    }

    let mut digits: String = fraction.chars().take(FRACTION_DIGITS).collect();
    while digits.len() < FRACTION_DIGITS {
        digits.push('0');
    }

    let normalized = format!("{seconds}.{digits}");
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.and_utc())
        .map_err(|err| CoreError::MalformedTimestamp {
            value: raw.to_string(),
            reason: err.to_string(),
        })
}

/// Signed seconds from `older` to `newer`, at microsecond resolution.
pub fn seconds_between(newer: DateTime<Utc>, older: DateTime<Utc>) -> f64 {
    let delta = newer.signed_duration_since(older);
    delta
        .num_microseconds()
        .map(|us| us as f64 / 1_000_000.0)
        .unwrap_or_else(|| delta.num_milliseconds() as f64 / 1_000.0)
}

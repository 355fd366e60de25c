#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Display helpers shared by police data front ends.
//!
//! [`to_sentence_case`] turns `snake_case` identifiers into labels and
//! [`format_date`] renders ISO 8601 timestamps as `Sep 1, 2099 2:55 PM`.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// `strftime` pattern producing e.g. `Sep 1, 2099 2:55 PM`.
const DISPLAY_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

/// Errors from timestamp formatting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The input was not a recognizable ISO 8601 date or timestamp.
    #[error("unrecognized timestamp {value:?}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
    },
}

/// Converts a `snake_case` string to sentence case.
///
/// Underscores become spaces and the first character is upper-cased; the
/// rest of the string is left alone.
#[must_use]
pub fn to_sentence_case(s: &str) -> String {
    let spaced = s.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parses an ISO 8601 timestamp into `tz`.
///
/// Accepts RFC 3339 timestamps with an offset. A bare
/// `YYYY-MM-DDTHH:MM:SS[.fff]` is wall-clock time in `tz`, and a bare
/// `YYYY-MM-DD` is midnight UTC.
///
/// # Errors
///
/// Returns [`FormatError::InvalidTimestamp`] if none of the forms match,
/// or if a wall-clock time does not exist in `tz`.
pub fn parse_timestamp_in<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Tz>, FormatError> {
    let s = s.trim();
    let invalid = || FormatError::InvalidTimestamp {
        value: s.to_string(),
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(tz));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return tz.from_local_datetime(&naive).earliest().ok_or_else(invalid);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc().with_timezone(tz));
    }
    Err(invalid())
}

/// Formats an ISO 8601 timestamp for display in the local time zone.
///
/// # Errors
///
/// Returns [`FormatError`] if the timestamp cannot be parsed.
pub fn format_date(s: &str) -> Result<String, FormatError> {
    format_date_in(s, &Local)
}

/// Formats an ISO 8601 timestamp for display in the given time zone.
///
/// # Errors
///
/// Returns [`FormatError`] if the timestamp cannot be parsed.
pub fn format_date_in<Tz>(s: &str, tz: &Tz) -> Result<String, FormatError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(parse_timestamp_in(s, tz)?.format(DISPLAY_FORMAT).to_string())
}

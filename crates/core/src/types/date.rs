//! Calendar date normalization.
//!
//! Expense dates arrive from forms, spreadsheets and the database in several
//! textual shapes. Every date written to or read from storage goes through
//! [`normalize_date`] so the rest of the application only ever sees the
//! canonical `YYYY-MM-DD` form.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// `chrono` format string of the canonical date form.
pub const CANONICAL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Plain date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d/%m/%Y"];

/// Timestamp layouts without an offset; only the date part is kept.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Errors that can occur when normalizing a date.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The input is empty or whitespace.
    #[error("date cannot be empty")]
    Empty,
    /// The input does not match any accepted layout.
    #[error("unrecognized date: {0}")]
    Unrecognized(String),
}

/// Normalize a date string to the canonical `YYYY-MM-DD` form.
///
/// Accepted inputs (surrounding whitespace is ignored):
/// - `2024-03-05`, `2024/03/05`, `2024.03.05`
/// - `05/03/2024` (day first)
/// - RFC 3339 timestamps such as `2024-03-05T21:00:00-03:00`; the calendar
///   date is taken in the timestamp's own offset
/// - naive timestamps such as `2024-03-05 21:00:00` or `2024-03-05T21:00`
///
/// # Errors
///
/// Returns [`DateError::Empty`] for blank input and
/// [`DateError::Unrecognized`] for anything that is not a valid calendar date
/// in one of the layouts above.
///
/// # Examples
///
/// ```
/// use storedesk_core::normalize_date;
///
/// assert_eq!(normalize_date("2024/03/05").unwrap(), "2024-03-05");
/// assert_eq!(normalize_date("05/03/2024").unwrap(), "2024-03-05");
/// assert!(normalize_date("yesterday").is_err());
/// ```
pub fn normalize_date(input: &str) -> Result<String, DateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DateError::Empty);
    }

    parse_calendar_date(trimmed)
        .map(|date| date.format(CANONICAL_DATE_FORMAT).to_string())
        .ok_or_else(|| DateError::Unrecognized(trimmed.to_owned()))
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(s) {
        return Some(timestamp.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
                .map(|timestamp| timestamp.date())
        })
}

//! Calendar-date helpers shared by the storage and wire boundaries
//!
//! Dates cross both boundaries as `YYYY-MM-DD`. Time-of-day is dropped.

use chrono::{DateTime, NaiveDate, ParseError, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, or an RFC 3339 timestamp truncated to its UTC date
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT).or_else(|date_err| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|_| date_err)
    })
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

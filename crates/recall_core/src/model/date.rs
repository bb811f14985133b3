//! Calendar-date text form used for persistence and CLI input.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

const DATE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Formats a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Returns whether `date` survives a `format_date` / `parse_date` round trip.
///
/// Years outside `0000..=9999` format with a sign or a fifth digit.
pub fn is_storable(date: NaiveDate) -> bool {
    (0..=9999).contains(&date.year())
}

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// Returns `None` for any other shape, including unpadded fields
/// (`2024-1-2`) and trailing time components.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

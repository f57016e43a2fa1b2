//! Calendar date handling shared by every date-bearing résumé field.
//!
//! Dates travel in three shapes: whatever the server or the user typed,
//! the editable string shown in the form, and the canonical `YYYY-MM-DD`
//! string sent back on save. None of the functions here fail; bad input
//! degrades to an empty string and the validator is responsible for
//! flagging it.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a free-form date into a calendar day.
///
/// Accepts day-precision dates, RFC 3339 timestamps (the date is taken as
/// written, offset ignored), naive timestamps and month-precision values
/// such as `2023-05`, which resolve to the first of the month. The year
/// range is not checked here.
pub fn parse(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.date());
        }
    }

    // <input type="month"> values
    NaiveDate::parse_from_str(&format!("{raw}-01"), CANONICAL_FORMAT).ok()
}

fn in_range(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

fn canonical(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Converts a stored value into the string the editor form displays.
///
/// Unparseable input becomes `""`. A parseable date outside the accepted
/// year range is still shown so the user can correct it.
pub fn to_editable(raw: Option<&str>) -> String {
    raw.and_then(parse).map(canonical).unwrap_or_default()
}

/// True for an empty value or a real calendar date within
/// [`MIN_YEAR`]..=[`MAX_YEAR`]. Whether an empty value is acceptable for a
/// particular field is decided by the caller.
pub fn is_valid(raw: &str) -> bool {
    if raw.trim().is_empty() {
        return true;
    }
    parse(raw).is_some_and(in_range)
}

/// Canonical `YYYY-MM-DD` form of `raw`, or `""` when it is empty or
/// invalid. Idempotent.
pub fn normalize(raw: &str) -> String {
    parse(raw)
        .filter(|date| in_range(*date))
        .map(canonical)
        .unwrap_or_default()
}

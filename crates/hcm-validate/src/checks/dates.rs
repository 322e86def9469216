//! Date parsing for `date` fields.
//!
//! ISO 8601 is the primary form; a short list of common spreadsheet
//! formats is accepted as fallback, plus any configured extras.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse `value` as a calendar date, returning the date part.
pub fn parse_date(value: &str, extra_formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, ISO_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    ISO_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
        .or_else(|| {
            extra_formats.iter().find_map(|format| {
                NaiveDate::parse_from_str(value, format).ok().or_else(|| {
                    NaiveDateTime::parse_from_str(value, format)
                        .ok()
                        .map(|datetime| datetime.date())
                })
            })
        })
}

pub fn is_valid_date(value: &str, extra_formats: &[String]) -> bool {
    parse_date(value, extra_formats).is_some()
}

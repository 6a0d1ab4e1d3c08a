//! Field normalisation shared by the model pre-save routines
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use evently_result::Result;
use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that never make it into a slug
static RE_SLUG_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());

/// Runs of whitespace
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Runs of dashes
static RE_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());

/// Regex for accepted times
///
/// `H:M`, `HH:MM` with optional seconds
static RE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{1,2})(?::(\d{2}))?$").unwrap());

/// Regex for valid email addresses
///
/// Conservative `local@domain.tld` check
pub static RE_EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Naive date-time layouts, interpreted as UTC
const NAIVE_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Derive a URL-safe slug from a title
///
/// Lowercases, drops anything that is not ASCII alphanumeric, whitespace or a
/// dash, then turns whitespace runs into single dashes.
pub fn slugify(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = RE_SLUG_STRIP.replace_all(&lowered, "");
    let dashed = RE_WHITESPACE.replace_all(&stripped, "-");
    let collapsed = RE_DASHES.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Parse a date and reduce it to its UTC calendar date (`YYYY-MM-DD`)
pub fn normalise_date(value: &str) -> Result<String> {
    let value = value.trim();
    parse_date(value)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| {
            create_error!(InvalidDate {
                value: value.to_string()
            })
        })
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time.with_timezone(&Utc).date_naive());
    }

    if let Ok(date_time) = DateTime::parse_from_rfc2822(value) {
        return Some(date_time.with_timezone(&Utc).date_naive());
    }

    if let Some(date_time) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(date_time.date());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Validate a 24h time and normalise it to `HH:MM`
pub fn normalise_time(value: &str) -> Result<String> {
    let value = value.trim();
    let invalid = || {
        create_error!(InvalidTime {
            value: value.to_string()
        })
    };

    let captures = RE_TIME.captures(value).ok_or_else(invalid)?;
    let component = |index: usize| -> Option<u32> {
        captures
            .get(index)
            .and_then(|matched| matched.as_str().parse().ok())
    };

    let hours = component(1).ok_or_else(invalid)?;
    let minutes = component(2).ok_or_else(invalid)?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    if captures.get(3).is_some() && component(3).map_or(true, |seconds| seconds > 59) {
        return Err(invalid());
    }

    Ok(format!("{hours:02}:{minutes:02}"))
}

/// Trim and lowercase an email address
pub fn normalise_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Check an already normalised email address
pub fn is_valid_email(value: &str) -> bool {
    RE_EMAIL.is_match(value)
}

//! Field-level validators shared by the collection schemas

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::report::Violation;

lazy_static! {
    static ref HTTP_URL: Regex = Regex::new(r"^https?://[^\s/?#]+\S*$").unwrap();
    static ref SOCIAL_HANDLE: Regex = Regex::new(r"^@?[A-Za-z0-9][A-Za-z0-9_.-]{0,63}$").unwrap();
}

/// Require a present, non-blank value
pub fn required<'a>(
    field: &str,
    value: Option<&'a str>,
    issues: &mut Vec<Violation>,
) -> Option<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        Some(_) => {
            issues.push(Violation::new(field, "must not be empty"));
            None
        }
        None => {
            issues.push(Violation::new(field, "missing required field"));
            None
        }
    }
}

/// Enforce a maximum character count
pub fn max_len(field: &str, value: &str, max: usize, issues: &mut Vec<Violation>) -> bool {
    let count = value.chars().count();
    if count > max {
        issues.push(Violation::new(
            field,
            format!("must be at most {} characters, got {}", max, count),
        ));
        false
    } else {
        true
    }
}

/// Validate an optional date field, reporting unparseable values
pub fn isodate(
    field: &str,
    value: Option<&str>,
    issues: &mut Vec<Violation>,
) -> Option<NaiveDateTime> {
    let raw = value?;
    match parse_date(raw) {
        Some(dt) => Some(dt),
        None => {
            issues.push(Violation::new(field, format!("unrecognized date `{}`", raw)));
            None
        }
    }
}

/// Require an absolute http(s) URL
pub fn url(field: &str, value: &str, issues: &mut Vec<Violation>) -> bool {
    if HTTP_URL.is_match(value) {
        true
    } else {
        issues.push(Violation::new(field, "must be an absolute http(s) URL"));
        false
    }
}

/// Require a social account handle (optional leading `@`)
pub fn handle(field: &str, value: &str, issues: &mut Vec<Violation>) -> bool {
    if SOCIAL_HANDLE.is_match(value) {
        true
    } else {
        issues.push(Violation::new(field, "must be an account handle"));
        false
    }
}

/// Require kebab-case slug form: lowercase alphanumerics and single hyphens
pub fn slug_format(field: &str, value: &str, issues: &mut Vec<Violation>) -> bool {
    let valid = !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        issues.push(Violation::new(field, "must be lowercase kebab-case"));
    }
    valid
}

/// Parse a date string in the formats front-matter accepts
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

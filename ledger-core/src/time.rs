//! Time utilities: transaction date parsing and month bucketing.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::{LedgerError, Result};

static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}:\d{2}").expect("time-of-day pattern is valid"));

/// Formats carrying an explicit offset. A trailing `Z` is rewritten to
/// `+00:00` before these are tried.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M%z",
];

/// Date-times without an offset; read in the caller's zone.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Resolve an IANA zone name like "America/Chicago".
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| LedgerError::InvalidTimezone(name.to_string()))
}

/// Parse a transaction date string into a UTC instant truncated to milliseconds.
///
/// Strings with `Z` or a numeric offset are exact. Anything else is read as a
/// wall-clock time in `tz`; a local time that is skipped or repeated by a DST
/// transition does not parse. Returns `None` for empty or unrecognised input.
pub fn parse_transaction_date(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_with_offset(s)
        .or_else(|| parse_naive(s, tz))
        .map(|dt| dt.trunc_subsecs(3))
}

fn parse_with_offset(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let normalised = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => s.to_string(),
    };
    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalised, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    tz.from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// True when the raw date string contains an `HH:MM` token.
pub fn has_time_of_day(raw: &str) -> bool {
    TIME_OF_DAY.is_match(raw)
}

/// Month bucket key (`YYYY-MM`) of a UTC instant.
pub fn year_month(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m").to_string()
}

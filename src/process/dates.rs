// src/process/dates.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;

/// NIL policy change took effect 2021-07-01; timestamps on or after it are
/// "post NIL".
pub static NIL_CUTOFF: Lazy<NaiveDateTime> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(2021, 7, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Parse a transfer-date cell into a timestamp, trying the formats the
/// source feeds have actually used. Returns `None` for anything
/// unparseable; callers treat that as the missing-value marker.
pub fn parse_transfer_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim().trim_matches('"');
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Truncate a timestamp to its calendar month, rendered as `YYYY-MM`.
pub fn month_key(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m").to_string()
}

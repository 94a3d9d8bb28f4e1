//! Structural field checks.
//!
//! Each check appends a short issue tag; a record is invalid iff at least
//! one tag was produced. A parse failure and an out-of-range value carry
//! different tags and a field never receives both.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::validator::types::RawResortRecord;

/// Regions the guide covers. Anything else is a structural issue.
pub const VALID_REGIONS: &[&str] = &["Hokkaido", "Nagano", "Niigata", "Tohoku"];

/// Local-naive timestamp formats accepted for `last_verified`, tried in
/// order. Date-only values fall back to midnight.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Runs every structural check against one record and returns the issue tags.
pub fn structural_issues(record: &RawResortRecord) -> Vec<String> {
    let mut issues = Vec::new();

    if !is_present(record.resort_name.as_ref()) {
        issues.push("Missing resort_name".to_string());
    }

    let region_ok = record
        .region
        .as_ref()
        .and_then(Value::as_str)
        .is_some_and(|r| VALID_REGIONS.contains(&r));
    if !region_ok {
        issues.push("Invalid or missing region".to_string());
    }

    check_range(
        &mut issues,
        "elevation_m",
        parse_f64(record.elevation_m.as_ref()),
        100.0,
        2500.0,
    );
    check_range(
        &mut issues,
        "avg_snowfall_cm",
        parse_f64(record.avg_snowfall_cm.as_ref()),
        100.0,
        2000.0,
    );
    check_range(
        &mut issues,
        "english_support",
        parse_i64(record.english_support.as_ref()).map(|i| i as f64),
        1.0,
        5.0,
    );

    issues
}

/// Parses a `last_verified` value into a local-naive timestamp.
///
/// A single trailing "Z" is tolerated. Unparsable or non-string values are
/// not errors; they read as "no timestamp" and feed a zero recency weight.
pub fn parse_iso(raw: Option<&Value>) -> Option<NaiveDateTime> {
    let s = raw?.as_str()?;
    let s = s.strip_suffix('Z').unwrap_or(s);

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Presence test shared by the name check and the completeness weight:
/// missing keys, nulls, and empty strings are absent; numeric zero is
/// present.
pub(crate) fn is_present(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Shared parse-then-bound step for the numeric fields. `parsed` is `None`
/// on a parse failure; values are checked against an inclusive range.
fn check_range(issues: &mut Vec<String>, field: &str, parsed: Option<f64>, min: f64, max: f64) {
    match parsed {
        Some(v) if (min..=max).contains(&v) => {}
        Some(_) => issues.push(format!("{field} out of range")),
        None => issues.push(format!("Invalid {field}")),
    }
}

/// Reads a loose numeric field. Absent fields read as zero, which the range
/// check then rejects; only present-but-unparsable values count as parse
/// failures.
fn parse_f64(v: Option<&Value>) -> Option<f64> {
    match v {
        None => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Integer variant of [`parse_f64`]. JSON numbers with a fractional part
/// truncate toward zero; numeric strings must be whole.
fn parse_i64(v: Option<&Value>) -> Option<i64> {
    match v {
        None => Some(0),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

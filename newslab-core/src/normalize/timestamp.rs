//! Provider timestamp formats.
//!
//! Every parser returns UTC truncated to whole seconds, or `None` when the raw
//! value does not match its format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// ISO-8601 / RFC 3339. A trailing `Z` is rewritten to `+00:00` first;
/// offset-less values are taken as UTC.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    let explicit = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(head) => format!("{head}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&explicit) {
        return Some(truncate_to_seconds(dt.with_timezone(&Utc)));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&explicit, fmt).ok())
        .map(|naive| truncate_to_seconds(naive.and_utc()))
}

/// Unix epoch seconds as an integer, a float, or a numeric string.
/// Fractional seconds are truncated.
pub fn parse_epoch(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?,
        Value::String(s) => {
            let f: f64 = s.trim().parse().ok()?;
            if !f.is_finite() {
                return None;
            }
            f.trunc() as i64
        }
        _ => return None,
    };
    DateTime::from_timestamp(secs, 0)
}

/// Google News dates as relayed by SerpApi: `10/15/2025, 07:12 PM, +0000 UTC`.
/// Falls back to the leading `MM/DD/YYYY` segment at midnight UTC.
pub fn parse_serp_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    let without_zone = trimmed.strip_suffix("UTC").unwrap_or(trimmed).trim_end();

    if let Ok(dt) = DateTime::parse_from_str(without_zone, "%m/%d/%Y, %I:%M %p, %z") {
        return Some(dt.with_timezone(&Utc));
    }

    let date_part = trimmed.split(',').next()?.trim();
    NaiveDate::parse_from_str(date_part, "%m/%d/%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn truncate_to_seconds(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.timestamp(), 0).unwrap_or(ts)
}

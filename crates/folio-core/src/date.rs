//! Trading date normalization.
//!
//! Bars are keyed by `YYYYMMDD` strings. Trades and signals come from other
//! endpoints and may carry dashed dates or full timestamps, so every date is
//! normalized on the way in.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

const COMPACT_FORMAT: &str = "%Y%m%d";

/// Normalizes a raw date into `YYYYMMDD`.
///
/// Accepts `YYYYMMDD`, `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY-MM-DD HH:MM:SS` and
/// RFC 3339 timestamps. Returns `None` for anything else.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, COMPACT_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })?;
    Some(date.format(COMPACT_FORMAT).to_string())
}

/// Formats a `YYYYMMDD` date as `YYYY-MM-DD`. Unparsable input is returned as is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, COMPACT_FORMAT) {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Short weekday name ("Mon") for a `YYYYMMDD` date.
pub fn weekday_label(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, COMPACT_FORMAT)
        .ok()
        .map(|d| d.weekday().to_string())
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    normalize_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid trading date: {raw:?}")))
}

/// Like `deserialize_date`, but keeps an unparsable value verbatim so a single
/// bad event does not reject the whole request. Consumers re-check with
/// [`normalize_date`] and drop what still fails.
pub(crate) fn deserialize_date_lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_date(&raw).unwrap_or(raw))
}

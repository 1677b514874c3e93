//! Legacy timestamp normalization.
//!
//! Legacy documents record sample times as `DD/MM/YYYY-HH:MM` wall-clock
//! strings. The canonical store uses epoch seconds, so every legacy entry is
//! converted before it is merged. Conversion is a pure transform: the legacy
//! entries are consumed and new canonical entries returned.

use chrono::{Duration, LocalResult, NaiveDateTime, Offset, TimeZone};
use std::fmt;
use std::str::FromStr;

use crate::error::{HistoryError, Result};
use crate::types::{HistoryEntry, LegacyEntry, LegacyHistory};

/// `chrono` format of legacy `time` strings.
pub const LEGACY_TIME_FORMAT: &str = "%d/%m/%Y-%H:%M";

/// Time zone legacy wall-clock times are interpreted in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Zone {
    /// The system's local zone, which is what the legacy writer used.
    #[default]
    Local,
    Utc,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => f.write_str("local"),
            Zone::Utc => f.write_str("utc"),
        }
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Zone::Local),
            "utc" => Ok(Zone::Utc),
            _ => Err(format!("Unknown timezone: '{}' (expected local or utc)", s)),
        }
    }
}

/// Parse one legacy time string into epoch seconds in `tz`.
///
/// Ambiguous minutes (clocks turned back) resolve to the earlier instant.
/// Minutes skipped by a forward transition keep the offset that was in effect
/// before the transition, so they land past it by the length of the gap.
pub fn parse_legacy_time<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(value, LEGACY_TIME_FORMAT).map_err(|e| {
        HistoryError::MalformedTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.timestamp()),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.timestamp()),
        LocalResult::None => {
            let offset = tz
                .offset_from_local_datetime(&(naive - Duration::days(1)))
                .earliest()
                .ok_or_else(|| HistoryError::MalformedTimestamp {
                    value: value.to_string(),
                    reason: "no offset before the skipped time".to_string(),
                })?
                .fix();
            let utc = naive - Duration::seconds(i64::from(offset.local_minus_utc()));
            Ok(utc.and_utc().timestamp())
        }
    }
}

/// Format epoch seconds back into the legacy representation.
pub fn format_legacy_time<Tz>(secs: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    tz.timestamp_opt(secs, 0)
        .earliest()
        .map(|dt| dt.format(LEGACY_TIME_FORMAT).to_string())
}

/// Convert a sequence of legacy entries, failing on the first bad time.
pub fn normalize_entries<Tz: TimeZone>(
    entries: Vec<LegacyEntry>,
    tz: &Tz,
) -> Result<Vec<HistoryEntry>> {
    entries
        .into_iter()
        .map(|entry| -> Result<HistoryEntry> {
            let secs = parse_legacy_time(&entry.time, tz)?;
            Ok(entry.with_time(secs))
        })
        .collect()
}

/// Convert both categories of a legacy document.
pub fn normalize_history<Tz: TimeZone>(
    legacy: LegacyHistory<String>,
    tz: &Tz,
) -> Result<LegacyHistory<i64>> {
    let any = legacy.any.map(|e| normalize_entries(e, tz)).transpose()?;
    let unbroken = legacy
        .unbroken
        .map(|e| normalize_entries(e, tz))
        .transpose()?;
    Ok(LegacyHistory { any, unbroken })
}

/// [`normalize_history`] with the zone picked at runtime.
pub fn normalize_history_in(legacy: LegacyHistory<String>, zone: Zone) -> Result<LegacyHistory<i64>> {
    match zone {
        Zone::Local => normalize_history(legacy, &chrono::Local),
        Zone::Utc => normalize_history(legacy, &chrono::Utc),
    }
}

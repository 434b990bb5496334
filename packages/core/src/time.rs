//! Timestamp normalization.
//!
//! Storage backends hand back timestamps in whatever shape they keep them
//! (SQLite's `CURRENT_TIMESTAMP` produces `2026-10-15 08:30:00`, other
//! writers may store RFC 3339). [`Timestamp`] accepts any of those and always
//! serialises to a single wire format: RFC 3339 in UTC, second precision,
//! `Z` suffix.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Naive layouts tried, in order, when the input is not RFC 3339.
/// Naive values are interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognised timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// A UTC instant with a fixed textual wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse a timestamp as produced by a storage backend.
    pub fn parse(raw: &str) -> Result<Self, TimestampError> {
        let trimmed = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from(dt.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
            .map(|naive| Self::from(Utc.from_utc_datetime(&naive)))
            .ok_or_else(|| TimestampError(raw.to_string()))
    }

    /// The layout SQLite's own `CURRENT_TIMESTAMP` uses, for writing values
    /// that compare correctly against column defaults.
    pub fn to_storage_string(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Sub-second precision is dropped so that values read back from storage
/// compare equal to the values written.
impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        let secs = dt.timestamp();
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or(dt))
    }
}

/// Formats as the wire format, e.g. `2026-10-15T08:30:00Z`.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

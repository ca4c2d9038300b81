//! # Temporal Types
//!
//! UTC-only timestamp type for regtrace. Regulation publication dates,
//! requirement creation/update times and history entries all use
//! [`Timestamp`]. Local time conversion is a presentation concern.
//!
//! Unlike publication dates, history timestamps must be strictly
//! increasing, so full sub-second precision is kept in the serialized
//! form and [`Timestamp::successor`] gives the smallest later instant.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A UTC timestamp.
///
/// Serializes to RFC 3339 with `Z` suffix (e.g. `2025-09-01T00:00:00Z`).
/// Deserialization also accepts a bare `YYYY-MM-DD` date, which is how
/// regulation source records carry publication dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current UTC time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Midnight UTC on the given calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] for an impossible date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ValidationError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ValidationError::InvalidTimestamp {
                value: format!("{year:04}-{month:02}-{day:02}"),
                reason: "no such calendar date".to_string(),
            }
        })?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .ok_or_else(|| ValidationError::InvalidTimestamp {
                value: date.to_string(),
                reason: "midnight out of range".to_string(),
            })?;
        Ok(Self(midnight))
    }

    /// Parse an RFC 3339 date-time, a date-time without offset (taken as
    /// UTC), or a bare `YYYY-MM-DD` date (midnight UTC).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimestamp`] if neither form parses.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Self(Utc.from_utc_datetime(&naive)));
        }
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => {
                use chrono::Datelike;
                Self::from_ymd(date.year(), date.month(), date.day())
            }
            Err(e) => Err(ValidationError::InvalidTimestamp {
                value: value.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Access the underlying `chrono::DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The smallest representable instant strictly after this one
    /// (one microsecond later).
    pub fn successor(&self) -> Self {
        Self(self.0 + Duration::microseconds(1))
    }

    /// Calendar date as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    /// RFC 3339 with `Z` suffix, keeping sub-second digits only when present.
    pub fn to_canonical_string(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw).map_err(serde::de::Error::custom)
    }
}

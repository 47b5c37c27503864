//! Query time ranges.
//!
//! A dashboard query always carries the window it is looking at. Macros only
//! ever see the window as whole-second epoch values.

use crate::duration::{parse_offset, DurationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a time range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    /// A bound could not be interpreted.
    #[error("invalid time bound '{0}': expected 'now', 'now-<duration>', epoch milliseconds or RFC 3339")]
    InvalidBound(String),

    /// The relative offset of a bound is not a valid duration.
    #[error("invalid offset in time bound '{bound}': {source}")]
    InvalidOffset {
        /// The bound as given.
        bound: String,
        /// Why the offset was rejected.
        source: DurationError,
    },

    /// The bound lies outside the representable date range.
    #[error("time bound '{0}' is out of range")]
    OutOfRange(String),
}

/// The inclusive time window of a query.
///
/// # Example
///
/// ```
/// use engine::TimeRange;
///
/// let range = TimeRange::from_epoch_secs(1000, 2000).unwrap();
/// assert_eq!(range.from_epoch(), 1000);
/// assert_eq!(range.to_epoch(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the window.
    pub from: DateTime<Utc>,
    /// End of the window.
    pub to: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a time range from two instants.
    #[must_use]
    pub const fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// Creates a time range from epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns `TimeRangeError::OutOfRange` if either value is not a representable instant.
    pub fn from_epoch_secs(from: i64, to: i64) -> Result<Self, TimeRangeError> {
        let instant = |secs: i64| {
            DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| TimeRangeError::OutOfRange(secs.to_string()))
        };
        Ok(Self::new(instant(from)?, instant(to)?))
    }

    /// Parses a time range the way dashboards send it, relative to the current time.
    ///
    /// Each bound may be `now`, `now-<duration>` (e.g. `now-6h`, `now-7d`),
    /// an integer epoch in milliseconds, or an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns a `TimeRangeError` if either bound cannot be parsed.
    pub fn parse(from: &str, to: &str) -> Result<Self, TimeRangeError> {
        Self::parse_at(from, to, Utc::now())
    }

    /// Parses a time range with relative bounds resolved against `now`.
    ///
    /// # Errors
    ///
    /// Returns a `TimeRangeError` if either bound cannot be parsed.
    pub fn parse_at(from: &str, to: &str, now: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        Ok(Self::new(parse_bound(from, now)?, parse_bound(to, now)?))
    }

    /// Start of the window in whole epoch seconds.
    #[must_use]
    pub fn from_epoch(&self) -> i64 {
        self.from.timestamp()
    }

    /// End of the window in whole epoch seconds.
    #[must_use]
    pub fn to_epoch(&self) -> i64 {
        self.to.timestamp()
    }
}

fn parse_bound(bound: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, TimeRangeError> {
    let bound = bound.trim();

    if bound == "now" {
        return Ok(now);
    }

    if let Some(offset) = bound.strip_prefix("now-") {
        let offset = parse_offset(offset).map_err(|source| TimeRangeError::InvalidOffset {
            bound: bound.to_string(),
            source,
        })?;
        return now
            .checked_sub_signed(offset)
            .ok_or_else(|| TimeRangeError::OutOfRange(bound.to_string()));
    }

    if let Ok(millis) = bound.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| TimeRangeError::OutOfRange(bound.to_string()));
    }

    DateTime::parse_from_rfc3339(bound)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TimeRangeError::InvalidBound(bound.to_string()))
}

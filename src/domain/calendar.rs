//! Calendar primitives: CalendarDate, TimeOfDay.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for malformed or impossible date/time input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),
}

/// A date identified only by year/month/day in the platform's reference
/// timezone; never carries a time-of-day.
///
/// Canonical form is `YYYY-MM-DD`, whose lexicographic ordering matches
/// semantic date ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create a CalendarDate from a chrono NaiveDate.
    pub fn new(date: NaiveDate) -> Self {
        CalendarDate(date)
    }

    /// Parse a canonical `YYYY-MM-DD` string. Rejects impossible dates.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(CalendarDate)
            .map_err(|_| DateError::InvalidDate(s.to_string()))
    }

    /// Get the underlying NaiveDate.
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The date `days` whole days after this one.
    pub fn plus_days(&self, days: i64) -> Self {
        CalendarDate(self.0 + chrono::Duration::days(days))
    }

    /// Whole days from this date until `other` (negative if `other` is earlier).
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDate::parse(s)
    }
}

/// Normalize heterogeneous date input to a CalendarDate.
///
/// A canonical `YYYY-MM-DD` string passes through unchanged. A timestamped
/// instant (RFC 3339) is converted using the calendar fields of the
/// reference timezone, not a bare UTC conversion: when the reference zone
/// is ahead of UTC, a UTC conversion shifts dates near midnight by one day.
pub fn to_calendar_date(input: &str, reference: FixedOffset) -> Result<CalendarDate, DateError> {
    if let Ok(date) = CalendarDate::parse(input) {
        return Ok(date);
    }
    let instant = DateTime::parse_from_rfc3339(input)
        .map_err(|_| DateError::InvalidDate(input.to_string()))?;
    Ok(CalendarDate(instant.with_timezone(&reference).date_naive()))
}

/// A wall-clock time of day in the reference timezone, `HH:mm` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Create a TimeOfDay from hours and minutes.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    /// Parse an `HH:mm` string.
    pub fn parse(s: &str) -> Result<Self, DateError> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(TimeOfDay)
            .map_err(|_| DateError::InvalidTime(s.to_string()))
    }

    /// Get the underlying NaiveTime.
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s)
    }
}

//! Calendar dates, clock times, and the slot overlap predicate.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::SchedulingError;
use crate::domain::foundation::ValidationError;

/// Minimum session length in minutes.
pub const MIN_SESSION_MINUTES: u16 = 30;

/// A wall-clock time within one day, stored as minutes since midnight.
///
/// Parsed from 24-hour `HH:MM` strings; all interval arithmetic happens on
/// the minute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(u16);

impl ClockTime {
    /// Creates a clock time from minutes since midnight.
    pub fn from_minutes(minutes: u16) -> Result<Self, ValidationError> {
        if minutes >= 24 * 60 {
            return Err(ValidationError::out_of_range(
                "time",
                0,
                24 * 60 - 1,
                minutes as i32,
            ));
        }
        Ok(Self(minutes))
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ValidationError::invalid_format("time", format!("expected HH:MM, got '{s}'"));
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(bad());
        }
        let hours: u16 = h.parse().map_err(|_| bad())?;
        let minutes: u16 = m.parse().map_err(|_| bad())?;
        if hours >= 24 || minutes >= 60 {
            return Err(bad());
        }
        Ok(Self(hours * 60 + minutes))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ClockTime> for String {
    fn from(t: ClockTime) -> String {
        t.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// A calendar date (`YYYY-MM-DD`), the granularity at which conflicts exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionDate(NaiveDate);

impl SessionDate {
    /// Today's date in UTC.
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// True if this date is strictly before `other`.
    pub fn is_before(&self, other: &SessionDate) -> bool {
        self.0 < other.0
    }
}

impl FromStr for SessionDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| {
                ValidationError::invalid_format("date", format!("expected YYYY-MM-DD, got '{s}'"))
            })
    }
}

impl TryFrom<String> for SessionDate {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SessionDate> for String {
    fn from(d: SessionDate) -> String {
        d.to_string()
    }
}

impl fmt::Display for SessionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// A dated, half-open time interval `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    date: SessionDate,
    start: ClockTime,
    end: ClockTime,
}

impl TimeSlot {
    /// Builds a slot, enforcing the minimum duration.
    ///
    /// # Errors
    ///
    /// - `InvalidDuration` if the slot runs shorter than
    ///   [`MIN_SESSION_MINUTES`] (which also rules out `end <= start`)
    pub fn new(date: SessionDate, start: ClockTime, end: ClockTime) -> Result<Self, SchedulingError> {
        if end.minutes() < start.minutes() + MIN_SESSION_MINUTES {
            return Err(SchedulingError::InvalidDuration);
        }
        Ok(Self { date, start, end })
    }

    pub fn date(&self) -> SessionDate {
        self.date
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    /// Slot length in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes() - self.start.minutes()
    }

    /// Strict half-open interval intersection on the same calendar date.
    ///
    /// Back-to-back slots (one ending exactly when the other starts) do
    /// not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date
            && self.start.minutes() < other.end.minutes()
            && other.start.minutes() < self.end.minutes()
    }
}

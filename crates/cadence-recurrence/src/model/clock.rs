//! Wall-clock time of day and start/end windows.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};

/// Time of day with minute precision and no timezone.
///
/// Serialized as a 24-hour `HH:MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Const constructor for fixed times.
    ///
    /// ## Panics
    ///
    /// Panics if hour or minute is out of range; in a const context this is a
    /// compile error instead.
    #[must_use]
    pub const fn hm(hour: u32, minute: u32) -> Self {
        match NaiveTime::from_hms_opt(hour, minute, 0) {
            Some(time) => Self(time),
            None => panic!("hour or minute out of range"),
        }
    }

    /// Creates a time from hour and minute, `None` if out of range.
    #[must_use]
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Truncates a `NaiveTime` to minute precision.
    #[must_use]
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }

    #[must_use]
    pub const fn as_naive(self) -> NaiveTime {
        self.0
    }

    #[must_use]
    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    #[must_use]
    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    /// Minutes elapsed since midnight.
    #[must_use]
    pub fn minutes_from_midnight(self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Adds minutes, wrapping past midnight.
    #[must_use]
    pub fn wrapping_add_minutes(self, minutes: i64) -> Self {
        let (time, _) = self
            .0
            .overflowing_add_signed(chrono::TimeDelta::minutes(minutes));
        Self(time)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for ClockTime {
    type Err = RecurrenceError;

    /// Parses `HH:MM` or `HH:MM:SS` (seconds are dropped). Single-digit hours are accepted.
    fn from_str(s: &str) -> RecurrenceResult<Self> {
        let trimmed = s.trim();
        NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map(Self::from_naive)
            .map_err(|e| RecurrenceError::InvalidTime(format!("{trimmed:?}: {e}")))
    }
}

impl TryFrom<String> for ClockTime {
    type Error = RecurrenceError;

    fn try_from(value: String) -> RecurrenceResult<Self> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// A start/end pair, the `times` object of the persisted representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl TimeWindow {
    #[must_use]
    pub const fn new(start_time: ClockTime, end_time: ClockTime) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// ## Summary
    /// Parses a window from two `HH:MM` strings.
    ///
    /// ## Errors
    /// Returns `RecurrenceError::InvalidTime` if either side fails to parse.
    pub fn parse(start: &str, end: &str) -> RecurrenceResult<Self> {
        Ok(Self::new(start.parse()?, end.parse()?))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{RecurrenceError, RecurrenceResult};
use crate::model::{ClockTime, parse_local_date};

/// A date or time field as it arrives from storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleValue {
    /// Milliseconds since the Unix epoch.
    Integer(i64),
    /// Milliseconds since the Unix epoch, from serializers that emit floats.
    Float(f64),
    /// `YYYY-MM-DD`, `HH:MM`, an ISO datetime, or a timestamp as digits.
    Text(String),
    /// Any other JSON shape. Never readable as a date or time, so only the
    /// record carrying it is dropped.
    Other(serde_json::Value),
}

impl FlexibleValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Milliseconds since the epoch if this value is, or spells, a timestamp.
    fn as_timestamp_millis(&self) -> Option<i64> {
        match self {
            Self::Integer(ms) => Some(*ms),
            Self::Float(ms) => float_millis(*ms),
            Self::Text(s) => {
                let digits = s.trim();
                let unsigned = digits.strip_prefix('-').unwrap_or(digits);
                (!unsigned.is_empty() && unsigned.bytes().all(|b| b.is_ascii_digit()))
                    .then(|| digits.parse().ok())
                    .flatten()
            }
            Self::Other(_) => None,
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Timestamps are whole milliseconds; the fractional part carries no date or minute information"
)]
fn float_millis(ms: f64) -> Option<i64> {
    (ms.is_finite() && ms.abs() < 9.0e15).then(|| ms.trunc() as i64)
}

impl fmt::Display for FlexibleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for FlexibleValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<NaiveDate> for FlexibleValue {
    fn from(value: NaiveDate) -> Self {
        Self::Text(crate::model::format_local_date(value))
    }
}

impl From<ClockTime> for FlexibleValue {
    fn from(value: ClockTime) -> Self {
        Self::Text(value.to_string())
    }
}

fn instant_from_millis(ms: i64, raw: &FlexibleValue) -> RecurrenceResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| RecurrenceError::InvalidDate(format!("timestamp out of range: {raw}")))
}

/// ## Summary
/// Resolves a stored date field to a calendar date.
///
/// Timestamps (numbers or numeric strings) are read as UTC instants and take
/// their UTC day, so the stored day never drifts with the local zone. Text
/// values use their date portion, ignoring any time or offset after it.
///
/// ## Errors
/// Returns `RecurrenceError::InvalidDate` if no calendar date can be read.
pub fn parse_flexible_date(value: &FlexibleValue) -> RecurrenceResult<NaiveDate> {
    if let Some(ms) = value.as_timestamp_millis() {
        return Ok(instant_from_millis(ms, value)?.date_naive());
    }

    match value {
        FlexibleValue::Text(s) => {
            let date_part = s.trim().split(['T', ' ']).next().unwrap_or_default();
            parse_local_date(date_part)
        }
        FlexibleValue::Integer(_) | FlexibleValue::Float(_) | FlexibleValue::Other(_) => {
            Err(RecurrenceError::InvalidDate(value.to_string()))
        }
    }
}

/// ## Summary
/// Resolves a stored time field to a time of day.
///
/// `HH:MM` strings are used as they are. For ISO datetimes and timestamps the
/// local time of day is taken in `timezone` when one is given; otherwise an
/// ISO datetime keeps the wall-clock time written in it and a timestamp uses UTC.
///
/// ## Errors
/// Returns `RecurrenceError::InvalidTime` if no time of day can be read.
pub fn parse_flexible_time(
    value: &FlexibleValue,
    timezone: Option<Tz>,
) -> RecurrenceResult<ClockTime> {
    if let Some(ms) = value.as_timestamp_millis() {
        let instant = instant_from_millis(ms, value)
            .map_err(|_e| RecurrenceError::InvalidTime(value.to_string()))?;
        let time = match timezone {
            Some(tz) => instant.with_timezone(&tz).time(),
            None => instant.time(),
        };
        return Ok(ClockTime::from_naive(time));
    }

    let FlexibleValue::Text(raw) = value else {
        return Err(RecurrenceError::InvalidTime(value.to_string()));
    };
    let raw = raw.trim();

    if let Ok(time) = raw.parse::<ClockTime>() {
        return Ok(time);
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        let time = match timezone {
            Some(tz) => with_offset.with_timezone(&tz).time(),
            None => with_offset.naive_local().time(),
        };
        return Ok(ClockTime::from_naive(time));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| ClockTime::from_naive(naive.time()))
        .ok_or_else(|| RecurrenceError::InvalidTime(raw.to_string()))
}

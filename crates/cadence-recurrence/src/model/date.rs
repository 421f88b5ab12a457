//! Concrete calendar dates and local-date arithmetic.
//!
//! Dates are always `NaiveDate`s: parsed and formatted as local calendar days,
//! never through an instant, so a date cannot slide across a timezone boundary.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, TimeDelta, Weekday as ChronoWeekday};
use serde::{Deserialize, Serialize};

use super::{ClockTime, TimeSlot, TimeWindow, new_id};
use crate::error::{RecurrenceError, RecurrenceResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a concrete date was produced. Provenance only; a date is always a single occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeats {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl Repeats {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Once => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Repeats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calendar date of an event with its time slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDate {
    #[serde(default = "new_id")]
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub repeats: Repeats,
    pub time_slots: Vec<TimeSlot>,
}

impl RecurringDate {
    #[must_use]
    pub fn new(date: NaiveDate, repeats: Repeats, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            id: new_id(),
            date,
            repeats,
            time_slots,
        }
    }

    /// A date with exactly one slot covering `window`.
    #[must_use]
    pub fn single(date: NaiveDate, repeats: Repeats, window: TimeWindow) -> Self {
        Self::new(date, repeats, vec![TimeSlot::from_window(window)])
    }

    #[must_use]
    pub fn weekday(&self) -> ChronoWeekday {
        self.date.weekday()
    }
}

/// One row of the explicit-dates representation: a date and one slot's times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDate {
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl EventDate {
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }
}

/// ## Summary
/// Parses a `YYYY-MM-DD` string as a local calendar date.
///
/// ## Errors
/// Returns `RecurrenceError::InvalidDate` if the string is not a valid date.
pub fn parse_local_date(value: &str) -> RecurrenceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| RecurrenceError::InvalidDate(format!("{value:?}: {e}")))
}

#[must_use]
pub fn format_local_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// 1-based occurrence of the date's weekday within its month (the 8th is the 2nd of its weekday).
#[must_use]
pub fn weekday_position(date: NaiveDate) -> u32 {
    (date.day() - 1) / 7 + 1
}

#[must_use]
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_months(Months::new(1))?.pred_opt()
}

/// ## Summary
/// Finds the `ordinal`-th `weekday` of a month.
///
/// Positive ordinals count from the start of the month (`1` is the first),
/// negative ones from the end (`-1` is the last). Returns `None` for `0` or
/// when the month has no such occurrence, e.g. a fifth Monday.
#[must_use]
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: ChronoWeekday,
    ordinal: i8,
) -> Option<NaiveDate> {
    match ordinal {
        0 => None,
        n if n > 0 => NaiveDate::from_weekday_of_month_opt(year, month, weekday, n.unsigned_abs()),
        n => {
            let last = last_day_of_month(year, month)?;
            let back = (7 + last.weekday().num_days_from_monday()
                - weekday.num_days_from_monday())
                % 7;
            let weeks_back = u32::from(n.unsigned_abs()) - 1;
            let date = last - TimeDelta::days(i64::from(back + weeks_back * 7));
            (date.month() == month).then_some(date)
        }
    }
}

/// Adds whole months, clamping to the last day when the target month is shorter.
#[must_use]
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

//! Persisted recurrence fields of an event, as loosely typed as they are stored.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::flexible::{FlexibleValue, parse_flexible_date, parse_flexible_time};
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::model::{
    ClockTime, EventDate, Frequency, RecurringPattern, RulePattern, TimeWindow, Weekday,
    WeekdayNum,
};

const FALLBACK_SLOT_MINUTES: i64 = 60;

/// The recurrence fields of a stored event. At most one form is expected to be
/// populated; the expander tries explicit dates, then the simple pattern, then
/// the rule pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecurrence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_dates: Option<Vec<RawEventDate>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_start: Option<FlexibleValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_end: Option<FlexibleValue>,

    /// Shared times; only the first entry is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<RawTimes>>,

    /// Older records store this under `rrule`.
    #[serde(default, alias = "rrule", skip_serializing_if = "Option::is_none")]
    pub rrule_pattern: Option<RawRulePattern>,
}

impl PersistedRecurrence {
    /// Whether the explicit-dates form is present with at least one row.
    #[must_use]
    pub fn has_event_dates(&self) -> bool {
        self.event_dates.as_ref().is_some_and(|rows| !rows.is_empty())
    }

    /// Whether all three simple-pattern fields are present.
    #[must_use]
    pub fn has_recurring_pattern(&self) -> bool {
        self.recurring_pattern.is_some()
            && self.recurring_start.is_some()
            && self.recurring_end.is_some()
    }

    /// ## Summary
    /// Resolves the shared time window from the first `times` entry.
    ///
    /// Missing or unusable times fall back as described on [`resolve_window`].
    #[must_use]
    pub fn shared_window(&self, default: TimeWindow, timezone: Option<Tz>) -> TimeWindow {
        match self.times.as_deref().and_then(<[RawTimes]>::first) {
            Some(times) => resolve_window(
                times.start_time.as_ref(),
                times.end_time.as_ref(),
                default,
                timezone,
            ),
            None => default,
        }
    }
}

/// One explicit date row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventDate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<FlexibleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<FlexibleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<FlexibleValue>,
}

impl RawEventDate {
    /// ## Summary
    /// Resolves the row to a typed explicit date.
    ///
    /// ## Errors
    /// Returns `RecurrenceError::InvalidDate` if the date is missing or unreadable.
    /// Times never fail; they fall back as described on [`resolve_window`].
    pub fn resolve(&self, default: TimeWindow, timezone: Option<Tz>) -> RecurrenceResult<EventDate> {
        let raw_date = self
            .date
            .as_ref()
            .ok_or_else(|| RecurrenceError::InvalidDate("missing date".to_string()))?;
        let date = parse_flexible_date(raw_date)?;
        let window = resolve_window(
            self.start_time.as_ref(),
            self.end_time.as_ref(),
            default,
            timezone,
        );

        Ok(EventDate {
            date,
            start_time: window.start_time,
            end_time: window.end_time,
        })
    }
}

impl From<&EventDate> for RawEventDate {
    fn from(value: &EventDate) -> Self {
        Self {
            date: Some(value.date.into()),
            start_time: Some(value.start_time.into()),
            end_time: Some(value.end_time.into()),
        }
    }
}

/// An entry of the shared `times` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTimes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<FlexibleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<FlexibleValue>,
}

impl From<TimeWindow> for RawTimes {
    fn from(value: TimeWindow) -> Self {
        Self {
            start_time: Some(value.start_time.into()),
            end_time: Some(value.end_time.into()),
        }
    }
}

/// A stored rule pattern before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRulePattern {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtstart: Option<FlexibleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<FlexibleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// `MO`, `2TU`, `-1FR`, or numeric weekdays with Monday as 0.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub byweekday: Vec<FlexibleValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bymonthday: Vec<i8>,
}

impl RawRulePattern {
    /// ## Summary
    /// Validates the stored rule into a bounded [`RulePattern`].
    ///
    /// Unreadable weekday entries are skipped with a warning.
    ///
    /// ## Errors
    /// Returns an error if `freq` is missing or unknown, or if `dtstart` or
    /// `until` is missing or unreadable: an unbounded rule cannot be expanded.
    pub fn resolve(&self) -> RecurrenceResult<RulePattern> {
        let freq_text = self
            .freq
            .as_deref()
            .ok_or_else(|| RecurrenceError::Unsupported("rule without freq".to_string()))?;
        let freq = Frequency::parse(freq_text)
            .ok_or_else(|| RecurrenceError::Unsupported(format!("frequency {freq_text:?}")))?;

        let dtstart = self
            .dtstart
            .as_ref()
            .ok_or_else(|| RecurrenceError::InvalidDate("rule without dtstart".to_string()))
            .and_then(parse_flexible_date)?;
        let until = self
            .until
            .as_ref()
            .ok_or_else(|| RecurrenceError::InvalidDate("rule without until".to_string()))
            .and_then(parse_flexible_date)?;

        let byweekday = self
            .byweekday
            .iter()
            .filter_map(|raw| match parse_weekday_num(raw) {
                Ok(day) => Some(day),
                Err(e) => {
                    tracing::warn!(weekday = %raw, error = %e, "Skipping unreadable byweekday entry");
                    None
                }
            })
            .collect();

        Ok(RulePattern {
            freq,
            dtstart,
            until,
            interval: self.interval,
            byweekday,
            bymonthday: self.bymonthday.clone(),
        })
    }
}

impl From<&RulePattern> for RawRulePattern {
    fn from(value: &RulePattern) -> Self {
        Self {
            freq: Some(value.freq.to_string()),
            dtstart: Some(value.dtstart.into()),
            until: Some(value.until.into()),
            interval: value.interval,
            byweekday: value
                .byweekday
                .iter()
                .map(|day| FlexibleValue::Text(day.to_string()))
                .collect(),
            bymonthday: value.bymonthday.clone(),
        }
    }
}

fn parse_weekday_num(raw: &FlexibleValue) -> RecurrenceResult<WeekdayNum> {
    match raw {
        FlexibleValue::Text(s) => s.parse(),
        FlexibleValue::Integer(n) => {
            // Monday-based numbering: 0 = MO .. 6 = SU
            let index = usize::try_from(*n)
                .ok()
                .filter(|&i| i < 7)
                .ok_or_else(|| RecurrenceError::InvalidWeekday(n.to_string()))?;
            let sunday_first = (index + 1) % 7;
            Ok(WeekdayNum::every(Weekday::all()[sunday_first]))
        }
        FlexibleValue::Float(_) | FlexibleValue::Other(_) => {
            Err(RecurrenceError::InvalidWeekday(raw.to_string()))
        }
    }
}

/// Parses a stored simple-pattern name.
pub(crate) fn parse_recurring_pattern(raw: &str) -> RecurrenceResult<RecurringPattern> {
    RecurringPattern::parse(raw)
        .ok_or_else(|| RecurrenceError::Unsupported(format!("pattern {raw:?}")))
}

/// ## Summary
/// Resolves optional start/end fields to a window.
///
/// Both missing or unreadable: `default`. Only one readable: the other side is
/// placed one hour away from it. Unreadable values are logged.
#[must_use]
pub fn resolve_window(
    start: Option<&FlexibleValue>,
    end: Option<&FlexibleValue>,
    default: TimeWindow,
    timezone: Option<Tz>,
) -> TimeWindow {
    let start = start.and_then(|raw| read_time(raw, timezone));
    let end = end.and_then(|raw| read_time(raw, timezone));

    match (start, end) {
        (Some(start), Some(end)) => TimeWindow::new(start, end),
        (Some(start), None) => {
            TimeWindow::new(start, start.wrapping_add_minutes(FALLBACK_SLOT_MINUTES))
        }
        (None, Some(end)) => {
            TimeWindow::new(end.wrapping_add_minutes(-FALLBACK_SLOT_MINUTES), end)
        }
        (None, None) => default,
    }
}

fn read_time(raw: &FlexibleValue, timezone: Option<Tz>) -> Option<ClockTime> {
    parse_flexible_time(raw, timezone)
        .inspect_err(|e| tracing::warn!(time = %raw, error = %e, "Ignoring unreadable time"))
        .ok()
}

//! UI form to API form: pick the most compact representation that round-trips.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::detect::{check_time_consistency, detect_recurring_pattern_type, week_interval};
use crate::model::{
    EventDate, PatternKind, RecurringDate, RecurringPattern, Repeats, RulePattern, TimeWindow,
    Weekday,
};
use crate::parse::{PersistedRecurrence, RawEventDate, RawRulePattern, RawTimes};

/// Which representation a [`TransformationResult`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageMode {
    /// Nothing to store.
    None,
    EventDates,
    RecurringPattern,
    RRule,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::EventDates => "eventDates",
            Self::RecurringPattern => "recurringPattern",
            Self::RRule => "rrule",
        })
    }
}

/// Result of [`compress`], in the wire shape the event API expects.
///
/// At most one of the `use_*` flags is set, and only the fields of that form are populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    pub use_event_dates: bool,
    pub use_recurring_pattern: bool,
    #[serde(rename = "useRRule")]
    pub use_rrule: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_dates: Option<Vec<EventDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<RecurringPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Shared times of the pattern and rule forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<TimeWindow>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule_pattern: Option<RulePattern>,
}

impl TransformationResult {
    fn event_dates(records: Vec<EventDate>) -> Self {
        Self {
            use_event_dates: true,
            event_dates: Some(records),
            ..Self::default()
        }
    }

    fn recurring_pattern(
        pattern: RecurringPattern,
        start_date: NaiveDate,
        end_date: NaiveDate,
        times: TimeWindow,
    ) -> Self {
        Self {
            use_recurring_pattern: true,
            pattern: Some(pattern),
            start_date: Some(start_date),
            end_date: Some(end_date),
            times: Some(times),
            ..Self::default()
        }
    }

    fn rrule(rule: RulePattern, times: TimeWindow) -> Self {
        Self {
            use_rrule: true,
            times: Some(times),
            rrule_pattern: Some(rule),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn mode(&self) -> StorageMode {
        if self.use_event_dates {
            StorageMode::EventDates
        } else if self.use_recurring_pattern {
            StorageMode::RecurringPattern
        } else if self.use_rrule {
            StorageMode::RRule
        } else {
            StorageMode::None
        }
    }
}

impl From<&TransformationResult> for PersistedRecurrence {
    fn from(result: &TransformationResult) -> Self {
        let times = result.times.map(|window| vec![RawTimes::from(window)]);

        match result.mode() {
            StorageMode::None => Self::default(),
            StorageMode::EventDates => Self {
                event_dates: result
                    .event_dates
                    .as_ref()
                    .map(|rows| rows.iter().map(RawEventDate::from).collect()),
                ..Self::default()
            },
            StorageMode::RecurringPattern => Self {
                recurring_pattern: result.pattern.map(|p| p.as_str().to_string()),
                recurring_start: result.start_date.map(Into::into),
                recurring_end: result.end_date.map(Into::into),
                times,
                ..Self::default()
            },
            StorageMode::RRule => Self {
                rrule_pattern: result.rrule_pattern.as_ref().map(RawRulePattern::from),
                times,
                ..Self::default()
            },
        }
    }
}

/// ## Summary
/// Compresses an edited date list into its most compact lossless form.
///
/// First applicable branch wins:
/// 1. no dates: nothing to store
/// 2. times differ between dates, or a date has zero or several slots: explicit dates
/// 3. every date was added by hand (`once`): explicit dates, even if they look regular
/// 4. no recognizable pattern: explicit dates
/// 5. `daily`, `monthly` and single-weekday `weekly`: simple pattern;
///    `weekly` on several weekdays: rule pattern with the sorted distinct
///    weekdays and, when the weeks are evenly several apart, an interval
#[must_use]
pub fn compress(dates: &[RecurringDate]) -> TransformationResult {
    if dates.is_empty() {
        tracing::debug!("No dates to compress");
        return TransformationResult::default();
    }

    let consistency = check_time_consistency(dates);
    let times = match consistency.common_time_slot {
        Some(times) if consistency.is_consistent => times,
        _ => {
            tracing::debug!(reason = %consistency.reason, "Times inconsistent, storing explicit dates");
            return TransformationResult::event_dates(flatten(dates));
        }
    };

    if dates.iter().all(|d| d.repeats == Repeats::Once) {
        tracing::debug!("All dates added individually, storing explicit dates");
        return TransformationResult::event_dates(flatten(dates));
    }

    let kind = detect_recurring_pattern_type(dates);
    let Some(pattern) = kind.as_recurring() else {
        tracing::debug!("No recurring pattern, storing explicit dates");
        return TransformationResult::event_dates(flatten(dates));
    };

    let mut sorted: Vec<NaiveDate> = dates.iter().map(|d| d.date).collect();
    sorted.sort_unstable();
    let (start_date, end_date) = (sorted[0], sorted[sorted.len() - 1]);

    if kind == PatternKind::Weekly {
        let weekdays: BTreeSet<Weekday> = sorted.iter().map(|d| Weekday::from(d.weekday())).collect();

        if weekdays.len() > 1 {
            let weekdays: Vec<Weekday> = weekdays.into_iter().collect();
            let mut rule = RulePattern::weekly(start_date, end_date, &weekdays);
            if let Some(interval) = week_interval(&sorted).filter(|&n| n > 1) {
                rule = rule.with_interval(interval);
            }
            tracing::debug!(rule = %rule, "Storing weekly rule pattern");
            return TransformationResult::rrule(rule, times);
        }
    }

    tracing::debug!(
        pattern = %pattern,
        start = %start_date,
        end = %end_date,
        "Storing simple recurring pattern"
    );
    TransformationResult::recurring_pattern(pattern, start_date, end_date, times)
}

/// One record per slot per date, ascending by date. Slot order within a date is kept.
fn flatten(dates: &[RecurringDate]) -> Vec<EventDate> {
    let mut records: Vec<EventDate> = dates
        .iter()
        .flat_map(|d| {
            d.time_slots.iter().map(|slot| EventDate {
                date: d.date,
                start_time: slot.start_time,
                end_time: slot.end_time,
            })
        })
        .collect();
    records.sort_by_key(|record| record.date);
    records
}

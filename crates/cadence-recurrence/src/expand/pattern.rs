use chrono::{NaiveDate, TimeDelta};

use crate::error::{RecurrenceError, RecurrenceResult};
use crate::model::{ExpansionOptions, RecurringDate, RecurringPattern, add_months_clamped};
use crate::parse::{
    FlexibleValue, PersistedRecurrence, parse_flexible_date, parse_recurring_pattern,
};

/// Steps from `recurringStart` to `recurringEnd` inclusive, one date per step,
/// all sharing the first `times` entry.
pub(super) fn expand_simple_pattern(
    persisted: &PersistedRecurrence,
    options: &ExpansionOptions,
) -> Vec<RecurringDate> {
    let (pattern, start, end) = match resolve_bounds(persisted) {
        Ok(bounds) => bounds,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot expand simple pattern");
            return Vec::new();
        }
    };

    let window = persisted.shared_window(options.default_window, options.timezone);
    step_dates(pattern, start, end, options.max_occurrences.saturating_add(1))
        .into_iter()
        .map(|date| RecurringDate::single(date, pattern.repeats(), window))
        .collect()
}

fn resolve_bounds(
    persisted: &PersistedRecurrence,
) -> RecurrenceResult<(RecurringPattern, NaiveDate, NaiveDate)> {
    let pattern = parse_recurring_pattern(persisted.recurring_pattern.as_deref().unwrap_or_default())?;
    let start = read_bound(persisted.recurring_start.as_ref(), "recurringStart")?;
    let end = read_bound(persisted.recurring_end.as_ref(), "recurringEnd")?;
    Ok((pattern, start, end))
}

fn read_bound(value: Option<&FlexibleValue>, field: &str) -> RecurrenceResult<NaiveDate> {
    value
        .ok_or_else(|| RecurrenceError::InvalidDate(format!("missing {field}")))
        .and_then(parse_flexible_date)
}

/// Dates from `start` to `end` inclusive, at most `limit` of them. Monthly
/// steps are taken from `start` so a clamped month does not shift later ones.
fn step_dates(
    pattern: RecurringPattern,
    start: NaiveDate,
    end: NaiveDate,
    limit: usize,
) -> Vec<NaiveDate> {
    (0_u32..)
        .map_while(|n| match pattern {
            RecurringPattern::Daily => start.checked_add_signed(TimeDelta::days(i64::from(n))),
            RecurringPattern::Weekly => start.checked_add_signed(TimeDelta::weeks(i64::from(n))),
            RecurringPattern::Monthly => add_months_clamped(start, n),
        })
        .take_while(|date| *date <= end)
        .take(limit)
        .collect()
}

use chrono::{Datelike, Months, NaiveDate};
use rrule::RRuleSet;

use crate::error::RecurrenceResult;
use crate::model::{
    ExpansionOptions, Frequency, RecurringDate, RulePattern, TimeWindow, WeekdayNum,
    nth_weekday_of_month,
};
use crate::parse::RawRulePattern;

/// Expands a bounded rule. Unbounded or unsupported rules yield nothing.
pub(super) fn expand_rule_pattern(
    raw: &RawRulePattern,
    window: TimeWindow,
    options: &ExpansionOptions,
) -> Vec<RecurringDate> {
    let rule = match raw.resolve() {
        Ok(rule) => rule,
        Err(e) => {
            tracing::warn!(error = %e, "Cannot expand rule pattern");
            return Vec::new();
        }
    };

    if rule.until < rule.dtstart {
        tracing::debug!(dtstart = %rule.dtstart, until = %rule.until, "Rule ends before it starts");
        return Vec::new();
    }

    let limit = options.max_occurrences.saturating_add(1);
    let dates = match occurrence_dates(&rule, limit) {
        Ok(dates) => dates,
        Err(e) => {
            tracing::warn!(rule = %rule, error = %e, "Rule expansion failed");
            return Vec::new();
        }
    };

    let repeats = rule.freq.repeats();
    dates
        .into_iter()
        .map(|date| RecurringDate::single(date, repeats, window))
        .collect()
}

/// ## Summary
/// Concrete dates of a bounded rule, ascending, at most `limit` of them.
///
/// `MONTHLY` with weekdays walks the months directly, honoring ordinals such
/// as `2TU` or `-1FR`; a plain weekday means its first occurrence in the month.
/// `DAILY` (stepping by interval, ignoring by-lists), `WEEKLY` and `MONTHLY`
/// by month day go through `rrule`, which skips months lacking the requested
/// day instead of clamping.
///
/// ## Errors
/// Returns an error if `rrule` rejects the rendered rule.
fn occurrence_dates(rule: &RulePattern, limit: usize) -> RecurrenceResult<Vec<NaiveDate>> {
    match rule.freq {
        Frequency::Monthly if rule.bymonthday.is_empty() && !rule.byweekday.is_empty() => {
            Ok(monthly_by_weekday(rule, limit))
        }
        Frequency::Monthly => {
            expand_with_rrule(&rule.clone().with_byweekday(Vec::new()), limit)
        }
        // Daily rules step by interval only; weekday and month-day filters do not apply.
        Frequency::Daily => expand_with_rrule(
            &rule
                .clone()
                .with_byweekday(Vec::new())
                .with_bymonthday(Vec::new()),
            limit,
        ),
        Frequency::Weekly => {
            // Ordinals are only meaningful within a month.
            let byweekday = rule
                .byweekday
                .iter()
                .copied()
                .map(WeekdayNum::without_ordinal)
                .collect();
            expand_with_rrule(&rule.clone().with_byweekday(byweekday), limit)
        }
        other => {
            tracing::warn!(freq = %other, "Unsupported rule frequency");
            Ok(Vec::new())
        }
    }
}

fn expand_with_rrule(rule: &RulePattern, limit: usize) -> RecurrenceResult<Vec<NaiveDate>> {
    let text = rule.to_rrule_set_text();
    tracing::trace!(rrule = %text, "Expanding with rrule");

    let set: RRuleSet = text.parse()?;
    let result = set.all(rrule_limit(limit));
    if result.limited {
        tracing::trace!(limit, "rrule expansion limited");
    }

    Ok(result.dates.iter().map(chrono::DateTime::date_naive).collect())
}

/// `rrule` takes a `u16` limit; larger caps are clamped with a warning.
fn rrule_limit(limit: usize) -> u16 {
    u16::try_from(limit).unwrap_or_else(|_e| {
        tracing::warn!(
            limit,
            clamped = u16::MAX,
            "Occurrence limit exceeds what rrule can expand, clamping"
        );
        u16::MAX
    })
}

fn monthly_by_weekday(rule: &RulePattern, limit: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let Some(mut month) = rule.dtstart.with_day(1) else {
        return dates;
    };

    while month <= rule.until && dates.len() < limit {
        let mut in_month: Vec<NaiveDate> = rule
            .byweekday
            .iter()
            .filter_map(|day| {
                nth_weekday_of_month(
                    month.year(),
                    month.month(),
                    day.weekday.to_chrono(),
                    day.ordinal.unwrap_or(1),
                )
            })
            .filter(|date| (rule.dtstart..=rule.until).contains(date))
            .collect();
        in_month.sort_unstable();
        in_month.dedup();
        dates.extend(in_month);

        let Some(next) = month.checked_add_months(Months::new(rule.step())) else {
            break;
        };
        month = next;
    }

    dates.truncate(limit);
    dates
}

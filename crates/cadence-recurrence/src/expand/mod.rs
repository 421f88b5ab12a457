//! API form to UI form: rebuild the concrete date list from a stored recurrence.

mod explicit;
mod pattern;
mod rule;

use crate::model::{ExpansionOptions, RecurringDate};
use crate::parse::PersistedRecurrence;

/// ## Summary
/// Expands a stored recurrence with default options.
///
/// See [`expand_with_options`].
#[must_use]
pub fn expand(persisted: &PersistedRecurrence) -> Vec<RecurringDate> {
    expand_with_options(persisted, &ExpansionOptions::default())
}

/// ## Summary
/// Expands a stored recurrence into concrete dates.
///
/// Forms are tried in order: explicit dates, simple pattern, rule pattern.
/// The first one present decides the result, even if it yields nothing.
/// Malformed input is logged and produces fewer or no dates; this never fails.
/// The output stops at `options.max_occurrences`.
#[must_use]
pub fn expand_with_options(
    persisted: &PersistedRecurrence,
    options: &ExpansionOptions,
) -> Vec<RecurringDate> {
    let dates = if let Some(rows) = persisted.event_dates.as_deref().filter(|rows| !rows.is_empty())
    {
        tracing::trace!(rows = rows.len(), "Expanding explicit dates");
        explicit::expand_event_dates(rows, options)
    } else if persisted.has_recurring_pattern() {
        tracing::trace!("Expanding simple pattern");
        pattern::expand_simple_pattern(persisted, options)
    } else if let Some(raw) = &persisted.rrule_pattern {
        tracing::trace!("Expanding rule pattern");
        let window = persisted.shared_window(options.default_window, options.timezone);
        rule::expand_rule_pattern(raw, window, options)
    } else {
        tracing::debug!("No recurrence fields present");
        Vec::new()
    };

    cap(dates, options.max_occurrences)
}

/// Truncates to `max` entries, warning when anything was dropped.
pub(crate) fn cap(mut dates: Vec<RecurringDate>, max: usize) -> Vec<RecurringDate> {
    if dates.len() > max {
        tracing::warn!(max, "Occurrence limit reached, truncating");
        dates.truncate(max);
    }
    dates
}

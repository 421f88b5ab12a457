use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{ExpansionOptions, RecurringDate, Repeats, TimeSlot};
use crate::parse::RawEventDate;

/// Rows sharing a date become one `once` date carrying their slots in input
/// order. Rows without a usable date are dropped.
pub(super) fn expand_event_dates(
    rows: &[RawEventDate],
    options: &ExpansionOptions,
) -> Vec<RecurringDate> {
    let mut by_date: BTreeMap<NaiveDate, Vec<TimeSlot>> = BTreeMap::new();

    for (index, row) in rows.iter().enumerate() {
        match row.resolve(options.default_window, options.timezone) {
            Ok(record) => by_date
                .entry(record.date)
                .or_default()
                .push(TimeSlot::from_window(record.window())),
            Err(e) => tracing::warn!(index, error = %e, "Dropping explicit date row"),
        }
    }

    by_date
        .into_iter()
        .map(|(date, slots)| RecurringDate::new(date, Repeats::Once, slots))
        .collect()
}

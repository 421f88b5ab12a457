use serde::Serialize;

use crate::model::{RecurringDate, TimeSlot, TimeWindow};

/// Outcome of [`check_time_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub is_consistent: bool,
    pub has_multiple_slots: bool,
    /// The slot every date shares, set only when consistent.
    pub common_time_slot: Option<TimeWindow>,
    pub reason: String,
}

impl ConsistencyReport {
    fn inconsistent(has_multiple_slots: bool, reason: String) -> Self {
        Self {
            is_consistent: false,
            has_multiple_slots,
            common_time_slot: None,
            reason,
        }
    }
}

/// ## Summary
/// Checks whether every date carries exactly one slot with identical times.
///
/// Rules in order, first match wins: no dates; a date with more than one
/// slot (duplicates included, slots are never deduplicated); a date with no
/// slot; a slot whose start/end differ from the first date's.
#[must_use]
pub fn check_time_consistency(dates: &[RecurringDate]) -> ConsistencyReport {
    let Some(first) = dates.first() else {
        return ConsistencyReport::inconsistent(false, "no dates".to_string());
    };

    if let Some(date) = dates.iter().find(|d| d.time_slots.len() > 1) {
        return ConsistencyReport::inconsistent(
            true,
            format!("{} has {} time slots", date.date, date.time_slots.len()),
        );
    }

    if let Some(date) = dates.iter().find(|d| d.time_slots.is_empty()) {
        return ConsistencyReport::inconsistent(false, format!("{} has no time slots", date.date));
    }

    let Some(common) = first.time_slots.first().map(TimeSlot::window) else {
        return ConsistencyReport::inconsistent(false, format!("{} has no time slots", first.date));
    };

    if let Some(date) = dates
        .iter()
        .find(|d| d.time_slots.first().map(TimeSlot::window) != Some(common))
    {
        return ConsistencyReport::inconsistent(
            false,
            format!("{} differs from {common}", date.date),
        );
    }

    ConsistencyReport {
        is_consistent: true,
        has_multiple_slots: false,
        common_time_slot: Some(common),
        reason: "all dates share one time slot".to_string(),
    }
}

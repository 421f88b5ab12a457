//! Occurrence generator: turns a recurrence request from the editor into concrete dates.

use std::collections::BTreeSet;

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::expand::cap;
use crate::model::{
    ExpansionOptions, RecurringDate, RecurringPattern, TimeSlot, TimeWindow, Weekday,
    add_months_clamped, nth_weekday_of_month,
};

/// How a monthly request picks its day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MonthlyRule {
    /// Same day of month as the start date, clamped in shorter months.
    #[default]
    DayOfMonth,
    /// `ordinal`-th `weekday` of each month; `1..=4`, or `-1` for the last one.
    Position { ordinal: i8, weekday: Weekday },
}

/// When a request stops producing dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecurrenceEnd {
    /// Last allowed date, inclusive.
    On(NaiveDate),
    /// Number of occurrences.
    After(u32),
}

/// A recurrence as entered in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub pattern: RecurringPattern,
    pub start_date: NaiveDate,
    pub end: RecurrenceEnd,

    /// Weekly only. Empty means the start date's weekday.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<Weekday>,

    /// Monthly only.
    #[serde(default)]
    pub monthly: MonthlyRule,

    /// Slots copied onto every date. Empty means the default window.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_slots: Vec<TimeWindow>,
}

impl GenerationRequest {
    /// Request with no weekday, monthly rule or slot template set.
    #[must_use]
    pub const fn new(pattern: RecurringPattern, start_date: NaiveDate, end: RecurrenceEnd) -> Self {
        Self {
            pattern,
            start_date,
            end,
            weekdays: Vec::new(),
            monthly: MonthlyRule::DayOfMonth,
            time_slots: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_weekdays(mut self, weekdays: &[Weekday]) -> Self {
        self.weekdays = weekdays.to_vec();
        self
    }

    #[must_use]
    pub const fn with_monthly(mut self, monthly: MonthlyRule) -> Self {
        self.monthly = monthly;
        self
    }

    #[must_use]
    pub fn with_time_slots(mut self, time_slots: Vec<TimeWindow>) -> Self {
        self.time_slots = time_slots;
        self
    }
}

/// ## Summary
/// Generates the concrete dates of a recurrence request.
///
/// Every date gets a fresh copy of the slot template and is tagged with the
/// request's pattern. Generation stops at the end date or occurrence count,
/// and never exceeds `options.max_occurrences`. An unusable monthly position
/// yields no dates.
#[must_use]
pub fn generate_recurring_dates(
    request: &GenerationRequest,
    options: &ExpansionOptions,
) -> Vec<RecurringDate> {
    let Some(candidates) = candidates(request) else {
        return Vec::new();
    };

    let limit = options.max_occurrences.saturating_add(1);
    let dates: Vec<NaiveDate> = match request.end {
        RecurrenceEnd::On(end) => candidates.take_while(|d| *d <= end).take(limit).collect(),
        RecurrenceEnd::After(count) => candidates
            .take(usize::try_from(count).unwrap_or(usize::MAX))
            .take(limit)
            .collect(),
    };
    tracing::debug!(
        pattern = %request.pattern,
        start = %request.start_date,
        count = dates.len(),
        "Generated recurring dates"
    );

    let template: Vec<TimeWindow> = if request.time_slots.is_empty() {
        vec![options.default_window]
    } else {
        request.time_slots.clone()
    };
    let repeats = request.pattern.repeats();

    let generated = dates
        .into_iter()
        .map(|date| {
            let slots = template.iter().copied().map(TimeSlot::from_window).collect();
            RecurringDate::new(date, repeats, slots)
        })
        .collect();
    cap(generated, options.max_occurrences)
}

/// Unbounded ascending candidates starting at the request's start date.
fn candidates(request: &GenerationRequest) -> Option<Box<dyn Iterator<Item = NaiveDate>>> {
    let start = request.start_date;

    let dates: Box<dyn Iterator<Item = NaiveDate>> = match (request.pattern, request.monthly) {
        (RecurringPattern::Daily, _) => Box::new(
            (0_i64..).map_while(move |n| start.checked_add_signed(TimeDelta::days(n))),
        ),
        (RecurringPattern::Weekly, _) => {
            let weekdays: BTreeSet<Weekday> = if request.weekdays.is_empty() {
                BTreeSet::from([Weekday::from(start.weekday())])
            } else {
                request.weekdays.iter().copied().collect()
            };
            Box::new(
                (0_i64..)
                    .map_while(move |n| start.checked_add_signed(TimeDelta::days(n)))
                    .filter(move |d| weekdays.contains(&Weekday::from(d.weekday()))),
            )
        }
        (RecurringPattern::Monthly, MonthlyRule::DayOfMonth) => {
            Box::new((0_u32..).map_while(move |n| add_months_clamped(start, n)))
        }
        (RecurringPattern::Monthly, MonthlyRule::Position { ordinal, weekday }) => {
            if !(1..=4).contains(&ordinal) && ordinal != -1 {
                tracing::warn!(ordinal, "Unsupported monthly position");
                return None;
            }
            let first = start.with_day(1)?;
            Box::new(
                (0_u32..)
                    .map_while(move |n| first.checked_add_months(Months::new(n)))
                    .filter_map(move |month| {
                        nth_weekday_of_month(
                            month.year(),
                            month.month(),
                            weekday.to_chrono(),
                            ordinal,
                        )
                    })
                    .filter(move |d| *d >= start),
            )
        }
    };
    Some(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClockTime, Repeats};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    fn days(dates: &[RecurringDate]) -> Vec<String> {
        dates.iter().map(|d| d.date.to_string()).collect()
    }

    fn generate(request: &GenerationRequest) -> Vec<RecurringDate> {
        generate_recurring_dates(request, &ExpansionOptions::default())
    }

    #[test_log::test]
    fn daily_until_end_date_inclusive() {
        let request = GenerationRequest::new(
            RecurringPattern::Daily,
            d("2025-01-30"),
            RecurrenceEnd::On(d("2025-02-02")),
        );
        let dates = generate(&request);

        assert_eq!(
            days(&dates),
            vec!["2025-01-30", "2025-01-31", "2025-02-01", "2025-02-02"]
        );
        assert!(dates.iter().all(|d| d.repeats == Repeats::Daily));
    }

    #[test_log::test]
    fn weekly_defaults_to_start_weekday() {
        let request = GenerationRequest::new(
            RecurringPattern::Weekly,
            d("2025-01-08"),
            RecurrenceEnd::After(3),
        );
        assert_eq!(
            days(&generate(&request)),
            vec!["2025-01-08", "2025-01-15", "2025-01-22"]
        );
    }

    #[test_log::test]
    fn weekly_multiple_weekdays() {
        let request = GenerationRequest::new(
            RecurringPattern::Weekly,
            d("2025-01-07"),
            RecurrenceEnd::On(d("2025-01-15")),
        )
        .with_weekdays(&[Weekday::Wednesday, Weekday::Monday]);

        assert_eq!(
            days(&generate(&request)),
            vec!["2025-01-08", "2025-01-13", "2025-01-15"]
        );
    }

    #[test_log::test]
    fn monthly_day_of_month_clamps_and_recovers() {
        let request = GenerationRequest::new(
            RecurringPattern::Monthly,
            d("2024-01-31"),
            RecurrenceEnd::After(4),
        );
        assert_eq!(
            days(&generate(&request)),
            vec!["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30"]
        );
    }

    #[test_log::test]
    fn monthly_position_skips_occurrence_before_start() {
        let request = GenerationRequest::new(
            RecurringPattern::Monthly,
            d("2025-01-10"),
            RecurrenceEnd::After(3),
        )
        .with_monthly(MonthlyRule::Position {
            ordinal: 1,
            weekday: Weekday::Tuesday,
        });

        assert_eq!(
            days(&generate(&request)),
            vec!["2025-02-04", "2025-03-04", "2025-04-01"]
        );
    }

    #[test_log::test]
    fn monthly_last_weekday() {
        let request = GenerationRequest::new(
            RecurringPattern::Monthly,
            d("2025-01-01"),
            RecurrenceEnd::On(d("2025-03-31")),
        )
        .with_monthly(MonthlyRule::Position {
            ordinal: -1,
            weekday: Weekday::Friday,
        });

        assert_eq!(
            days(&generate(&request)),
            vec!["2025-01-31", "2025-02-28", "2025-03-28"]
        );
    }

    #[test_log::test]
    fn fifth_position_is_rejected() {
        let request = GenerationRequest::new(
            RecurringPattern::Monthly,
            d("2025-01-01"),
            RecurrenceEnd::After(3),
        )
        .with_monthly(MonthlyRule::Position {
            ordinal: 5,
            weekday: Weekday::Monday,
        });
        assert!(generate(&request).is_empty());
    }

    #[test_log::test]
    fn slot_template_is_copied_with_fresh_ids() {
        let request = GenerationRequest::new(
            RecurringPattern::Daily,
            d("2025-01-06"),
            RecurrenceEnd::After(2),
        )
        .with_time_slots(vec![
            TimeWindow::new(ClockTime::hm(9, 0), ClockTime::hm(10, 0)),
            TimeWindow::new(ClockTime::hm(14, 0), ClockTime::hm(15, 30)),
        ]);
        let dates = generate(&request);

        assert_eq!(dates[0].time_slots.len(), 2);
        assert_eq!(dates[1].time_slots[1].duration, "1h 30m");
        assert_ne!(dates[0].time_slots[0].id, dates[1].time_slots[0].id);
        assert_ne!(dates[0].id, dates[1].id);
    }

    #[test_log::test]
    fn empty_template_uses_default_window() {
        let request = GenerationRequest::new(
            RecurringPattern::Daily,
            d("2025-01-06"),
            RecurrenceEnd::After(1),
        );
        let dates = generate(&request);
        assert_eq!(dates[0].time_slots[0].window().to_string(), "09:00-10:00");
    }

    #[test_log::test]
    fn generation_stops_at_max_occurrences() {
        let request = GenerationRequest::new(
            RecurringPattern::Daily,
            d("2025-01-01"),
            RecurrenceEnd::After(500),
        );
        let options = ExpansionOptions::default().with_max_occurrences(20);
        assert_eq!(generate_recurring_dates(&request, &options).len(), 20);
    }

    #[test_log::test]
    fn end_before_start_generates_nothing() {
        let request = GenerationRequest::new(
            RecurringPattern::Weekly,
            d("2025-02-01"),
            RecurrenceEnd::On(d("2025-01-01")),
        );
        assert!(generate(&request).is_empty());
    }

    #[test]
    fn request_deserializes_from_editor_json() {
        let request: GenerationRequest = serde_json::from_value(serde_json::json!({
            "pattern": "monthly",
            "startDate": "2025-01-01",
            "end": {"after": 6},
            "monthly": {"type": "position", "ordinal": 2, "weekday": "TU"},
            "timeSlots": [{"startTime": "18:00", "endTime": "19:00"}]
        }))
        .expect("valid request");

        assert_eq!(request.end, RecurrenceEnd::After(6));
        assert_eq!(
            request.monthly,
            MonthlyRule::Position {
                ordinal: 2,
                weekday: Weekday::Tuesday
            }
        );
    }
}

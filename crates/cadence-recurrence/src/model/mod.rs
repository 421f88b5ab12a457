//! Value types shared by the classifier, compressor, expander and generator.

mod clock;
mod date;
mod options;
mod pattern;
mod rule;
mod slot;

pub use clock::{ClockTime, TimeWindow};
pub use date::{
    EventDate, RecurringDate, Repeats, add_months_clamped, format_local_date, last_day_of_month,
    nth_weekday_of_month, parse_local_date, week_start, weekday_position,
};
pub use options::ExpansionOptions;
pub use pattern::{PatternKind, RecurringPattern};
pub use rule::{Frequency, RulePattern, Weekday, WeekdayNum};
pub use slot::{TimeSlot, calculate_duration, find_overlapping_slots, has_overlapping_slots};

/// Fresh opaque identifier for generated dates and slots.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

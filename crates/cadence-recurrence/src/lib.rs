//! Recurrence engine for event schedules.
//!
//! Converts between the concrete, per-date schedule a user edits (a list of
//! [`RecurringDate`]s, each with its own time slots) and the compact form that
//! gets persisted with an event:
//!
//! - **compress** picks the most compact lossless representation: an explicit
//!   date list, a simple `daily`/`weekly`/`monthly` pattern, or an RRULE-like
//!   rule pattern
//! - **expand** rebuilds the concrete date list from whichever form was stored,
//!   tolerating the loosely typed payloads older records carry
//! - **generate** turns a recurrence request from the editor into concrete dates
//!
//! Everything here is pure and synchronous. Malformed input degrades to fewer
//! (or no) dates and a `tracing` warning, never an error.

pub mod compress;
pub mod detect;
pub mod error;
pub mod expand;
pub mod generate;
pub mod model;
pub mod parse;

pub use compress::{StorageMode, TransformationResult, compress};
pub use detect::{ConsistencyReport, check_time_consistency, detect_recurring_pattern_type};
pub use error::{RecurrenceError, RecurrenceResult};
pub use expand::{expand, expand_with_options};
pub use generate::{GenerationRequest, MonthlyRule, RecurrenceEnd, generate_recurring_dates};
pub use model::{
    ClockTime, EventDate, ExpansionOptions, Frequency, PatternKind, RecurringDate,
    RecurringPattern, Repeats, RulePattern, TimeSlot, TimeWindow, Weekday, WeekdayNum,
    calculate_duration,
};
pub use parse::{FlexibleValue, PersistedRecurrence};

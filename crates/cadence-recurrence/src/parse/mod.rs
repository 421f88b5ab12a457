//! Boundary parsing for persisted recurrence payloads.
//!
//! Stored records carry dates and times as `YYYY-MM-DD` strings, ISO datetimes,
//! millisecond timestamps or numeric strings of timestamps. All of that
//! type-sniffing happens here; the rest of the engine only sees typed values.

mod flexible;
mod payload;

pub use flexible::{FlexibleValue, parse_flexible_date, parse_flexible_time};
pub(crate) use payload::parse_recurring_pattern;
pub use payload::{PersistedRecurrence, RawEventDate, RawRulePattern, RawTimes, resolve_window};

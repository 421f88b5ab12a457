use thiserror::Error;

/// Recurrence parsing and validation errors
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Unsupported recurrence: {0}")]
    Unsupported(String),

    #[error("RRule error: {0}")]
    RRuleError(#[from] rrule::RRuleError),

    #[error(transparent)]
    CoreError(#[from] cadence_core::error::CoreError),
}

pub type RecurrenceResult<T> = std::result::Result<T, RecurrenceError>;

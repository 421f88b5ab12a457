use std::str::FromStr;

use cadence_core::config::RecurrenceConfig;
use cadence_core::constants::DEFAULT_MAX_OCCURRENCES;
use chrono_tz::Tz;

use super::{ClockTime, TimeWindow};
use crate::error::{RecurrenceError, RecurrenceResult};

/// Options for expansion and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Maximum number of dates to produce.
    pub max_occurrences: usize,

    /// Window substituted when a record has no usable times.
    pub default_window: TimeWindow,

    /// Zone whose local time of day is read out of offset-bearing datetimes.
    pub timezone: Option<Tz>,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            default_window: default_window(),
            timezone: None,
        }
    }
}

const fn default_window() -> TimeWindow {
    TimeWindow::new(ClockTime::hm(9, 0), ClockTime::hm(10, 0))
}

impl ExpansionOptions {
    /// Sets the maximum number of occurrences.
    #[must_use]
    pub fn with_max_occurrences(mut self, max: usize) -> Self {
        self.max_occurrences = max;
        self
    }

    /// Sets the zone used for time-of-day extraction.
    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }
}

impl TryFrom<&RecurrenceConfig> for ExpansionOptions {
    type Error = RecurrenceError;

    fn try_from(config: &RecurrenceConfig) -> RecurrenceResult<Self> {
        config.validate()?;

        let default_window =
            TimeWindow::parse(&config.default_start_time, &config.default_end_time)?;
        let timezone = config
            .timezone
            .as_deref()
            .map(|name| {
                Tz::from_str(name).map_err(|_e| RecurrenceError::UnknownTimezone(name.to_string()))
            })
            .transpose()?;

        Ok(Self {
            max_occurrences: config.max_occurrences,
            default_window,
            timezone,
        })
    }
}

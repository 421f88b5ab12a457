/// Start of the time window substituted when a persisted record carries no times.
pub const DEFAULT_START_TIME: &str = "09:00";

/// End of the time window substituted when a persisted record carries no times.
pub const DEFAULT_END_TIME: &str = "10:00";

/// Upper bound on the number of dates a single expansion or generation may produce.
pub const DEFAULT_MAX_OCCURRENCES: usize = 1000;

/// Largest configurable cap. Rule expansion asks for one date past the cap and
/// `rrule` counts in `u16`.
pub const MAX_OCCURRENCES_LIMIT: usize = 65_534;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Prefix for environment variables read by [`crate::config::load_config`].
pub const ENV_PREFIX: &str = "CADENCE";

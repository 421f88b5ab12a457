use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_END_TIME, DEFAULT_LOG_LEVEL, DEFAULT_MAX_OCCURRENCES, DEFAULT_START_TIME, ENV_PREFIX,
    MAX_OCCURRENCES_LIMIT,
};
use crate::error::{CoreError, CoreResult};


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub recurrence: RecurrenceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Tunables for recurrence expansion and generation.
#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Hard cap on dates produced by one expansion.
    pub max_occurrences: usize,
    /// `HH:MM` start substituted for records without times.
    pub default_start_time: String,
    /// `HH:MM` end substituted for records without times.
    pub default_end_time: String,
    /// IANA zone used to read the time of day out of offset-bearing datetimes.
    /// When unset the wall-clock time is taken as written.
    pub timezone: Option<String>,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            default_start_time: DEFAULT_START_TIME.to_string(),
            default_end_time: DEFAULT_END_TIME.to_string(),
            timezone: None,
        }
    }
}

impl RecurrenceConfig {
    /// ## Summary
    /// Checks values that deserialization alone cannot reject.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if `max_occurrences` is zero or above
    /// `MAX_OCCURRENCES_LIMIT`, and
    /// `CoreError::ValidationError` if a default time is empty.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_occurrences == 0 {
            return Err(CoreError::ConfigError(
                "recurrence.max_occurrences must be greater than zero".to_string(),
            ));
        }
        if self.max_occurrences > MAX_OCCURRENCES_LIMIT {
            return Err(CoreError::ConfigError(format!(
                "recurrence.max_occurrences must be at most {MAX_OCCURRENCES_LIMIT}"
            )));
        }
        if self.default_start_time.trim().is_empty() || self.default_end_time.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "recurrence default times must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an optional
    /// `config.toml`. Environment variables use the `CADENCE_` prefix and `__`
    /// as the section separator, e.g. `CADENCE_RECURRENCE__MAX_OCCURRENCES`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default(
                "recurrence.max_occurrences",
                i64::try_from(DEFAULT_MAX_OCCURRENCES)?,
            )?
            .set_default("recurrence.default_start_time", DEFAULT_START_TIME)?
            .set_default("recurrence.default_end_time", DEFAULT_END_TIME)?
            // Env file
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.recurrence.validate()?;
        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::trace!(error = %e, "No .env file loaded");
    }

    Settings::load()
}

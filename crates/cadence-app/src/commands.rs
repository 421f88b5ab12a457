use anyhow::{Context, Result};
use cadence_recurrence::{
    ClockTime, ConsistencyReport, ExpansionOptions, GenerationRequest, PatternKind,
    PersistedRecurrence, RecurringDate, calculate_duration, check_time_consistency, compress,
    detect_recurring_pattern_type, expand_with_options, generate_recurring_dates,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Command;
use crate::input::{parse_json, read_input};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification {
    pattern: PatternKind,
    consistency: ConsistencyReport,
}

/// Runs one command and returns what should be printed.
///
/// ## Errors
/// Returns an error if the input cannot be read or parsed. The engine itself
/// never fails; malformed records are logged and skipped.
pub fn run(command: &Command, options: &ExpansionOptions) -> Result<Value> {
    match command {
        Command::Compress { input, persisted } => {
            compress_dates(&read_input(input)?, *persisted)
        }
        Command::Expand { input } => expand_recurrence(&read_input(input)?, options),
        Command::Generate { input } => generate_dates(&read_input(input)?, options),
        Command::Classify { input } => classify_dates(&read_input(input)?),
        Command::Duration { start, end } => duration(start, end),
    }
}

/// ## Errors
/// Returns an error if `text` is not a JSON list of dates.
pub fn compress_dates(text: &str, persisted: bool) -> Result<Value> {
    let dates: Vec<RecurringDate> = parse_json(text, "dates")?;
    let result = compress(&dates);
    tracing::info!(mode = %result.mode(), dates = dates.len(), "Compressed");

    if persisted {
        Ok(serde_json::to_value(PersistedRecurrence::from(&result))?)
    } else {
        Ok(serde_json::to_value(result)?)
    }
}

/// ## Errors
/// Returns an error if `text` is not a JSON object.
pub fn expand_recurrence(text: &str, options: &ExpansionOptions) -> Result<Value> {
    let persisted: PersistedRecurrence = parse_json(text, "recurrence")?;
    let dates = expand_with_options(&persisted, options);
    tracing::info!(dates = dates.len(), "Expanded");
    Ok(serde_json::to_value(dates)?)
}

/// ## Errors
/// Returns an error if `text` is not a valid generation request.
pub fn generate_dates(text: &str, options: &ExpansionOptions) -> Result<Value> {
    let request: GenerationRequest = parse_json(text, "generation request")?;
    let dates = generate_recurring_dates(&request, options);
    tracing::info!(dates = dates.len(), "Generated");
    Ok(serde_json::to_value(dates)?)
}

/// ## Errors
/// Returns an error if `text` is not a JSON list of dates.
pub fn classify_dates(text: &str) -> Result<Value> {
    let dates: Vec<RecurringDate> = parse_json(text, "dates")?;
    let classification = Classification {
        pattern: detect_recurring_pattern_type(&dates),
        consistency: check_time_consistency(&dates),
    };
    Ok(serde_json::to_value(classification)?)
}

/// ## Errors
/// Returns an error if either time is not `HH:MM`.
pub fn duration(start: &str, end: &str) -> Result<Value> {
    let start: ClockTime = start.parse().context("invalid start time")?;
    let end: ClockTime = end.parse().context("invalid end time")?;
    Ok(Value::String(calculate_duration(start, end)))
}

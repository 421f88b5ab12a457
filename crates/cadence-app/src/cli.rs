use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cadence", version, about = "Recurring event date engine")]
pub struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a JSON list of dates into the stored form
    Compress {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Print the persisted fields instead of the flagged result
        #[arg(long)]
        persisted: bool,
    },

    /// Expand stored recurrence fields into concrete dates
    Expand {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Generate dates from a recurrence request
    Generate {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Classify a JSON list of dates and check their times
    Classify {
        /// Input file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Print the display duration between two `HH:MM` times
    Duration { start: String, end: String },
}

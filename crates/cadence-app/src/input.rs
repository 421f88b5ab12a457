use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Reads the whole input; `-` means stdin.
///
/// ## Errors
/// Returns an error if the file or stdin cannot be read.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses a JSON document, naming `what` in the error.
///
/// ## Errors
/// Returns an error if the text is not valid JSON for `T`.
pub fn parse_json<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    serde_json::from_str(text).with_context(|| format!("invalid {what} JSON"))
}

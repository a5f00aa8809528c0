//! Argument parsing helpers.

use crate::error::{CliError, Result};

/// Parse a `key=value` attribute filter. The value may itself contain `=`.
pub fn parse_attribute(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidAttribute(raw.to_string())),
    }
}

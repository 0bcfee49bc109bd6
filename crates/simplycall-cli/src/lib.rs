//! # simplycall CLI
//!
//! Helpers behind the `simplycall` binary.
//!
//! ## Argument Syntax
//!
//! Each positional argument of `simplycall call` becomes one call argument:
//!
//! - `@path`: the file's bytes, sent as a binary argument
//! - anything else: parsed as JSON, sent as a structured argument
//!
//! ## Output
//!
//! Structured results are printed as compact JSON followed by a newline;
//! binary results are written to stdout unchanged.

use anyhow::{Context, Result};
use simplycall_common::Value;
use std::io::Write;

/// Validates that a URL string starts with `http://`.
///
/// # Arguments
///
/// * `url` - The URL string to validate
/// * `description` - What the URL is for (e.g., "server address")
///
/// # Errors
///
/// Returns an error if the URL doesn't start with `http://`
pub fn validate_http_url(url: &str, description: &str) -> Result<()> {
    if url.starts_with("http://") {
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Invalid {}: '{}' must start with http://",
            description,
            url
        ))
    }
}

/// Turns one command-line argument into a call argument.
///
/// # Errors
///
/// Returns an error if an `@path` file cannot be read or the text is not JSON.
pub fn parse_arg(raw: &str) -> Result<Value> {
    if let Some(path) = raw.strip_prefix('@') {
        let data = std::fs::read(path).with_context(|| format!("Failed to read argument file '{}'", path))?;
        return Ok(Value::from(data));
    }

    let json: serde_json::Value =
        serde_json::from_str(raw).with_context(|| format!("Invalid JSON argument '{}'", raw))?;
    Ok(Value::Json(json))
}

/// Writes a call result to `out`.
pub fn write_value(value: &Value, out: &mut impl Write) -> Result<()> {
    match value {
        Value::Json(json) => {
            serde_json::to_writer(&mut *out, json)?;
            out.write_all(b"\n")?;
        }
        Value::Binary(bytes) => out.write_all(bytes)?,
    }
    out.flush()?;
    Ok(())
}

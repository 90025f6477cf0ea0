use std::path::Path;

use serde_json::Value;

use crate::error::Result;

/// Render a JSON value with indentation.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Print a JSON value to stdout with indentation.
pub fn print_pretty(value: &Value) {
    println!("{}", pretty(value));
}

/// Write a JSON value to a file with indentation.
///
/// Defaults to `dump.json` in the working directory when no path is given.
pub fn dump_to_file(value: &Value, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or_else(|| Path::new("dump.json"));
    std::fs::write(path, pretty(value))?;
    Ok(())
}

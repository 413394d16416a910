//! Payload files
//!
//! Submission payloads are read from JSON or TOML files (chosen by
//! extension) into a loose [`Value`].

use std::fs;
use std::path::Path;

use dbx_schema::Value;

use crate::error::{JobError, JobResult};

/// Read a payload file.
pub fn load_payload(path: &Path) -> JobResult<Value> {
    let contents = fs::read_to_string(path).map_err(|e| {
        JobError::configuration(format!("cannot read payload {}: {}", path.display(), e))
    })?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    parse_payload(&contents, is_toml)
        .map_err(|message| JobError::configuration(format!("{}: {}", path.display(), message)))
}

/// Parse payload text.
pub fn parse_payload(contents: &str, is_toml: bool) -> Result<Value, String> {
    if is_toml {
        let table: toml::Value = toml::from_str(contents).map_err(|e| e.to_string())?;
        Ok(Value::from(table))
    } else {
        let json: serde_json::Value = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        Ok(Value::from(json))
    }
}

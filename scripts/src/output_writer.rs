//! Deployment record, a json file keyed by package name

use std::{fs, path::Path};

use json::JsonValue;

use crate::errors::ScriptError;

/// Values recorded per package
pub enum OutputKeys {
    /// Hash of the publish transaction of a package
    Publish {
        /// Package name
        package: String,
    },
    /// Address the package was published under
    Sender {
        /// Package name
        package: String,
    },
}

impl OutputKeys {
    /// `(package, field)` location of the value in the json file
    fn path(&self) -> (&str, &'static str) {
        match self {
            OutputKeys::Publish { package } => (package, "publish"),
            OutputKeys::Sender { package } => (package, "sender"),
        }
    }
}

/// Read a recorded deployment value
pub fn read_output_file(file_path: &Path, key: OutputKeys) -> Result<String, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(String::from(
            "Deployment output file not found",
        )));
    }

    let parsed_json = get_json_from_file(file_path)?;
    let (package, field) = key.path();

    parsed_json[package][field]
        .as_str()
        .map(String::from)
        .ok_or_else(|| ScriptError::JsonOutputError(format!("no {field} recorded for {package}")))
}

/// Record a deployment value, merging into the existing file
pub fn write_output_file(file_path: &Path, key: OutputKeys, value: &str) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    let mut parsed_json = get_json_from_file(file_path)?;
    let (package, field) = key.path();
    parsed_json[package][field] = JsonValue::String(value.to_string());

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}

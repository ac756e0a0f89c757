//! Shared helpers for command handlers.

use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::Path;

use serde_json::Value;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, `--yes` is mandatory.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read a template variable file: a flat JSON or YAML mapping of variable
/// path to value. Numbers and booleans are stringified.
pub fn read_vars_file(path: &Path) -> Result<BTreeMap<String, String>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed: Value = if is_json {
        serde_json::from_str(&contents).map_err(|e| invalid_vars(format!("invalid JSON: {e}")))?
    } else {
        serde_yaml::from_str(&contents).map_err(|e| invalid_vars(format!("invalid YAML: {e}")))?
    };

    parse_vars(parsed)
}

fn parse_vars(parsed: Value) -> Result<BTreeMap<String, String>, CliError> {
    let Value::Object(map) = parsed else {
        return Err(invalid_vars("expected a mapping of variable path to value".into()));
    };

    map.into_iter()
        .map(|(key, value)| match value {
            Value::String(s) => Ok((key, s)),
            Value::Number(n) => Ok((key, n.to_string())),
            Value::Bool(b) => Ok((key, b.to_string())),
            _ => Err(invalid_vars(format!("value of '{key}' must be a scalar"))),
        })
        .collect()
}

fn invalid_vars(reason: String) -> CliError {
    CliError::Validation {
        field: "vars-file".into(),
        reason,
    }
}

//! Argument extraction for tool calls.
//!
//! Models are loose about JSON types: integers sometimes arrive as strings,
//! and collections sometimes arrive as a JSON document inside a string. These
//! helpers accept both forms and fail with a message the model can act on.

use anyhow::{Result, anyhow};
use serde_json::Value;

use touchline_common::{ChangeSet, Collection};

fn object(args: &Value) -> Result<&serde_json::Map<String, Value>> {
    args.as_object()
        .ok_or_else(|| anyhow!("Expected object arguments"))
}

/// Reads a required non-negative integer argument.
///
/// # Errors
///
/// Returns an error if the argument is missing or not an integer.
pub fn integer(args: &Value, name: &str) -> Result<u64> {
    let value = object(args)?
        .get(name)
        .ok_or_else(|| anyhow!("Missing '{name}' parameter"))?;

    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| anyhow!("'{name}' must be a non-negative integer, got {value}"))
}

/// Like [`integer`], narrowed to `u32`.
///
/// # Errors
///
/// Returns an error if the argument is missing, not an integer or too large.
pub fn small_integer(args: &Value, name: &str) -> Result<u32> {
    let value = integer(args, name)?;
    u32::try_from(value).map_err(|_| anyhow!("'{name}' is out of range: {value}"))
}

/// Reads an optional boolean argument.
///
/// # Errors
///
/// Returns an error if the argument is present but not a boolean.
pub fn flag(args: &Value, name: &str, default: bool) -> Result<bool> {
    match object(args)?.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(anyhow!("'{name}' must be a boolean, got {other}")),
    }
}

/// Unwraps a value that may hold a JSON document as a string.
fn decoded(name: &str, value: &Value) -> Result<Value> {
    match value {
        Value::String(s) => {
            serde_json::from_str(s).map_err(|e| anyhow!("'{name}' is not valid JSON: {e}"))
        }
        other => Ok(other.clone()),
    }
}

/// Reads a required collection of player objects.
///
/// # Errors
///
/// Returns an error if the argument is missing or not an array of objects.
pub fn collection(args: &Value, name: &str) -> Result<Collection> {
    let value = object(args)?
        .get(name)
        .ok_or_else(|| anyhow!("Missing '{name}' parameter"))?;

    serde_json::from_value(decoded(name, value)?)
        .map_err(|e| anyhow!("'{name}' must be a list of player objects: {e}"))
}

/// Reads an optional change set; `null` or absent means "no baseline".
///
/// # Errors
///
/// Returns an error if the argument is present but not a change set.
pub fn change_set(args: &Value, name: &str) -> Result<Option<ChangeSet>> {
    let value = match object(args)?.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(value) => decoded(name, value)?,
    };

    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| anyhow!("'{name}' is not a change set: {e}"))
}

//! Helpers for picking typed fields out of loosely typed proxy JSON.
//!
//! Upstream datasets (Socrata in particular) send numbers as strings as
//! often as not, so numeric accessors accept both.

use crate::error::{DashboardError, Result};
use serde_json::{Map, Value};

pub(crate) type Row = Map<String, Value>;

/// Parse a response body that must be a JSON array of objects.
///
/// Non-object elements are skipped; a body that is not an array is an error.
pub(crate) fn parse_rows(body: &str, endpoint: &str) -> Result<Vec<Row>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DashboardError::unavailable(format!("{}: invalid JSON: {}", endpoint, e)))?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect()),
        other => Err(DashboardError::unavailable(format!(
            "{}: expected a JSON array, got {}",
            endpoint,
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// First non-empty string among `keys`. Numbers are stringified.
pub(crate) fn string(row: &Row, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match row.get(*k)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First finite number among `keys`, accepting numeric strings.
pub(crate) fn number(row: &Row, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| {
        let n = match row.get(*k)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    })
}

/// First whole number among `keys`; fractional values are rejected.
pub(crate) fn integer(row: &Row, keys: &[&str]) -> Option<i64> {
    let n = number(row, keys)?;
    (n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
}

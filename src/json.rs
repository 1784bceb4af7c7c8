//! Bridge to the external JSON codec
//!
//! serde_json owns all JSON syntax. This module only converts between
//! `serde_json::Value` and the crate's tree value, one-to-one: object ↔
//! mapping, array ↔ sequence, string/number/boolean/null ↔ scalar.

use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{Error, Result};
use crate::value::{Object, Value};

/// Decode JSON text into a tree value.
pub fn from_str(input: &str) -> Result<Value> {
    let decoded: JsonValue = serde_json::from_str(input).map_err(Error::malformed)?;
    Ok(decode(decoded))
}

/// Decode JSON bytes into a tree value.
pub fn from_slice(input: &[u8]) -> Result<Value> {
    debug!(bytes = input.len(), "decoding json document");
    let decoded: JsonValue = serde_json::from_slice(input).map_err(Error::malformed)?;
    Ok(decode(decoded))
}

/// Encode a tree value as compact JSON text.
///
/// Tree values always encode; a non-finite number degrades to null, matching
/// what the decoder would have produced for it.
pub fn to_string(value: &Value) -> String {
    serde_json::to_string(&encode(value)).unwrap_or_default()
}

/// Encode a tree value as indented JSON text.
pub fn to_string_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(&encode(value)).unwrap_or_default()
}

fn decode(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(s) => Value::String(s),
        JsonValue::Array(items) => Value::Array(items.into_iter().map(decode).collect()),
        JsonValue::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, decode(value)))
                .collect::<Object>(),
        ),
    }
}

#[allow(clippy::as_conversions)]
fn encode(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => {
            // Integral floats render bare (42, not 42.0) so numeric output
            // is stable across the JSON and XML paths.
            if n.is_finite() && n.fract() == 0.0 && *n >= i64::MIN as f64 && *n <= i64::MAX as f64 {
                JsonValue::from(*n as i64)
            } else {
                serde_json::Number::from_f64(*n).map_or(JsonValue::Null, JsonValue::Number)
            }
        }
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Array(items) => JsonValue::Array(items.iter().map(encode).collect()),
        Value::Object(entries) => JsonValue::Object(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), encode(value)))
                .collect(),
        ),
    }
}

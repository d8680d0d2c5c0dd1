//! Conversion between runtime values and `serde_json` values.
//!
//! JSON has no `undefined`; it is written as `null`. Non-finite numbers are
//! written as `null` as well. Integral numbers within the safe integer
//! range are written without a fractional part.

use serde_json::{Map, Number};
use shapematch_value::{Object, Value};

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Convert parsed JSON into a runtime value.
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::number),
        serde_json::Value::String(s) => Value::string(s.as_str()),
        serde_json::Value::Array(items) => Value::array(items.iter().map(from_json).collect()),
        serde_json::Value::Object(props) => Value::from_props(
            props
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect::<Object>(),
        ),
    }
}

/// Convert a runtime value into JSON.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Undefined | Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Object(props) => {
            let mut entries: Vec<_> = props.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let map: Map<String, serde_json::Value> = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "integral and within the safe integer range"
)]
fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

#[cfg(test)]
mod tests;

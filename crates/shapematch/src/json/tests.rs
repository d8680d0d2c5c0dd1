use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn test_from_json_shapes() {
    let value = from_json(&json!({"status": "error", "codes": [1, 2.5], "ok": false, "none": null}));
    assert_eq!(value.get("status"), Some(&Value::from("error")));
    assert_eq!(
        value.get("codes"),
        Some(&Value::array(vec![Value::from(1), Value::from(2.5)]))
    );
    assert_eq!(value.get("ok"), Some(&Value::from(false)));
    assert_eq!(value.get("none"), Some(&Value::Null));
    assert_eq!(value.get("missing"), None);
}

#[test]
fn test_to_json_integral_numbers() {
    assert_eq!(to_json(&Value::from(3)), json!(3));
    assert_eq!(to_json(&Value::from(-0.5)), json!(-0.5));
    assert_eq!(to_json(&Value::from(f64::NAN)), json!(null));
    assert_eq!(to_json(&Value::from(f64::INFINITY)), json!(null));
}

#[test]
fn test_to_json_undefined_is_null() {
    assert_eq!(to_json(&Value::Undefined), json!(null));
    let selections = Value::object([("data", Value::Undefined)]);
    assert_eq!(to_json(&selections), json!({"data": null}));
}

#[test]
fn test_to_json_nested() {
    let value = Value::object([
        ("b", Value::array(vec![Value::from("x"), Value::Null])),
        ("a", Value::object([("inner", Value::from(true))])),
    ]);
    assert_eq!(
        to_json(&value),
        json!({"a": {"inner": true}, "b": ["x", null]})
    );
}

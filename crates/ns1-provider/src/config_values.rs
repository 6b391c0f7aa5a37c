//! Typed-string conversion for free-form configuration maps
//!
//! Filter config, monitoring job config and rule values are string-typed on
//! the attribute side but natively typed on the wire. A string becomes an
//! integer if it parses as one, then a float, then a boolean, and stays a
//! string otherwise. The reverse prints numbers in their shortest form, so
//! `{N = "1"}` goes out as `{"N": 1}` and comes back as `{N = "1"}`.
//!
//! Only numbers already written in that shortest form are converted. `"007"`,
//! `"1.0"` or `"1e3"` would come back spelled differently, so they go out as
//! strings.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Convert one attribute string into its wire value
pub fn typed_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => number(raw)
            .filter(|n| attr_string(n) == raw)
            .unwrap_or_else(|| Value::String(raw.to_string())),
    }
}

fn number(raw: &str) -> Option<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Some(Value::from(u));
    }
    let f = raw.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Number::from_f64(f).map(Value::Number)
}

/// Convert one wire value back into its attribute string
pub fn attr_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Attribute map to wire map
pub fn to_wire(attrs: &BTreeMap<String, String>) -> Map<String, Value> {
    attrs
        .iter()
        .map(|(k, v)| (k.clone(), typed_value(v)))
        .collect()
}

/// Wire map to attribute map
pub fn from_wire(wire: &Map<String, Value>) -> BTreeMap<String, String> {
    wire.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), attr_string(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_value_precedence() {
        assert_eq!(typed_value("1"), json!(1));
        assert_eq!(typed_value("-7"), json!(-7));
        assert_eq!(typed_value("0.25"), json!(0.25));
        assert_eq!(typed_value("true"), json!(true));
        assert_eq!(typed_value("us-east"), json!("us-east"));
        assert_eq!(typed_value(""), json!(""));
    }

    #[test]
    fn test_non_finite_floats_stay_strings() {
        assert_eq!(typed_value("inf"), json!("inf"));
        assert_eq!(typed_value("NaN"), json!("NaN"));
    }

    #[test]
    fn test_non_canonical_numbers_stay_strings() {
        for raw in ["007", "1.0", "1e3", "+5", "0.10", "-0", " 1"] {
            assert_eq!(typed_value(raw), json!(raw), "{:?} must not be converted", raw);
        }

        let attrs = BTreeMap::from([
            ("zip".to_string(), "02134".to_string()),
            ("port".to_string(), "443".to_string()),
        ]);
        let wire = to_wire(&attrs);
        assert_eq!(Value::Object(wire.clone()), json!({"zip": "02134", "port": 443}));
        assert_eq!(from_wire(&wire), attrs);
    }

    #[test]
    fn test_filter_config_round_trip() {
        let attrs = BTreeMap::from([
            ("N".to_string(), "1".to_string()),
            ("eliminate".to_string(), "true".to_string()),
            ("ratio".to_string(), "0.1".to_string()),
        ]);

        let wire = to_wire(&attrs);
        assert_eq!(Value::Object(wire.clone()), json!({"N": 1, "eliminate": true, "ratio": 0.1}));
        assert_eq!(from_wire(&wire), attrs);
    }

    #[test]
    fn test_large_integers_keep_precision() {
        let attrs = BTreeMap::from([("id".to_string(), "18446744073709551615".to_string())]);
        assert_eq!(from_wire(&to_wire(&attrs)), attrs);
    }
}

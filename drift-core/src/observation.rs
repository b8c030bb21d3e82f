//! Incoming observation and value extraction
//!
//! A feature value is a JSON scalar or a flat array of scalars. The same
//! extraction rules apply to baseline reference values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// One scoring request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub features: BTreeMap<String, Value>,
    pub model_version: String,
    pub timestamp: String,
}

impl Observation {
    pub fn new(model_version: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            features: BTreeMap::new(),
            model_version: model_version.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }
}

/// Top-level scalars of a value: the array items, or the value itself
fn scalars(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Array(items) => Box::new(items.iter()),
        other => Box::new(std::iter::once(other)),
    }
}

/// Finite numbers in `value`. Numeric strings are parsed; everything else is
/// treated as non-finite and dropped.
pub fn numeric_values(value: &Value) -> Vec<f64> {
    scalars(value)
        .filter_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|v| v.is_finite())
        .collect()
}

/// Category labels in `value`. Nulls and nested containers are dropped.
pub fn category_labels(value: &Value) -> Vec<String> {
    scalars(value)
        .filter_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(number_label(n)),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

/// Canonical text for a numeric category: `1`, `1.0` and `1e0` share a label.
fn number_label(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_values_filters_non_numeric() {
        let v = json!([1.5, "2.5", null, "abc", true, "inf", 3]);
        assert_eq!(numeric_values(&v), vec![1.5, 2.5, 3.0]);
        assert_eq!(numeric_values(&json!(7)), vec![7.0]);
        assert!(numeric_values(&json!(null)).is_empty());
    }

    #[test]
    fn test_category_labels() {
        let v = json!(["x", 3, true, null, ["nested"]]);
        assert_eq!(category_labels(&v), vec!["x", "3", "true"]);
        assert_eq!(category_labels(&json!("y")), vec!["y"]);
    }

    #[test]
    fn test_numeric_category_labels_are_canonical() {
        let v = json!([1, 1.0, 1e0, -2.0, 2.5, 0.0]);
        assert_eq!(category_labels(&v), vec!["1", "1", "1", "-2", "2.5", "0"]);
    }

    #[test]
    fn test_observation_deserialize() {
        let obs: Observation = serde_json::from_value(json!({
            "features": { "age": 42, "color": ["red", "blue"] },
            "model_version": "v1",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(obs.features.len(), 2);
        assert_eq!(obs.model_version, "v1");
    }
}

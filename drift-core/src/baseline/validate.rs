use serde_json::Value;

use super::types::FeatureKind;
use crate::error::BaselineError;

/// Infer a feature's kind from its raw reference values. Nulls are ignored;
/// numbers only means numeric, text/booleans only means categorical.
pub fn infer_kind(feature: &str, values: &[Value]) -> Result<FeatureKind, BaselineError> {
    let mut numbers = 0usize;
    let mut labels = 0usize;

    for value in values {
        match value {
            Value::Null => {}
            Value::Number(_) => numbers += 1,
            Value::String(_) | Value::Bool(_) => labels += 1,
            Value::Array(_) | Value::Object(_) => {
                return Err(BaselineError::unclassifiable(feature, "nested value in reference data"));
            }
        }
    }

    match (numbers, labels) {
        (0, 0) => Err(BaselineError::unclassifiable(feature, "no reference values")),
        (_, 0) => Ok(FeatureKind::Numeric),
        (0, _) => Ok(FeatureKind::Categorical),
        _ => Err(BaselineError::unclassifiable(
            feature,
            format!("mixes {} numeric and {} text values", numbers, labels),
        )),
    }
}

/// Check values against an explicitly declared kind
pub fn check_declared(feature: &str, kind: FeatureKind, values: &[Value]) -> Result<(), BaselineError> {
    let non_null = values.iter().filter(|v| !v.is_null()).count();
    if non_null == 0 {
        return Err(BaselineError::unclassifiable(feature, "no reference values"));
    }

    let offending = values.iter().find(|v| match (kind, v) {
        (_, Value::Null) => false,
        (_, Value::Array(_)) | (_, Value::Object(_)) => true,
        (FeatureKind::Numeric, v) => !v.is_number(),
        (FeatureKind::Categorical, _) => false,
    });

    match offending {
        Some(v) => Err(BaselineError::unclassifiable(
            feature,
            format!("value {} is not valid for a {} feature", v, kind),
        )),
        None => Ok(()),
    }
}

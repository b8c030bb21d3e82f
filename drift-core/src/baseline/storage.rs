//! Baseline source parsing
//!
//! Accepted JSON shapes:
//! - column-oriented: `{ "age": [..], "color": [..] }`
//! - record-oriented: `[ { "age": 31, "color": "red" }, .. ]`
//! - declared: `{ "features": [ { "name", "kind", "values" } ] }`

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::types::FeatureKind;
use super::validate::{check_declared, infer_kind};
use crate::error::BaselineError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BaselineSource {
    Declared(DeclaredSource),
    Columns(BTreeMap<String, Vec<Value>>),
    Records(Vec<BTreeMap<String, Value>>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclaredSource {
    features: Vec<DeclaredFeature>,
}

#[derive(Debug, Deserialize)]
struct DeclaredFeature {
    name: String,
    kind: String,
    values: Vec<Value>,
}

/// A classified feature column, not yet prepared for scoring
#[derive(Debug, Clone, PartialEq)]
pub struct RawFeature {
    pub name: String,
    pub kind: FeatureKind,
    pub values: Vec<Value>,
}

/// Read the baseline file
pub fn read_source(path: &Path) -> Result<Vec<u8>, BaselineError> {
    fs::read(path).map_err(|source| BaselineError::Io { path: path.to_path_buf(), source })
}

/// Hex SHA-256 of the source bytes
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Parse and classify every feature in `bytes`
pub fn parse_features(bytes: &[u8]) -> Result<Vec<RawFeature>, BaselineError> {
    let source: BaselineSource = serde_json::from_slice(bytes)?;

    let features = match source {
        BaselineSource::Declared(declared) => classify_declared(declared)?,
        BaselineSource::Columns(columns) => classify_columns(columns)?,
        BaselineSource::Records(records) => classify_columns(records_to_columns(records))?,
    };

    if features.is_empty() {
        return Err(BaselineError::Empty);
    }
    Ok(features)
}

fn classify_declared(declared: DeclaredSource) -> Result<Vec<RawFeature>, BaselineError> {
    let mut seen = std::collections::HashSet::new();
    declared
        .features
        .into_iter()
        .map(|f| {
            if !seen.insert(f.name.clone()) {
                return Err(BaselineError::Duplicate(f.name));
            }
            let kind: FeatureKind = f
                .kind
                .parse()
                .map_err(|reason: String| BaselineError::unclassifiable(&f.name, reason))?;
            check_declared(&f.name, kind, &f.values)?;
            Ok(RawFeature { name: f.name, kind, values: f.values })
        })
        .collect()
}

fn classify_columns(columns: BTreeMap<String, Vec<Value>>) -> Result<Vec<RawFeature>, BaselineError> {
    columns
        .into_iter()
        .map(|(name, values)| {
            let kind = infer_kind(&name, &values)?;
            Ok(RawFeature { name, kind, values })
        })
        .collect()
}

// A key missing from a record becomes a null in that row
fn records_to_columns(records: Vec<BTreeMap<String, Value>>) -> BTreeMap<String, Vec<Value>> {
    let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
    for record in &records {
        for name in record.keys() {
            columns.entry(name.clone()).or_default();
        }
    }
    for record in records {
        for (name, column) in columns.iter_mut() {
            column.push(record.get(name).cloned().unwrap_or(Value::Null));
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(features: &[RawFeature]) -> Vec<(&str, FeatureKind)> {
        features.iter().map(|f| (f.name.as_str(), f.kind)).collect()
    }

    #[test]
    fn test_parse_column_oriented() {
        let bytes = br#"{ "age": [31, 45, null], "color": ["red", "blue", "red"] }"#;
        let features = parse_features(bytes).unwrap();
        assert_eq!(
            kinds(&features),
            vec![("age", FeatureKind::Numeric), ("color", FeatureKind::Categorical)]
        );
    }

    #[test]
    fn test_parse_record_oriented_fills_missing() {
        let bytes = br#"[ { "age": 31, "color": "red" }, { "age": 40 } ]"#;
        let features = parse_features(bytes).unwrap();
        let color = features.iter().find(|f| f.name == "color").unwrap();
        assert_eq!(color.values, vec![Value::from("red"), Value::Null]);
        assert_eq!(color.kind, FeatureKind::Categorical);
    }

    #[test]
    fn test_parse_declared() {
        let bytes = br#"{ "features": [
            { "name": "zip", "kind": "categorical", "values": [10115, 10117] },
            { "name": "income", "kind": "numeric", "values": [1.5, 2.5] }
        ] }"#;
        let features = parse_features(bytes).unwrap();
        assert_eq!(
            kinds(&features),
            vec![("zip", FeatureKind::Categorical), ("income", FeatureKind::Numeric)]
        );
    }

    #[test]
    fn test_declared_unknown_kind_is_unclassifiable() {
        let bytes = br#"{ "features": [ { "name": "a", "kind": "ordinal", "values": [1] } ] }"#;
        assert!(matches!(
            parse_features(bytes),
            Err(BaselineError::Unclassifiable { .. })
        ));
    }

    #[test]
    fn test_declared_duplicate_rejected() {
        let bytes = br#"{ "features": [
            { "name": "a", "kind": "numeric", "values": [1] },
            { "name": "a", "kind": "numeric", "values": [2] }
        ] }"#;
        assert!(matches!(parse_features(bytes), Err(BaselineError::Duplicate(_))));
    }

    #[test]
    fn test_malformed_and_empty() {
        assert!(matches!(parse_features(b"not json"), Err(BaselineError::Malformed(_))));
        assert!(matches!(parse_features(b"42"), Err(BaselineError::Malformed(_))));
        assert!(matches!(parse_features(b"{}"), Err(BaselineError::Empty)));
        assert!(matches!(parse_features(b"[]"), Err(BaselineError::Empty)));
    }

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(digest(b"abc"), digest(b"abc"));
        assert_ne!(digest(b"abc"), digest(b"abd"));
        assert_eq!(digest(b"").len(), 64);
    }
}

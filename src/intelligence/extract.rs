use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::LabValue;

/// Entry members that name the field inside an entry list.
const ENTRY_KEY_MEMBERS: [&str; 3] = ["key", "field", "name"];

// ---------------------------------------------------------------------------
// RawRecord
// ---------------------------------------------------------------------------

/// A stored test record as handed over by the storage layer.
///
/// Records come in two flavours: objects whose fields are read directly, and
/// associative containers that are queried by key. Implementors provide
/// whichever access they support; the extractor tries direct access first.
pub trait RawRecord {
    /// Direct field access.
    fn field(&self, _key: &str) -> Option<&Value> {
        None
    }

    /// Key-based retrieval from an associative container.
    fn entry(&self, _key: &str) -> Option<&Value> {
        None
    }
}

impl RawRecord for Value {
    fn field(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Entry lists: `[{"key": "fbs", "value": 7.0}]` or `[["fbs", 7.0]]`.
    fn entry(&self, key: &str) -> Option<&Value> {
        self.as_array()?.iter().find_map(|item| match item {
            Value::Object(obj) => ENTRY_KEY_MEMBERS
                .iter()
                .any(|m| obj.get(*m).and_then(Value::as_str) == Some(key))
                .then_some(item),
            Value::Array(pair) if pair.len() == 2 && pair[0].as_str() == Some(key) => {
                Some(&pair[1])
            }
            _ => None,
        })
    }
}

impl RawRecord for Map<String, Value> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl RawRecord for HashMap<String, Value> {
    fn entry(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl RawRecord for BTreeMap<String, Value> {
    fn entry(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl<T: RawRecord + ?Sized> RawRecord for &T {
    fn field(&self, key: &str) -> Option<&Value> {
        (**self).field(key)
    }

    fn entry(&self, key: &str) -> Option<&Value> {
        (**self).entry(key)
    }
}

// ---------------------------------------------------------------------------
// ExtractionError
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Field '{key}' holds an unsupported {shape}")]
    UnsupportedShape { key: String, shape: &'static str },

    #[error("Field '{key}' is an object without a `value` or `result` member")]
    MissingMember { key: String },

    #[error("Field '{key}' member `{member}` holds a {shape}, expected a scalar")]
    NestedValue {
        key: String,
        member: &'static str,
        shape: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Canonical value of `key` in `record`, or `None` when absent or malformed.
///
/// Never fails: a malformed field is logged and treated as absent so the rest
/// of the report is unaffected.
pub fn extract<R: RawRecord + ?Sized>(key: &str, record: &R) -> Option<LabValue> {
    match try_extract(key, record) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(field = key, error = %e, "Lab value extraction failed, field treated as absent");
            None
        }
    }
}

/// Like [`extract`] but reports why a present field could not be resolved.
///
/// Attempts, in order: direct field access, then container lookup. Each
/// attempt accepts a bare scalar, or an object carrying the scalar under
/// `value` (preferred) or `result`. `Ok(None)` means the key is absent or null.
pub fn try_extract<R: RawRecord + ?Sized>(
    key: &str,
    record: &R,
) -> Result<Option<LabValue>, ExtractionError> {
    let mut failure = None;

    for candidate in [record.field(key), record.entry(key)].into_iter().flatten() {
        match resolve(key, candidate) {
            Ok(Some(value)) => return Ok(Some(value)),
            Ok(None) => {}
            Err(e) => {
                failure.get_or_insert(e);
            }
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

fn resolve(key: &str, raw: &Value) -> Result<Option<LabValue>, ExtractionError> {
    match raw {
        Value::Object(obj) => {
            if let Some(inner) = obj.get("value") {
                member(key, "value", inner)
            } else if let Some(inner) = obj.get("result") {
                member(key, "result", inner)
            } else {
                Err(ExtractionError::MissingMember { key: key.into() })
            }
        }
        other => scalar(key, other),
    }
}

fn member(key: &str, member: &'static str, inner: &Value) -> Result<Option<LabValue>, ExtractionError> {
    match inner {
        Value::Object(_) | Value::Array(_) => Err(ExtractionError::NestedValue {
            key: key.into(),
            member,
            shape: shape_of(inner),
        }),
        other => scalar(key, other),
    }
}

fn scalar(key: &str, raw: &Value) -> Result<Option<LabValue>, ExtractionError> {
    if raw.is_null() {
        return Ok(None);
    }
    LabValue::from_json(raw)
        .map(Some)
        .ok_or_else(|| ExtractionError::UnsupportedShape {
            key: key.into(),
            shape: shape_of(raw),
        })
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_scalar() {
        let record = json!({"fbs": 7.0});
        assert_eq!(extract("fbs", &record), Some(LabValue::Number(7.0)));
    }

    #[test]
    fn shapes_resolve_to_same_value() {
        let expected = Some(LabValue::from("Reactive"));
        let shapes = [
            json!({"hepatitis_b": "Reactive"}),
            json!({"hepatitis_b": {"value": "Reactive"}}),
            json!({"hepatitis_b": {"result": "Reactive"}}),
            json!([{"key": "hepatitis_b", "value": "Reactive"}]),
            json!([{"field": "hepatitis_b", "result": "Reactive"}]),
            json!([["hepatitis_b", "Reactive"]]),
        ];
        for record in &shapes {
            assert_eq!(extract("hepatitis_b", record), expected, "shape {record}");
        }

        let mut map = HashMap::new();
        map.insert("hepatitis_b".to_string(), json!({"value": "Reactive"}));
        assert_eq!(extract("hepatitis_b", &map), expected);

        let mut tree = BTreeMap::new();
        tree.insert("hepatitis_b".to_string(), json!("Reactive"));
        assert_eq!(extract("hepatitis_b", &tree), expected);
    }

    #[test]
    fn value_member_preferred_over_result() {
        let record = json!({"fbs": {"value": 6.1, "result": 9.9}});
        assert_eq!(extract("fbs", &record), Some(LabValue::Number(6.1)));
    }

    #[test]
    fn absent_and_null_are_none() {
        let record = json!({"fbs": null, "bun": {"value": null}});
        assert_eq!(try_extract("fbs", &record), Ok(None));
        assert_eq!(try_extract("bun", &record), Ok(None));
        assert_eq!(try_extract("creatinine", &record), Ok(None));
        assert_eq!(extract("fbs", &json!(null)), None);
        assert_eq!(extract("fbs", &json!("just text")), None);
    }

    #[test]
    fn malformed_shapes_are_errors_but_extract_is_none() {
        let record = json!({
            "fbs": [7.0],
            "bun": {"units": "mmol/L"},
            "creatinine": {"value": {"amount": 90}},
        });
        assert!(matches!(
            try_extract("fbs", &record),
            Err(ExtractionError::UnsupportedShape { shape: "array", .. })
        ));
        assert!(matches!(
            try_extract("bun", &record),
            Err(ExtractionError::MissingMember { .. })
        ));
        assert!(matches!(
            try_extract("creatinine", &record),
            Err(ExtractionError::NestedValue { member: "value", shape: "object", .. })
        ));
        assert_eq!(extract("fbs", &record), None);
        assert_eq!(extract("bun", &record), None);
        assert_eq!(extract("creatinine", &record), None);
    }

    #[test]
    fn booleans_and_numbers_kept_as_scalars() {
        let record = json!({"nitrite": false, "urine_ph": {"result": 6}});
        assert_eq!(extract("nitrite", &record), Some(LabValue::Flag(false)));
        assert_eq!(extract("urine_ph", &record), Some(LabValue::Number(6.0)));
    }

    #[test]
    fn object_record_map_impl() {
        let record = json!({"alt_sgpt": {"value": 50}});
        let map = record.as_object().unwrap();
        assert_eq!(extract("alt_sgpt", map), Some(LabValue::Number(50.0)));
    }
}

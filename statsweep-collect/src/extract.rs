//! Tolerant numeric extraction from detail documents.
//!
//! Upstream APIs are inconsistent about how they encode counters. The same
//! field may arrive as a bare number, as a quoted string, or (when the path
//! maps over an array) as a one-element array wrapping either. All of these
//! extract to the same [`FieldValue`].
//!
//! A path that resolves to nothing is absent, not an error. A value that is
//! present but cannot be read as a number is a hard error.

use serde_json::{Number, Value};
use statsweep_core::{FieldSpec, FieldValue};
use statsweep_fetch::json_path;
use statsweep_fetch::FetchError;

/// Extracts the field described by `spec` from `document`.
///
/// # Errors
///
/// Returns `FetchError::MalformedNumericField` if the path resolves to a
/// value that cannot be read as a finite number.
pub fn extract_field(document: &Value, spec: &FieldSpec) -> Result<Option<FieldValue>, FetchError> {
    extract(document, &spec.name, &spec.path)
}

/// Extracts a numeric value at `path`, naming the field after the path.
///
/// # Errors
///
/// See [`extract_field`].
pub fn extract_path(document: &Value, path: &str) -> Result<Option<FieldValue>, FetchError> {
    extract(document, path, path)
}

fn extract(document: &Value, field: &str, path: &str) -> Result<Option<FieldValue>, FetchError> {
    let Some(resolved) = json_path::resolve(document, path) else {
        return Ok(None);
    };

    interpret(resolved.as_ref()).map_err(|()| FetchError::MalformedNumericField {
        field: field.to_string(),
        path: path.to_string(),
        value: resolved.to_string(),
    })
}

fn interpret(value: &Value) -> Result<Option<FieldValue>, ()> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => number(n).map(Some),
        Value::String(s) => parse_numeric(s).map(Some),
        Value::Array(items) => match items.as_slice() {
            [] => Ok(None),
            [Value::String(s)] => parse_numeric(strip_wrapping(s)).map(Some),
            [single] => interpret(single),
            _ => Err(()),
        },
        Value::Bool(_) | Value::Object(_) => Err(()),
    }
}

fn number(n: &Number) -> Result<FieldValue, ()> {
    if let Some(i) = n.as_i64() {
        return Ok(FieldValue::Integer(i));
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => Ok(FieldValue::Float(f)),
        _ => Err(()),
    }
}

/// Parses a base-10 integer, falling back to a finite float.
fn parse_numeric(s: &str) -> Result<FieldValue, ()> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(FieldValue::Integer(i));
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(FieldValue::Float(f)),
        _ => Err(()),
    }
}

/// Strips enclosing brackets and quote characters left over from a
/// stringified single-match array.
fn strip_wrapping(s: &str) -> &str {
    s.trim_matches(|c| c == '[' || c == ']' || c == '"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(path: &str) -> FieldSpec {
        FieldSpec::new("viewCount", path)
    }

    #[test]
    fn test_all_encodings_agree() {
        let docs = [
            json!({"stats": {"viewCount": 42}}),
            json!({"stats": {"viewCount": "42"}}),
            json!({"stats": {"viewCount": ["42"]}}),
            json!({"stats": {"viewCount": ["\"42\""]}}),
        ];
        for doc in &docs {
            let value = extract_field(doc, &spec("stats.viewCount")).unwrap();
            assert_eq!(value, Some(FieldValue::Integer(42)), "doc: {doc}");
        }
    }

    #[test]
    fn test_plain_strings_are_not_unwrapped() {
        // Bracket and quote stripping only applies to single-element arrays.
        assert!(extract_path(&json!({"v": "\"42\""}), "v").is_err());
        assert_eq!(
            extract_path(&json!({"v": ["\"42\""]}), "v").unwrap(),
            Some(FieldValue::Integer(42))
        );
    }

    #[test]
    fn test_mapped_path_single_match() {
        let doc = json!({
            "items": [{"id": "XDgC4FMftpg", "statistics": {"viewCount": "5574069", "likeCount": "843"}}]
        });
        assert_eq!(
            extract_path(&doc, "items.#.statistics.viewCount").unwrap(),
            Some(FieldValue::Integer(5_574_069))
        );
    }

    #[test]
    fn test_absent_is_not_an_error() {
        let doc = json!({"stats": {"viewCount": "42"}});
        assert_eq!(extract_path(&doc, "stats.likeCount").unwrap(), None);
        assert_eq!(extract_path(&doc, "missing.entirely").unwrap(), None);
        assert_eq!(extract_path(&json!({"v": null}), "v").unwrap(), None);
        assert_eq!(extract_path(&json!({"items": []}), "items.#.v").unwrap(), None);
    }

    #[test]
    fn test_not_a_number_is_malformed() {
        let doc = json!({"stats": {"viewCount": "not-a-number"}});
        let err = extract_field(&doc, &spec("stats.viewCount")).unwrap_err();
        match err {
            FetchError::MalformedNumericField { field, path, value } => {
                assert_eq!(field, "viewCount");
                assert_eq!(path, "stats.viewCount");
                assert!(value.contains("not-a-number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_other_shapes_are_malformed() {
        assert!(extract_path(&json!({"v": true}), "v").is_err());
        assert!(extract_path(&json!({"v": {"n": 1}}), "v").is_err());
        assert!(extract_path(&json!({"v": ["1", "2"]}), "v").is_err());
        assert!(extract_path(&json!({"v": ""}), "v").is_err());
        assert!(extract_path(&json!({"v": "NaN"}), "v").is_err());
        assert!(extract_path(&json!({"v": "inf"}), "v").is_err());
    }

    #[test]
    fn test_integer_and_float_semantics() {
        assert_eq!(
            extract_path(&json!({"v": "9007199254740993"}), "v").unwrap(),
            Some(FieldValue::Integer(9_007_199_254_740_993))
        );
        assert_eq!(
            extract_path(&json!({"v": "2.5"}), "v").unwrap(),
            Some(FieldValue::Float(2.5))
        );
        assert_eq!(
            extract_path(&json!({"v": 1.0e3}), "v").unwrap(),
            Some(FieldValue::Float(1000.0))
        );
        assert_eq!(
            extract_path(&json!({"v": u64::MAX}), "v").unwrap(),
            Some(FieldValue::Float(u64::MAX as f64))
        );
        assert_eq!(
            extract_path(&json!({"v": [7]}), "v").unwrap(),
            Some(FieldValue::Integer(7))
        );
    }
}

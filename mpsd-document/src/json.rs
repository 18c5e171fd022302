//! Best-effort field extraction over `serde_json::Value`. Session documents
//! treat almost every field as optional, so a missing or mistyped field
//! yields a type-appropriate default instead of failing the whole parse.

use serde_json::Value;

use crate::error::{Error, Result};

/// The one hard requirement a document parse has: the named field must be
/// present and non-null.
pub fn required_field<'a>(json: &'a Value, field: &'static str) -> Result<&'a Value> {
    match json.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(Error::MissingField(field)),
    }
}

pub fn optional_field<'a>(json: &'a Value, field: &str) -> Option<&'a Value> {
    json.get(field).filter(|value| !value.is_null())
}

pub fn string_field(json: &Value, field: &str) -> String {
    json.get(field).and_then(Value::as_str).unwrap_or_default().to_owned()
}

pub fn bool_field(json: &Value, field: &str) -> bool {
    json.get(field).and_then(Value::as_bool).unwrap_or_default()
}

pub fn opt_bool_field(json: &Value, field: &str) -> Option<bool> {
    json.get(field).and_then(Value::as_bool)
}

pub fn opt_u32_field(json: &Value, field: &str) -> Option<u32> {
    json.get(field).and_then(Value::as_u64).map(|value| value as u32)
}

pub fn opt_u64_field(json: &Value, field: &str) -> Option<u64> {
    json.get(field).and_then(Value::as_u64)
}

pub fn string_vec_field(json: &Value, field: &str) -> Vec<String> {
    json.get(field)
        .and_then(Value::as_array)
        .map(|values| {
            values.iter()
                  .filter_map(Value::as_str)
                  .map(str::to_owned)
                  .collect()
        })
        .unwrap_or_default()
}

pub fn u32_vec_field(json: &Value, field: &str) -> Vec<u32> {
    json.get(field)
        .and_then(Value::as_array)
        .map(|values| {
            values.iter()
                  .filter_map(Value::as_u64)
                  .map(|value| value as u32)
                  .collect()
        })
        .unwrap_or_default()
}

pub fn cloned_field(json: &Value, field: &str) -> Option<Value> {
    optional_field(json, field).cloned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_required_field_fails() {
        let doc = json!({"system": null});
        assert_eq!(required_field(&doc, "system"), Err(Error::MissingField("system")));
        assert_eq!(required_field(&doc, "custom"), Err(Error::MissingField("custom")));
    }

    #[test]
    fn optional_extraction_defaults() {
        let doc = json!({"keywords": ["a", "b"], "turn": [2, 0], "closed": true});

        assert_eq!(string_vec_field(&doc, "keywords"), vec!["a", "b"]);
        assert_eq!(u32_vec_field(&doc, "turn"), vec![2, 0]);
        assert!(bool_field(&doc, "closed"));
        assert!(!bool_field(&doc, "locked"));
        assert_eq!(string_field(&doc, "host"), "");
        assert!(string_vec_field(&doc, "owners").is_empty());
    }

    #[test]
    fn mistyped_fields_fall_back() {
        let doc = json!({"keywords": "not-an-array", "turn": [1, "x", 3]});

        assert!(string_vec_field(&doc, "keywords").is_empty());
        assert_eq!(u32_vec_field(&doc, "turn"), vec![1, 3]);
    }
}

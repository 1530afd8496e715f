//! Lightweight structural JSON-Schema (Draft 2020-12 subset) validation.
//!
//! Not a full implementation: supports `type`, `required`, `properties`,
//! `items`, and `enum`, which covers the tool-argument and structured-output
//! shapes this harness validates. Collects every violation instead of
//! failing fast, since callers here want the full error list rather than a
//! single pass/fail.

use serde_json::Value;

/// Validate `document` against `schema`, returning every violation found.
///
/// Returns `None` if the schema is empty (`null` or `{}`) — an empty schema
/// imposes no constraints — or if `document` satisfies every constraint.
#[must_use]
pub fn validate_schema(document: &Value, schema: &Value) -> Option<Vec<String>> {
    if is_empty_schema(schema) {
        return None;
    }
    let mut errors = Vec::new();
    check(document, schema, "$", &mut errors);
    if errors.is_empty() {
        None
    } else {
        Some(errors)
    }
}

fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn check(document: &Value, schema: &Value, path: &str, errors: &mut Vec<String>) {
    let Value::Object(schema) = schema else {
        return;
    };

    if let Some(expected_type) = schema.get("type").and_then(Value::as_str) {
        if !matches_type(document, expected_type) {
            errors.push(format!("{path}: expected type {expected_type}, got {}", type_name(document)));
            return;
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(document) {
            errors.push(format!("{path}: value is not one of the allowed enum values"));
        }
    }

    if let Value::Object(doc_fields) = document {
        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for field in required {
                if let Some(name) = field.as_str() {
                    if !doc_fields.contains_key(name) {
                        errors.push(format!("{path}: missing required field '{name}'"));
                    }
                }
            }
        }
        if let Some(Value::Object(properties)) = schema.get("properties") {
            for (name, sub_schema) in properties {
                if let Some(value) = doc_fields.get(name) {
                    check(value, sub_schema, &format!("{path}.{name}"), errors);
                }
            }
        }
    }

    if let Value::Array(items) = document {
        if let Some(item_schema) = schema.get("items") {
            for (i, item) in items.iter().enumerate() {
                check(item, item_schema, &format!("{path}[{i}]"), errors);
            }
        }
    }
}

fn matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
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
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_schema_always_valid() {
        assert_eq!(validate_schema(&json!({"anything": true}), &json!(null)), None);
        assert_eq!(validate_schema(&json!({"anything": true}), &json!({})), None);
    }

    #[test]
    fn missing_required_field_reported() {
        let schema = json!({"type": "object", "required": ["name"]});
        let errors = validate_schema(&json!({}), &schema).unwrap();
        assert!(errors.iter().any(|e| e.contains("name")));
    }

    #[test]
    fn type_mismatch_reported() {
        let schema = json!({"type": "string"});
        let errors = validate_schema(&json!(42), &schema).unwrap();
        assert!(errors[0].contains("expected type string"));
    }

    #[test]
    fn nested_property_type_checked() {
        let schema = json!({
            "type": "object",
            "properties": {"count": {"type": "integer"}}
        });
        let errors = validate_schema(&json!({"count": "not a number"}), &schema).unwrap();
        assert!(errors.iter().any(|e| e.contains("count")));
    }

    #[test]
    fn valid_document_has_no_errors() {
        let schema = json!({
            "type": "object",
            "required": ["name"],
            "properties": {"name": {"type": "string"}}
        });
        assert_eq!(validate_schema(&json!({"name": "a"}), &schema), None);
    }

    #[test]
    fn collects_multiple_errors() {
        let schema = json!({
            "type": "object",
            "required": ["a", "b"],
        });
        let errors = validate_schema(&json!({}), &schema).unwrap();
        assert_eq!(errors.len(), 2);
    }
}

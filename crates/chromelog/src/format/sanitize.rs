//! Pure cleanup of producer-supplied argument trees.
//!
//! Payload objects end up as inspectable values in a JavaScript console, so
//! keys that would touch the prototype chain there are dropped. Owned
//! `serde_json::Value` trees cannot contain cycles and parsing bounds their
//! depth, so plain recursion always terminates.

use serde_json::{Map, Value};

/// Object keys removed at every depth
pub const DENIED_KEYS: [&str; 2] = ["__proto__", "prototype"];

/// Return a copy of `value` without denied keys.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(obj) => Value::Object(sanitize_object(obj)),
        scalar => scalar.clone(),
    }
}

fn sanitize_object(obj: &Map<String, Value>) -> Map<String, Value> {
    obj.iter()
        .filter(|(key, _)| !is_denied(key))
        .map(|(key, value)| (key.clone(), sanitize(value)))
        .collect()
}

fn is_denied(key: &str) -> bool {
    DENIED_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_unchanged() {
        for value in [json!(null), json!(true), json!(1.5), json!("__proto__")] {
            assert_eq!(sanitize(&value), value);
        }
    }

    #[test]
    fn test_drops_denied_keys_at_top_level() {
        let value = json!({"__proto__": {"admin": true}, "prototype": 1, "name": "x"});
        assert_eq!(sanitize(&value), json!({"name": "x"}));
    }

    #[test]
    fn test_drops_denied_keys_inside_arrays() {
        let value = json!([{"a": {"__proto__": null, "b": [ {"prototype": 2, "c": 3} ]}}]);
        assert_eq!(sanitize(&value), json!([{"a": {"b": [ {"c": 3} ]}}]));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let value = json!({"__proto__": 1});
        let cleaned = sanitize(&value);
        assert!(value.get("__proto__").is_some());
        assert!(cleaned.get("__proto__").is_none());
    }

    #[test]
    fn test_other_keys_are_kept() {
        let value = json!({"k": [1, {"__proto__": 0, "constructor": "kept"}], "prototype": []});
        assert_eq!(sanitize(&value), json!({"k": [1, {"constructor": "kept"}]}));
    }
}

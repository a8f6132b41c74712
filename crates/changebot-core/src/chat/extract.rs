//! Response-shape normalization.
//!
//! The webhook answers with an arbitrary JSON value. This module maps it to
//! the text shown in the transcript.

use serde_json::Value;

/// Object keys searched for the reply text, in priority order.
pub const REPLY_KEYS: [&str; 6] = ["response", "message", "text", "answer", "content", "output"];

/// Map a webhook response body to display text.
///
/// - Objects: the value of the first key from [`REPLY_KEYS`] that is present
///   (list order, not object order). No matching key yields an empty string.
/// - Strings: returned unchanged.
/// - Anything else: its JSON representation (`42`, `true`, `null`, `[1,2]`).
pub fn extract_display_text(body: &Value) -> String {
    match body {
        Value::Object(map) => REPLY_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .map(value_to_text)
            .unwrap_or_default(),
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(_) | Value::Null | Value::Array(_) => body.to_string(),
    }
}

/// Whether a parsed body carries nothing to show.
///
/// `null`, `false`, zero, and empty strings, arrays and objects are treated
/// as a failed exchange rather than a reply. A non-empty object whose reply
/// field is empty (`{"response": ""}`) is still a reply.
pub fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Text for a matched field: strings verbatim, other values as compact JSON.
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_known_key() {
        assert_eq!(extract_display_text(&json!({ "answer": "hi" })), "hi");
        assert_eq!(extract_display_text(&json!({ "output": "done" })), "done");
    }

    #[test]
    fn test_priority_order_wins_over_object_order() {
        let body = json!({ "text": "a", "response": "b" });
        assert_eq!(extract_display_text(&body), "b");

        let body = json!({ "output": "z", "content": "y", "answer": "x" });
        assert_eq!(extract_display_text(&body), "x");
    }

    #[test]
    fn test_unknown_keys_yield_empty() {
        assert_eq!(extract_display_text(&json!({ "unknown": "x" })), "");
        assert_eq!(extract_display_text(&json!({})), "");
    }

    #[test]
    fn test_plain_string_passthrough() {
        assert_eq!(extract_display_text(&json!("plain string")), "plain string");
        assert_eq!(extract_display_text(&json!("")), "");
    }

    #[test]
    fn test_scalars_and_arrays_stringified() {
        assert_eq!(extract_display_text(&json!(42)), "42");
        assert_eq!(extract_display_text(&json!(1.5)), "1.5");
        assert_eq!(extract_display_text(&json!(true)), "true");
        assert_eq!(extract_display_text(&Value::Null), "null");
        assert_eq!(extract_display_text(&json!([1, "a"])), r#"[1,"a"]"#);
    }

    #[test]
    fn test_empty_bodies() {
        for body in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_empty_body(&body), "{body} should count as empty");
        }
    }

    #[test]
    fn test_non_empty_bodies() {
        for body in [
            json!(true),
            json!(-1),
            json!(" "),
            json!([0]),
            json!({ "response": "" }),
            json!({ "unknown": "x" }),
        ] {
            assert!(!is_empty_body(&body), "{body} should not count as empty");
        }
    }

    #[test]
    fn test_non_string_field_value() {
        assert_eq!(extract_display_text(&json!({ "message": 7 })), "7");
        assert_eq!(
            extract_display_text(&json!({ "response": { "nested": true } })),
            r#"{"nested":true}"#
        );
        // A present-but-null key still wins over later keys.
        assert_eq!(
            extract_display_text(&json!({ "response": null, "text": "later" })),
            "null"
        );
    }
}

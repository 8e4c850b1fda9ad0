// argus-core/src/domain/canonical.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value safe to store as a graph property.
///
/// The graph store only accepts scalars (or homogeneous arrays, which we do
/// not use): nested structures are flattened to their JSON text form.
/// Strings and flattened structures are lowercased so graph queries are
/// case-insensitive by construction; numbers, booleans and null keep their
/// type and value untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl CanonicalValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CanonicalValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CanonicalValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<CanonicalValue> for Value {
    fn from(v: CanonicalValue) -> Self {
        match v {
            CanonicalValue::Null => Value::Null,
            CanonicalValue::Bool(b) => Value::Bool(b),
            CanonicalValue::Int(n) => Value::from(n),
            CanonicalValue::Float(f) => Value::from(f),
            CanonicalValue::Str(s) => Value::String(s),
        }
    }
}

impl From<&str> for CanonicalValue {
    fn from(s: &str) -> Self {
        CanonicalValue::Str(s.to_lowercase())
    }
}

impl std::fmt::Display for CanonicalValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanonicalValue::Null => write!(f, "null"),
            CanonicalValue::Bool(b) => write!(f, "{}", b),
            CanonicalValue::Int(n) => write!(f, "{}", n),
            CanonicalValue::Float(x) => write!(f, "{}", x),
            CanonicalValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Normalizes an arbitrary document value into a graph-storable scalar.
///
/// - strings are lowercased as-is
/// - numbers / booleans / null are returned unchanged (type preserved)
/// - arrays and objects are serialized to JSON text (nested order and
///   types preserved) and the whole serialized string is lowercased
///
/// Idempotent: re-canonicalizing any output yields the same output.
pub fn canonicalize(value: &Value) -> CanonicalValue {
    match value {
        Value::Null => CanonicalValue::Null,
        Value::Bool(b) => CanonicalValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                CanonicalValue::Int(i)
            } else {
                CanonicalValue::Float(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => CanonicalValue::Str(s.to_lowercase()),
        Value::Array(_) | Value::Object(_) => {
            // serde_json preserves object insertion order only with the
            // `preserve_order` feature; map keys here come from documents
            // whose key order is not contractual, so the textual form is
            // deterministic either way.
            let text = serde_json::to_string(value).unwrap_or_default();
            CanonicalValue::Str(text.to_lowercase())
        }
    }
}

/// Property keys are lowercased independently of their values.
pub fn property_key(key: &str) -> String {
    key.to_lowercase()
}

/// Node labels: lowercase, every non-alphanumeric character replaced with
/// `_`. An empty or missing label falls back to the `unknown` sentinel.
pub fn sanitize_label(label: &str) -> String {
    if label.trim().is_empty() {
        return "unknown".to_string();
    }
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roundtrip(v: &Value) -> CanonicalValue {
        let once = canonicalize(v);
        canonicalize(&Value::from(once))
    }

    #[test]
    fn test_scalar_types_preserved() {
        assert_eq!(canonicalize(&json!(42)), CanonicalValue::Int(42));
        assert_eq!(canonicalize(&json!(true)), CanonicalValue::Bool(true));
        assert_eq!(canonicalize(&json!(null)), CanonicalValue::Null);
        assert_eq!(canonicalize(&json!(1.5)), CanonicalValue::Float(1.5));
    }

    #[test]
    fn test_string_lowercased() {
        assert_eq!(
            canonicalize(&json!("AbC")),
            CanonicalValue::Str("abc".to_string())
        );
    }

    #[test]
    fn test_nested_structure_flattened_and_lowercased() {
        let v = json!({"Region": "EU-West-1", "Tags": ["Prod", "Web"]});
        let canon = canonicalize(&v);
        let text = canon.as_str().unwrap();
        assert!(text.contains("\"region\""));
        assert!(text.contains("eu-west-1"));
        assert!(text.contains("prod"));
        // It must be parseable JSON text, not a debug dump.
        let reparsed: Value = serde_json::from_str(text).unwrap();
        assert!(reparsed.is_object());
    }

    #[test]
    fn test_idempotence() {
        for v in [
            json!("MiXeD"),
            json!(7),
            json!(false),
            json!(null),
            json!(2.25),
            json!({"A": [1, "B"]}),
            json!(["X", {"Y": 2}]),
        ] {
            let once = canonicalize(&v);
            assert_eq!(roundtrip(&v), once);
        }
    }

    #[test]
    fn test_timestamp_strings_follow_the_string_rule() {
        let canon = canonicalize(&json!("2025-03-19T12:00:00Z"));
        assert_eq!(canon.as_str().unwrap(), "2025-03-19t12:00:00z");
    }

    #[test]
    fn test_label_sanitization() {
        assert_eq!(sanitize_label("AWS S3-Bucket"), "aws_s3_bucket");
        assert_eq!(sanitize_label(""), "unknown");
        assert_eq!(sanitize_label("   "), "unknown");
        assert_eq!(sanitize_label("ec2_instance"), "ec2_instance");
    }

    #[test]
    fn test_property_key_lowercased() {
        assert_eq!(property_key("InstanceId"), "instanceid");
    }
}

//! Canonical hashing of generated subtrees.
//!
//! Two builds of the same skeleton with the same parameters must produce the
//! same graph. The check hashes the subtree manifest:
//!
//! ```text
//! graph_hash = hex(BLAKE3(JCS(manifest_json)))
//! ```
//!
//! Where JCS is JSON Canonicalization Scheme per RFC 8785.

use crate::scene::SubtreeManifest;

/// Computes the canonical BLAKE3 hash of a subtree manifest.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn manifest_hash(manifest: &SubtreeManifest) -> serde_json::Result<String> {
    let value = serde_json::to_value(manifest)?;
    Ok(canonical_value_hash(&value))
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> String {
    let canonical = canonicalize_json(value);
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

/// Canonicalizes a JSON value according to RFC 8785 (JCS).
///
/// Keys are sorted and no whitespace is emitted. Strings and non-integral
/// numbers reuse serde_json's escaping and shortest round-trip formatting.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    use serde_json::Value;

    match value {
        Value::Number(n) => out.push_str(&canonical_number(n)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(v) = map.get(key) {
                    write_canonical(v, out);
                }
            }
            out.push('}');
        }
        Value::Null | Value::Bool(_) | Value::String(_) => out.push_str(&value.to_string()),
    }
}

/// Integral floats print without a fraction; negative zero prints as `0`.
fn canonical_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() => {
            if f == 0.0 {
                "0".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e15 {
                (f as i64).to_string()
            } else {
                n.to_string()
            }
        }
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_key_order() {
        let a = json!({"b": 1, "a": [true, null], "c": {"z": 0.5, "y": "x"}});
        let b = json!({"c": {"y": "x", "z": 0.5}, "a": [true, null], "b": 1});
        assert_eq!(
            canonicalize_json(&a),
            r#"{"a":[true,null],"b":1,"c":{"y":"x","z":0.5}}"#
        );
        assert_eq!(canonical_value_hash(&a), canonical_value_hash(&b));
        assert_eq!(canonical_value_hash(&a).len(), 64);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(canonicalize_json(&json!(3.0)), "3");
        assert_eq!(canonicalize_json(&json!(-0.0)), "0");
        assert_eq!(canonicalize_json(&json!(3.25)), "3.25");
        assert_eq!(canonicalize_json(&json!("a\"b\n")), r#""a\"b\n""#);
        assert_eq!(canonicalize_json(&json!(-12)), "-12");
        assert_eq!(canonicalize_json(&json!([1.5, {"k\t": -2.0}])), r#"[1.5,{"k\t":-2}]"#);
    }
}

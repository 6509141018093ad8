//! # Canonical JSON Serialization
//!
//! Every payload that gets hashed or signed passes through here first.
//! The canonical form is JSON with:
//!
//! - object keys sorted lexicographically at every nesting level,
//! - no insignificant whitespace,
//! - standard JSON escaping for strings.
//!
//! Invariant: two structurally equal values canonicalize to byte-identical
//! output regardless of the key insertion order of the source maps. A
//! signature over the canonical bytes can therefore be re-verified by any
//! party that holds a structurally equal copy of the payload.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The payload could not be reduced to canonical JSON.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// Conversion to a JSON value failed (non-string map keys, failing
    /// `Serialize` impls, non-finite floats).
    #[error("payload cannot be canonicalized: {0}")]
    Unserializable(String),
}

/// Canonicalize any serializable payload into signing-input bytes.
pub fn canonicalize<T: Serialize>(payload: &T) -> Result<Vec<u8>, SerializationError> {
    let value = serde_json::to_value(payload)
        .map_err(|e| SerializationError::Unserializable(e.to_string()))?;
    Ok(canonical_json(&value).into_bytes())
}

/// Render a JSON value in canonical form.
///
/// Sorting is applied explicitly at every level so the invariant does not
/// depend on the map type behind `serde_json::Value`.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Value::String formatting gives standard JSON escaping.
                write_value(out, &Value::String((*key).clone()));
                out.push(':');
                write_value(out, &map[*key]);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        leaf => out.push_str(&leaf.to_string()),
    }
}

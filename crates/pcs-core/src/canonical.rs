//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only input accepted by the digest functions. It is
//! produced by serializing a value to JSON, rejecting any non-integer number,
//! and re-serializing with `serde_jcs` (RFC 8785: sorted keys, compact
//! separators).
//!
//! Calculation results carry only integer cents and integer confidences, so
//! a float reaching this module means a type upstream is leaking `f64` into
//! something that gets fingerprinted.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// A calculation snapshot in RFC 8785 form, ready to hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize a serializable value.
    ///
    /// # Errors
    ///
    /// [`CanonicalizationError::FloatRejected`] for the first fractional or
    /// out-of-range number found, depth first.
    pub fn new(value: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let tree = serde_json::to_value(value)?;
        if let Some(f) = first_float(&tree) {
            return Err(CanonicalizationError::FloatRejected(f));
        }
        Ok(Self(serde_jcs::to_vec(&tree)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn first_float(tree: &Value) -> Option<f64> {
    match tree {
        Value::Number(n) if n.is_f64() => n.as_f64(),
        Value::Array(items) => items.iter().find_map(first_float),
        Value::Object(fields) => fields.values().find_map(first_float),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sorted_and_compact() {
        let data = serde_json::json!({"total": 5, "dla": {"confidence": 100, "amount": 150000}});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"dla":{"amount":150000,"confidence":100},"total":5}"#
        );
    }

    #[test]
    fn nested_float_is_rejected() {
        let data = serde_json::json!({"lines": [{"amount": 12.5}]});
        match CanonicalBytes::new(&data) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 12.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn integers_and_strings_pass() {
        let data = serde_json::json!({"amount": "868.20", "cents": 86820, "neg": -1});
        assert!(!CanonicalBytes::new(&data).unwrap().is_empty());
    }

    #[test]
    fn field_order_does_not_change_bytes() {
        let a = serde_json::json!({"a": 1, "b": [1, 2]});
        let b = serde_json::json!({"b": [1, 2], "a": 1});
        assert_eq!(CanonicalBytes::new(&a).unwrap(), CanonicalBytes::new(&b).unwrap());
    }
}

// Copyright 2025 the Fieldset Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value helpers and conversion between representations.

use core::fmt::Debug;

pub use serde_json::{Map, Value};

/// True if `value` carries no user input: `null`, `""`, `[]` or `{}`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Converts a field's model value to and from its other representations.
///
/// Every method defaults to the identity, so a codec only overrides what differs.
pub trait Codec: Debug {
    /// Model → formatted (what the user sees).
    fn format(&self, model: &Value) -> Value {
        model.clone()
    }

    /// Formatted → model.
    fn parse(&self, formatted: &Value) -> Value {
        formatted.clone()
    }

    /// Model → serialized.
    fn serialize(&self, model: &Value) -> Value {
        model.clone()
    }

    /// Serialized → model.
    fn deserialize(&self, serialized: &Value) -> Value {
        serialized.clone()
    }
}

/// The codec used when none is given: all three representations are the model value.
#[derive(Copy, Clone, Debug, Default)]
pub struct IdentityCodec;

impl Codec for IdentityCodec {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emptiness() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!([])));
        assert!(is_empty(&json!({})));
        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!(false)));
        assert!(!is_empty(&json!(" ")));
    }
}

// cloud-gate-core/src/core/params.rs
// ============================================================================
// Module: Typed Parameters
// Description: Coerced parameter mapping produced by the validator.
// Purpose: Give handlers typed access to validated operation parameters.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`TypedParameters`] is the validator's output: a mapping from field name to
//! coerced value. Every required field is present and every present field has
//! passed coercion and constraints, so handler accessors can stay simple.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Typed Parameters
// ============================================================================

/// Validated, coerced parameters for one operation invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypedParameters(BTreeMap<String, Value>);

impl TypedParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a coerced value under a field name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Returns the raw coerced value for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a string field.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Returns an integer field.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    /// Returns a boolean field.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    /// Returns a sequence field.
    #[must_use]
    pub fn sequence(&self, name: &str) -> Option<&Vec<Value>> {
        self.0.get(name).and_then(Value::as_array)
    }

    /// Returns the number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over field name/value pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Converts the parameters into a JSON object value.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut map = Map::new();
        for (name, value) in self.0 {
            map.insert(name, value);
        }
        Value::Object(map)
    }
}

impl FromIterator<(String, Value)> for TypedParameters {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//! User inputs: a flat mapping from field name to primitive value, with a
//! canonical serialization used as the cache key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A primitive input value. The UI boundary only ever hands the core
/// numbers, text, or stringified selection ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Number(i64),
    Text(String),
}

impl InputValue {
    /// Numeric view. Text that parses as an integer counts (selection ids
    /// arrive stringified from some frontends).
    pub fn as_number(&self) -> Option<i64> {
        match self {
            InputValue::Number(n) => Some(*n),
            InputValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for InputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputValue::Number(n) => write!(f, "{n}"),
            InputValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for InputValue {
    fn from(n: i64) -> Self {
        InputValue::Number(n)
    }
}

impl From<i32> for InputValue {
    fn from(n: i32) -> Self {
        InputValue::Number(n.into())
    }
}

impl From<u32> for InputValue {
    fn from(n: u32) -> Self {
        InputValue::Number(n.into())
    }
}

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

/// A flat field-name -> value mapping.
///
/// Backed by a `BTreeMap`, so two input sets with the same entries are equal
/// and serialize identically no matter what order fields were inserted in.
/// That property is load-bearing: [`Inputs::canonical`] is the cache key,
/// and reordered-but-equal inputs must hit the same cache entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inputs(BTreeMap<String, InputValue>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<InputValue>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&InputValue> {
        self.0.get(field)
    }

    /// Numeric view of a field; absent or non-numeric reads as `None`.
    pub fn number(&self, field: &str) -> Option<i64> {
        self.0.get(field).and_then(InputValue::as_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The deterministic, key-order-independent encoding of this input set.
    /// Sorted-key JSON: equal inputs always produce identical strings.
    pub fn canonical(&self) -> String {
        // BTreeMap serializes in sorted key order; i64 and String encodings
        // are unambiguous, so this is canonical without further work.
        serde_json::to_string(&self.0).expect("inputs are always serializable")
    }
}

impl<K: Into<String>, V: Into<InputValue>> FromIterator<(K, V)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

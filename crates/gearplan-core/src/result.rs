//! Calculation results: immutable, value-comparable output records.

use crate::amount::Amount;
use crate::inputs::Inputs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named output of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    Flag(bool),
    Amount(Amount),
}

impl OutputValue {
    pub fn as_amount(&self) -> Option<Amount> {
        match self {
            OutputValue::Amount(a) => Some(*a),
            OutputValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OutputValue::Flag(f) => Some(*f),
            OutputValue::Amount(_) => None,
        }
    }
}

impl std::fmt::Display for OutputValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputValue::Amount(a) => write!(f, "{a}"),
            OutputValue::Flag(b) => write!(f, "{b}"),
        }
    }
}

/// The named outputs of a calculation, sorted by name.
pub type Outputs = BTreeMap<String, OutputValue>;

/// The outcome of one calculation: outputs plus provenance. Immutable once
/// produced; safe to cache, persist, and compare by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The tool that produced this result.
    pub tool_id: String,
    /// RFC 3339 timestamp of the computation. A cache hit echoes the stored
    /// stamp; it is never refreshed.
    pub timestamp: String,
    /// The raw inputs, echoed for reproducibility.
    pub inputs: Inputs,
    /// Named numeric/boolean outputs.
    pub outputs: Outputs,
}

impl CalculationResult {
    pub fn output(&self, name: &str) -> Option<&OutputValue> {
        self.outputs.get(name)
    }

    /// Amount output, or 0 when absent or boolean.
    pub fn amount(&self, name: &str) -> Amount {
        self.outputs
            .get(name)
            .and_then(OutputValue::as_amount)
            .unwrap_or(0)
    }

    /// Flag output, or `false` when absent or numeric.
    pub fn flag(&self, name: &str) -> bool {
        self.outputs
            .get(name)
            .and_then(OutputValue::as_flag)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CalculationResult {
        let mut outputs = Outputs::new();
        outputs.insert("need_silk".into(), OutputValue::Amount(17700));
        outputs.insert("sufficient".into(), OutputValue::Flag(false));
        CalculationResult {
            tool_id: "equipment".into(),
            timestamp: "2024-05-01T12:00:00+00:00".into(),
            inputs: Inputs::new().with("hat_current", 2).with("hat_target", 5),
            outputs,
        }
    }

    #[test]
    fn typed_accessors() {
        let result = sample();
        assert_eq!(result.amount("need_silk"), 17700);
        assert!(!result.flag("sufficient"));
        assert_eq!(result.amount("missing"), 0);
        assert!(!result.flag("need_silk"));
    }

    #[test]
    fn equality_is_by_value() {
        assert_eq!(sample(), sample());
        let mut other = sample();
        other.outputs.insert("need_silk".into(), OutputValue::Amount(1));
        assert_ne!(sample(), other);
    }

    #[test]
    fn serde_round_trip() {
        let result = sample();
        let json = serde_json::to_string(&result).unwrap();
        let restored: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, restored);
    }
}

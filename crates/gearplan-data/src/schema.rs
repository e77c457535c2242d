//! Serde structs for progression-table data files.
//!
//! These define the on-disk shape only; the loader resolves them into
//! engine types and runs the table invariants (non-empty, duplicate-free).

use serde::Deserialize;
use std::collections::BTreeMap;

/// A progression table in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct TableData {
    /// Stable table id, referenced by slot bindings.
    pub id: String,
    pub steps: Vec<StepData>,
}

/// One step row. `costs` maps resource names to non-negative amounts;
/// resources a row leaves out read as zero during aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct StepData {
    pub index: u32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub costs: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let json = r#"{
            "id": "equipment",
            "steps": [
                {"index": 1, "label": "Good ★0", "costs": {"silk": 1500, "thread": 15}},
                {"index": 2, "costs": {"silk": 3800, "thread": 40}}
            ]
        }"#;
        let data: TableData = serde_json::from_str(json).unwrap();
        assert_eq!(data.id, "equipment");
        assert_eq!(data.steps.len(), 2);
        assert_eq!(data.steps[0].costs["silk"], 1500);
        assert!(data.steps[1].label.is_none());
    }

    #[test]
    fn missing_costs_default_empty() {
        let json = r#"{"id": "t", "steps": [{"index": 0}]}"#;
        let data: TableData = serde_json::from_str(json).unwrap();
        assert!(data.steps[0].costs.is_empty());
    }
}

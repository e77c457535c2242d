//! Field-level comparison of two calculation results.
//!
//! Used by frontends to compare saved plans ("how much more does the mythic
//! push cost than stopping at legend"). The diff is purely structural; it
//! never interprets field meanings.

use crate::result::{CalculationResult, OutputValue};

/// Difference in one output field between results A and B.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDelta {
    /// Present only in A.
    OnlyInA { name: String, value: OutputValue },
    /// Present only in B.
    OnlyInB { name: String, value: OutputValue },
    /// Present in both with different values.
    Changed {
        name: String,
        a: OutputValue,
        b: OutputValue,
    },
}

/// Full diff between two results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultDiff {
    /// True when outputs, inputs, and tool id all match.
    pub identical: bool,
    pub same_tool: bool,
    pub same_inputs: bool,
    /// Output fields that differ, sorted by field name.
    pub fields: Vec<FieldDelta>,
}

/// Compute a field-level diff between two results.
pub fn diff_results(a: &CalculationResult, b: &CalculationResult) -> ResultDiff {
    let mut fields = Vec::new();

    for (name, value_a) in &a.outputs {
        match b.outputs.get(name) {
            None => fields.push(FieldDelta::OnlyInA {
                name: name.clone(),
                value: *value_a,
            }),
            Some(value_b) if value_b != value_a => fields.push(FieldDelta::Changed {
                name: name.clone(),
                a: *value_a,
                b: *value_b,
            }),
            Some(_) => {}
        }
    }
    for (name, value_b) in &b.outputs {
        if !a.outputs.contains_key(name) {
            fields.push(FieldDelta::OnlyInB {
                name: name.clone(),
                value: *value_b,
            });
        }
    }
    fields.sort_by(|x, y| delta_name(x).cmp(delta_name(y)));

    let same_tool = a.tool_id == b.tool_id;
    let same_inputs = a.inputs == b.inputs;
    ResultDiff {
        identical: fields.is_empty() && same_tool && same_inputs,
        same_tool,
        same_inputs,
        fields,
    }
}

fn delta_name(delta: &FieldDelta) -> &str {
    match delta {
        FieldDelta::OnlyInA { name, .. }
        | FieldDelta::OnlyInB { name, .. }
        | FieldDelta::Changed { name, .. } => name,
    }
}

//! Declarative input-field descriptors for a tool's schema.

use crate::inputs::InputValue;
use crate::table::ProgressionTable;
use serde::{Deserialize, Serialize};

/// One option of a selection field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// The value submitted when this option is chosen (a step index for
    /// table-backed selections).
    pub value: i64,
    /// Display label, opaque to the core.
    pub label: String,
}

/// What kind of value a field accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A choice among fixed options.
    Selection(Vec<SelectOption>),
    /// A number, optionally bounded on either side (inclusive).
    Numeric { min: Option<i64>, max: Option<i64> },
    /// Free text. Never validated.
    Text,
}

/// One input field in a tool's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub default: Option<InputValue>,
}

impl FieldDef {
    pub fn selection(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
        default: i64,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Selection(options),
            default: Some(InputValue::Number(default)),
        }
    }

    pub fn numeric(
        name: impl Into<String>,
        label: impl Into<String>,
        min: Option<i64>,
        max: Option<i64>,
        default: i64,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Numeric { min, max },
            default: Some(InputValue::Number(default)),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: FieldKind::Text,
            default: None,
        }
    }

    /// Check a submitted value against this field. `None` means valid;
    /// `Some` carries the violation message. A missing input is always
    /// valid (the default applies downstream).
    pub fn violation(&self, value: Option<&InputValue>) -> Option<String> {
        let Some(value) = value else {
            return None;
        };
        match &self.kind {
            FieldKind::Text => None,
            FieldKind::Numeric { min, max } => {
                let Some(n) = value.as_number() else {
                    return Some(format!("field \"{}\" expects a number", self.name));
                };
                if let Some(min) = min
                    && n < *min
                {
                    return Some(format!("field \"{}\" is below minimum {min}", self.name));
                }
                if let Some(max) = max
                    && n > *max
                {
                    return Some(format!("field \"{}\" is above maximum {max}", self.name));
                }
                None
            }
            FieldKind::Selection(options) => {
                let Some(n) = value.as_number() else {
                    return Some(format!(
                        "field \"{}\" expects a selection value",
                        self.name
                    ));
                };
                if options.iter().any(|o| o.value == n) {
                    None
                } else {
                    Some(format!(
                        "field \"{}\" has no option with value {n}",
                        self.name
                    ))
                }
            }
        }
    }
}

/// Build selection options from a table's steps, using each step's label
/// (or its index when unlabeled).
pub fn options_from_table(table: &ProgressionTable) -> Vec<SelectOption> {
    table
        .steps()
        .iter()
        .map(|step| SelectOption {
            value: i64::from(step.index.0),
            label: step
                .label
                .clone()
                .unwrap_or_else(|| step.index.0.to_string()),
        })
        .collect()
}

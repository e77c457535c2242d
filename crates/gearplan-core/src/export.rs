//! Built-in text export formats for calculation results.
//!
//! Formats are a closed enum; unknown format strings are rejected at the
//! boundary with [`crate::engine::EngineError::UnsupportedFormat`] instead
//! of falling through a string switch. Tools can pre-empt the built-ins
//! with an [`crate::tool::ExportOverride`].

use crate::result::CalculationResult;
use std::fmt::Write;

/// The built-in export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Sectioned human-readable text.
    StructuredText,
    /// Flat `key=value` lines.
    KeyValue,
    /// Comma-delimited rows.
    DelimitedRows,
}

impl ExportFormat {
    /// Parse a caller-supplied format string. `None` for anything
    /// unrecognized; the engine turns that into `UnsupportedFormat`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "structured-text" | "text" => Some(Self::StructuredText),
            "flat-key-value-text" | "key-value" | "kv" => Some(Self::KeyValue),
            "delimited-rows" | "csv" => Some(Self::DelimitedRows),
            _ => None,
        }
    }

    /// Render `result` in this format.
    pub fn render(self, result: &CalculationResult) -> String {
        match self {
            Self::StructuredText => structured_text(result),
            Self::KeyValue => key_value(result),
            Self::DelimitedRows => delimited_rows(result),
        }
    }
}

fn structured_text(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", result.tool_id);
    let _ = writeln!(out, "time: {}", result.timestamp);
    let _ = writeln!(out);
    let _ = writeln!(out, "inputs:");
    for (name, value) in result.inputs.iter() {
        let _ = writeln!(out, "  {name}: {value}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "results:");
    for (name, value) in &result.outputs {
        let _ = writeln!(out, "  {name}: {value}");
    }
    out
}

fn key_value(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "tool={}", result.tool_id);
    let _ = writeln!(out, "time={}", result.timestamp);
    for (name, value) in result.inputs.iter() {
        let _ = writeln!(out, "input.{name}={value}");
    }
    for (name, value) in &result.outputs {
        let _ = writeln!(out, "{name}={value}");
    }
    out
}

fn delimited_rows(result: &CalculationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tool,{}", result.tool_id);
    let _ = writeln!(out, "Time,{}", result.timestamp);
    let _ = writeln!(out);
    let _ = writeln!(out, "Inputs:");
    for (name, value) in result.inputs.iter() {
        let _ = writeln!(out, "{name},{value}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Results:");
    for (name, value) in &result.outputs {
        let _ = writeln!(out, "{name},{value}");
    }
    out
}

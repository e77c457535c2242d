//! The engine: tool registry plus result cache.
//!
//! Tools are registered once at startup and frozen; per-request operations
//! (`calculate`, `export`) return structured errors and never panic, log,
//! or hand back partial results. Registration warnings come back as data
//! for the caller to surface.

use crate::cache::{ResultCache, cache_key};
use crate::export::ExportFormat;
use crate::inputs::Inputs;
use crate::result::CalculationResult;
use crate::table::{StepIndex, TableError};
use crate::tool::{AggregateError, TableSet, Tool, ToolSpec};
use chrono::Utc;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Errors and warnings
// ---------------------------------------------------------------------------

/// Errors raised by engine operations.
///
/// Registration errors (`DuplicateTool`, `InvalidToolConfig`, `Table`) are
/// fatal for that tool: the registry is left unchanged. Request errors
/// (`ToolNotFound`, `Validation`, `Calculation`, `UnsupportedFormat`) are
/// recovered at the request boundary and carried to the caller as values.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("tool \"{0}\" is already registered")]
    DuplicateTool(String),

    #[error("invalid config for tool \"{tool}\": {}", .problems.join("; "))]
    InvalidToolConfig { tool: String, problems: Vec<String> },

    #[error("tool \"{0}\" not found")]
    ToolNotFound(String),

    #[error("validation failed for tool \"{tool}\": {}", .violations.join("; "))]
    Validation {
        tool: String,
        violations: Vec<String>,
    },

    #[error("calculation failed in tool \"{tool}\"")]
    Calculation {
        tool: String,
        #[source]
        source: AggregateError,
    },

    #[error("unsupported export format \"{0}\"")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Non-fatal findings from registration, returned to the caller instead of
/// being logged (the engine never logs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolWarning {
    /// A master-data row's cost key set differs from the first row's.
    /// Aggregation treats the missing resources as zero.
    IrregularStep {
        tool: String,
        table: String,
        index: StepIndex,
    },
}

impl std::fmt::Display for ToolWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolWarning::IrregularStep { tool, table, index } => write!(
                f,
                "tool \"{tool}\": table \"{table}\" step {} has an irregular cost shape",
                index.0
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Tool registry and result cache. Construct one at process start and pass
/// it by reference; there is no ambient singleton, so tests get isolated
/// instances for free.
#[derive(Debug, Default)]
pub struct Engine {
    tools: HashMap<String, Tool>,
    /// Registration order. The first-registered tool is the caller's
    /// default selection.
    order: Vec<String>,
    cache: ResultCache,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Registration --

    /// Register a tool. Fails with `DuplicateTool` if the id is taken (the
    /// existing registration stays intact) or `InvalidToolConfig` listing
    /// every problem found. On success returns the non-fatal warnings.
    pub fn register(&mut self, spec: ToolSpec) -> Result<Vec<ToolWarning>, EngineError> {
        if self.tools.contains_key(&spec.id) {
            return Err(EngineError::DuplicateTool(spec.id));
        }

        let ToolSpec {
            id,
            name,
            description,
            fields,
            tables,
            aggregator,
            rule,
            exporter,
        } = spec;

        let (tables, mut problems) = TableSet::build(tables);

        if fields.is_empty() {
            problems.push("field schema is empty".to_string());
        }
        for (pos, field) in fields.iter().enumerate() {
            if fields[..pos].iter().any(|f| f.name == field.name) {
                problems.push(format!("duplicate field name \"{}\"", field.name));
            }
        }
        problems.extend(aggregator.check_config(&fields, &tables));

        if !problems.is_empty() {
            return Err(EngineError::InvalidToolConfig { tool: id, problems });
        }

        let mut warnings = Vec::new();
        for table in tables.iter() {
            for index in table.irregular_steps() {
                warnings.push(ToolWarning::IrregularStep {
                    tool: id.clone(),
                    table: table.id().to_string(),
                    index,
                });
            }
        }

        self.order.push(id.clone());
        self.tools.insert(
            id.clone(),
            Tool {
                id,
                name,
                description,
                fields,
                tables,
                aggregator,
                rule,
                exporter,
            },
        );

        Ok(warnings)
    }

    // -- Queries --

    /// Registered tools, in registration order.
    pub fn tools(&self) -> impl Iterator<Item = &Tool> {
        self.order.iter().filter_map(|id| self.tools.get(id))
    }

    pub fn tool(&self, id: &str) -> Option<&Tool> {
        self.tools.get(id)
    }

    pub fn tool_count(&self) -> usize {
        self.order.len()
    }

    /// Number of cached results.
    pub fn cached_results(&self) -> usize {
        self.cache.len()
    }

    // -- Calculation --

    /// Run (or replay) a calculation.
    ///
    /// A cache hit returns the stored result unchanged, timestamp included;
    /// validation and aggregation only run on a miss. All validation
    /// violations are reported together in one error.
    pub fn calculate(
        &mut self,
        tool_id: &str,
        inputs: &Inputs,
    ) -> Result<CalculationResult, EngineError> {
        let tool = self
            .tools
            .get(tool_id)
            .ok_or_else(|| EngineError::ToolNotFound(tool_id.to_string()))?;

        let key = cache_key(tool_id, inputs);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let mut violations: Vec<String> = tool
            .fields
            .iter()
            .filter_map(|field| field.violation(inputs.get(&field.name)))
            .collect();
        if let Some(rule) = &tool.rule {
            violations.extend(rule.check(inputs));
        }
        if !violations.is_empty() {
            return Err(EngineError::Validation {
                tool: tool_id.to_string(),
                violations,
            });
        }

        let outputs = tool
            .aggregator
            .aggregate(inputs, &tool.tables)
            .map_err(|source| EngineError::Calculation {
                tool: tool_id.to_string(),
                source,
            })?;

        let result = CalculationResult {
            tool_id: tool_id.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            inputs: inputs.clone(),
            outputs,
        };

        Ok(self.cache.insert_if_absent(key, result).clone())
    }

    // -- Cache management --

    /// Clear cached results for one tool, or everything when `None`.
    /// Registered tools are unaffected.
    pub fn clear_cache(&mut self, tool_id: Option<&str>) {
        match tool_id {
            Some(id) => self.cache.clear_tool(id),
            None => self.cache.clear_all(),
        }
    }

    // -- Export --

    /// Render a result in the named format. The tool's export override is
    /// consulted first; the built-in renderers are the fallback. Unknown
    /// format strings fail with `UnsupportedFormat`; nothing is mutated.
    pub fn export(
        &self,
        tool_id: &str,
        result: &CalculationResult,
        format: &str,
    ) -> Result<String, EngineError> {
        let tool = self
            .tools
            .get(tool_id)
            .ok_or_else(|| EngineError::ToolNotFound(tool_id.to_string()))?;

        let parsed = ExportFormat::parse(format)
            .ok_or_else(|| EngineError::UnsupportedFormat(format.to_string()))?;

        if let Some(exporter) = &tool.exporter
            && let Some(text) = exporter.render(result, parsed)
        {
            return Ok(text);
        }
        Ok(parsed.render(result))
    }
}

// ===========================================================================
// Tests
// ===========================================================================

//! Parse table data files and resolve them into engine tables.

use crate::schema::{StepData, TableData};
use gearplan_core::cost::CostBundle;
use gearplan_core::table::{ProgressionStep, ProgressionTable, StepIndex, TableError};

/// Supported data-file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Ron,
    Toml,
}

impl DataFormat {
    /// Guess the format from a file extension. `None` for anything else.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "json" => Some(Self::Json),
            "ron" => Some(Self::Ron),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Errors from loading a table data file.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// Load a table from a JSON document.
pub fn table_from_json(src: &str) -> Result<ProgressionTable, DataLoadError> {
    let data: TableData = serde_json::from_str(src)?;
    Ok(build_table(data)?)
}

/// Load a table from a RON document.
pub fn table_from_ron(src: &str) -> Result<ProgressionTable, DataLoadError> {
    let data: TableData = ron::from_str(src)?;
    Ok(build_table(data)?)
}

/// Load a table from a TOML document.
pub fn table_from_toml(src: &str) -> Result<ProgressionTable, DataLoadError> {
    let data: TableData = toml::from_str(src)?;
    Ok(build_table(data)?)
}

/// Load a table in the given format.
pub fn load_table(format: DataFormat, src: &str) -> Result<ProgressionTable, DataLoadError> {
    match format {
        DataFormat::Json => table_from_json(src),
        DataFormat::Ron => table_from_ron(src),
        DataFormat::Toml => table_from_toml(src),
    }
}

fn build_table(data: TableData) -> Result<ProgressionTable, TableError> {
    let steps = data.steps.into_iter().map(build_step).collect();
    ProgressionTable::new(data.id, steps)
}

fn build_step(data: StepData) -> ProgressionStep {
    let costs: CostBundle = data.costs.into_iter().collect();
    ProgressionStep {
        index: StepIndex(data.index),
        label: data.label,
        costs,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

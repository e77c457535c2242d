//! Result cache keyed by canonical input serialization.

use crate::inputs::Inputs;
use crate::result::CalculationResult;
use std::collections::HashMap;

/// Cache key: `<tool_id>:<canonical inputs>`. The canonical part is the
/// sorted-key encoding from [`Inputs::canonical`], so reordered-but-equal
/// inputs always map to the same entry.
pub fn cache_key(tool_id: &str, inputs: &Inputs) -> String {
    format!("{tool_id}:{}", inputs.canonical())
}

/// The engine's result cache. Entries never expire implicitly; they are
/// removed only by an explicit clear.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<String, CalculationResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CalculationResult> {
        self.entries.get(key)
    }

    /// Insert-if-absent: an existing entry is never replaced, so two
    /// logically identical computations can never produce diverging cached
    /// results. Returns the entry now present under `key`.
    pub fn insert_if_absent(
        &mut self,
        key: String,
        result: CalculationResult,
    ) -> &CalculationResult {
        self.entries.entry(key).or_insert(result)
    }

    /// Remove entries for one tool (prefix match on `"<tool_id>:"`).
    pub fn clear_tool(&mut self, tool_id: &str) {
        let prefix = format!("{tool_id}:");
        self.entries.retain(|key, _| !key.starts_with(&prefix));
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

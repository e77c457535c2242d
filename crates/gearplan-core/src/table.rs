//! Progression tables: the ordered master data for one upgrade path.
//!
//! A [`ProgressionTable`] holds the cost steps for a single progression
//! (equipment rarity/star tiers, jewel levels, ...). Steps are sorted by
//! index with an O(1) point lookup; gaps between indices are legal and
//! contribute nothing to range sums. Tables are validated on construction
//! and immutable afterwards.

use crate::cost::CostBundle;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifies a step within a progression table. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepIndex(pub u32);

/// One row of a progression table: the cost of advancing *to* this step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionStep {
    /// Unique within the table. Tables may start at 0 or 1 and may skip
    /// indices.
    pub index: StepIndex,

    /// Display label ("Good \u{2605}0", "Lv3"). Opaque to the core; used to
    /// build selection options.
    pub label: Option<String>,

    /// Material cost of this step.
    pub costs: CostBundle,
}

/// Errors raised while constructing a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("table \"{table}\" has no steps")]
    Empty { table: String },

    #[error("table \"{table}\" has duplicate step index {index:?}")]
    DuplicateIndex { table: String, index: StepIndex },
}

/// An ordered, indexed cost table. Immutable after construction; only
/// [`ProgressionTable::new`] builds one, so the index lookup always exists.
#[derive(Debug, Clone)]
pub struct ProgressionTable {
    id: String,
    steps: Vec<ProgressionStep>,
    by_index: HashMap<StepIndex, usize>,
}

impl ProgressionTable {
    /// Build a table from its steps. Steps are sorted by index; an empty
    /// step list or a duplicated index is rejected.
    pub fn new(
        id: impl Into<String>,
        mut steps: Vec<ProgressionStep>,
    ) -> Result<Self, TableError> {
        let id = id.into();

        if steps.is_empty() {
            return Err(TableError::Empty { table: id });
        }

        steps.sort_by_key(|s| s.index);

        let mut by_index = HashMap::with_capacity(steps.len());
        for (pos, step) in steps.iter().enumerate() {
            if by_index.insert(step.index, pos).is_some() {
                return Err(TableError::DuplicateIndex {
                    table: id,
                    index: step.index,
                });
            }
        }

        Ok(Self {
            id,
            steps,
            by_index,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// O(1) point lookup. `None` is a valid, non-fatal outcome: a missing
    /// step contributes zero to whatever the caller is summing.
    pub fn step_at(&self, index: StepIndex) -> Option<&ProgressionStep> {
        self.by_index.get(&index).map(|&pos| &self.steps[pos])
    }

    pub fn contains_index(&self, index: StepIndex) -> bool {
        self.by_index.contains_key(&index)
    }

    /// Sum the costs of every existing step with
    /// `from_exclusive < index <= to_inclusive`.
    ///
    /// Returns the zero bundle when `to_inclusive <= from_exclusive`:
    /// downgrading (or not upgrading) is valid input, never an error.
    /// Indices in the range that have no step contribute zero.
    pub fn sum_range(&self, from_exclusive: StepIndex, to_inclusive: StepIndex) -> CostBundle {
        let mut total = CostBundle::zero();
        if to_inclusive <= from_exclusive {
            return total;
        }
        for index in (from_exclusive.0 + 1)..=to_inclusive.0 {
            if let Some(step) = self.step_at(StepIndex(index)) {
                total.add_bundle(&step.costs);
            }
        }
        total
    }

    /// Steps in index order.
    pub fn steps(&self) -> &[ProgressionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Smallest step index. Tables are never empty.
    pub fn min_index(&self) -> StepIndex {
        self.steps[0].index
    }

    /// Largest step index.
    pub fn max_index(&self) -> StepIndex {
        self.steps[self.steps.len() - 1].index
    }

    /// Indices of steps whose cost key set differs from the first step's.
    /// Heterogeneous master data is tolerated (missing resources read as
    /// zero); callers surface these as registration warnings.
    pub fn irregular_steps(&self) -> Vec<StepIndex> {
        let first: Vec<&str> = self.steps[0].costs.resources().collect();
        self.steps[1..]
            .iter()
            .filter(|step| {
                let keys: Vec<&str> = step.costs.resources().collect();
                keys != first
            })
            .map(|step| step.index)
            .collect()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn step(index: u32, silk: u64, thread: u64) -> ProgressionStep {
        ProgressionStep {
            index: StepIndex(index),
            label: None,
            costs: [("silk", silk), ("thread", thread)].into_iter().collect(),
        }
    }

    fn small_table() -> ProgressionTable {
        ProgressionTable::new(
            "equipment",
            vec![
                step(1, 1500, 15),
                step(2, 3800, 40),
                step(3, 7000, 70),
                step(4, 9700, 95),
                step(5, 1000, 10),
            ],
        )
        .unwrap()
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn empty_table_rejected() {
        let result = ProgressionTable::new("empty", vec![]);
        assert!(matches!(result, Err(TableError::Empty { .. })));
    }

    #[test]
    fn duplicate_index_rejected() {
        let result = ProgressionTable::new("dup", vec![step(1, 10, 1), step(1, 20, 2)]);
        match result {
            Err(TableError::DuplicateIndex { table, index }) => {
                assert_eq!(table, "dup");
                assert_eq!(index, StepIndex(1));
            }
            other => panic!("expected DuplicateIndex, got: {other:?}"),
        }
    }

    #[test]
    fn steps_sorted_regardless_of_input_order() {
        let table =
            ProgressionTable::new("t", vec![step(3, 30, 3), step(1, 10, 1), step(2, 20, 2)])
                .unwrap();
        let indices: Vec<u32> = table.steps().iter().map(|s| s.index.0).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(table.min_index(), StepIndex(1));
        assert_eq!(table.max_index(), StepIndex(3));
    }

    // -----------------------------------------------------------------------
    // Point lookup
    // -----------------------------------------------------------------------

    #[test]
    fn step_at_existing_and_missing() {
        let table = small_table();
        assert_eq!(table.step_at(StepIndex(3)).unwrap().costs.get("silk"), 7000);
        assert!(table.step_at(StepIndex(99)).is_none());
        assert!(table.contains_index(StepIndex(1)));
        assert!(!table.contains_index(StepIndex(0)));
    }

    // -----------------------------------------------------------------------
    // Range sums
    // -----------------------------------------------------------------------

    #[test]
    fn sum_range_basic() {
        let table = small_table();
        // (2, 5] = steps 3, 4, 5
        let total = table.sum_range(StepIndex(2), StepIndex(5));
        assert_eq!(total.get("silk"), 7000 + 9700 + 1000);
        assert_eq!(total.get("thread"), 70 + 95 + 10);
    }

    #[test]
    fn sum_range_downgrade_is_zero() {
        let table = small_table();
        assert!(table.sum_range(StepIndex(5), StepIndex(2)).is_zero());
        assert!(table.sum_range(StepIndex(3), StepIndex(3)).is_zero());
    }

    #[test]
    fn sum_range_gaps_contribute_zero() {
        let table =
            ProgressionTable::new("gappy", vec![step(1, 10, 1), step(4, 40, 4)]).unwrap();
        // (0, 4] touches indices 1..=4; only 1 and 4 exist.
        let total = table.sum_range(StepIndex(0), StepIndex(4));
        assert_eq!(total.get("silk"), 50);
        assert_eq!(total.get("thread"), 5);
    }

    #[test]
    fn sum_range_beyond_table_bounds() {
        let table = small_table();
        // Indices past the last step simply contribute nothing.
        let total = table.sum_range(StepIndex(4), StepIndex(40));
        assert_eq!(total.get("silk"), 1000);
    }

    // -----------------------------------------------------------------------
    // Irregular rows
    // -----------------------------------------------------------------------

    #[test]
    fn irregular_steps_detected() {
        let odd = ProgressionStep {
            index: StepIndex(2),
            label: None,
            costs: [("silk", 10u64)].into_iter().collect(),
        };
        let table =
            ProgressionTable::new("t", vec![step(1, 10, 1), odd, step(3, 30, 3)]).unwrap();
        assert_eq!(table.irregular_steps(), vec![StepIndex(2)]);
    }

    #[test]
    fn uniform_steps_have_no_irregulars() {
        assert!(small_table().irregular_steps().is_empty());
    }
}

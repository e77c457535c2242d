//! The tool abstraction: a field schema, bound progression tables, and an
//! aggregation strategy, registered once and immutable afterwards.
//!
//! Most tools are "slot walkers" and use [`RangeAggregator`]: every
//! [`SlotBinding`] resolves a `(current, target)` pair from two input
//! fields, sums the `(current, target]` range of its bound table, and the
//! per-resource totals are compared against held amounts to derive
//! shortfalls. Tools with other semantics implement [`Aggregate`] directly.

use crate::amount::shortfall;
use crate::cost::CostBundle;
use crate::export::ExportFormat;
use crate::field::FieldDef;
use crate::inputs::Inputs;
use crate::result::{CalculationResult, OutputValue, Outputs};
use crate::table::{ProgressionTable, StepIndex};
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Table set
// ---------------------------------------------------------------------------

/// The progression tables bound to one tool, with O(1) lookup by id.
#[derive(Debug)]
pub struct TableSet {
    tables: Vec<ProgressionTable>,
    by_id: HashMap<String, usize>,
}

impl TableSet {
    /// Build from a list of tables. Duplicated table ids are reported as
    /// config problems (the first occurrence wins) rather than panicking;
    /// the engine folds them into its registration error.
    pub fn build(tables: Vec<ProgressionTable>) -> (Self, Vec<String>) {
        let mut by_id = HashMap::with_capacity(tables.len());
        let mut problems = Vec::new();
        for (pos, table) in tables.iter().enumerate() {
            if by_id.contains_key(table.id()) {
                problems.push(format!("duplicate table id \"{}\"", table.id()));
            } else {
                by_id.insert(table.id().to_string(), pos);
            }
        }
        (Self { tables, by_id }, problems)
    }

    pub fn get(&self, id: &str) -> Option<&ProgressionTable> {
        self.by_id.get(id).map(|&pos| &self.tables[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgressionTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Error raised inside an aggregation. The engine wraps it, preserving the
/// cause, so callers never see a bare aggregator error type.
pub type AggregateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An aggregation strategy. Implementations read validated inputs and the
/// tool's tables and produce the named outputs.
pub trait Aggregate: std::fmt::Debug {
    /// Run the aggregation. Inputs have already passed validation.
    fn aggregate(&self, inputs: &Inputs, tables: &TableSet) -> Result<Outputs, AggregateError>;

    /// Configuration problems, checked at registration rather than first
    /// use. The default has nothing to check.
    fn check_config(&self, fields: &[FieldDef], tables: &TableSet) -> Vec<String> {
        let _ = (fields, tables);
        Vec::new()
    }
}

/// An extra validation rule a tool can carry beyond its field schema.
/// Returns every violated rule, not just the first.
pub trait ValidateRule: std::fmt::Debug {
    fn check(&self, inputs: &Inputs) -> Vec<String>;
}

/// A per-tool export hook. Returning `None` means "not handled here" and
/// the engine falls back to the built-in renderers.
pub trait ExportOverride: std::fmt::Debug {
    fn render(&self, result: &CalculationResult, format: ExportFormat) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Slot-walk aggregation
// ---------------------------------------------------------------------------

/// One independently progressable slot: two input fields resolved against
/// one bound table.
#[derive(Debug, Clone)]
pub struct SlotBinding {
    /// Id of the table the range is summed over.
    pub table: String,
    /// Field holding the currently reached step index.
    pub current_field: String,
    /// Field holding the desired step index.
    pub target_field: String,
}

impl SlotBinding {
    pub fn new(
        table: impl Into<String>,
        current_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            current_field: current_field.into(),
            target_field: target_field.into(),
        }
    }
}

/// Declares one `need_<resource>` output total; with a have-field it also
/// derives `lack_<resource>` and participates in the `sufficient` flag.
#[derive(Debug, Clone)]
pub struct ResourcePair {
    pub resource: String,
    pub have_field: Option<String>,
}

impl ResourcePair {
    pub fn tracked(resource: impl Into<String>, have_field: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            have_field: Some(have_field.into()),
        }
    }

    pub fn untracked(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            have_field: None,
        }
    }
}

/// The standard aggregation: walk every slot, sum its `(current, target]`
/// range, accumulate per-resource totals, derive shortfalls.
///
/// Slots whose indices are missing, non-numeric, or non-advancing
/// (`target <= current`) contribute zero; that is valid input (the user
/// has not chosen to upgrade that slot), never an error.
#[derive(Debug, Clone)]
pub struct RangeAggregator {
    pub slots: Vec<SlotBinding>,
    pub resources: Vec<ResourcePair>,
}

impl RangeAggregator {
    pub fn new(slots: Vec<SlotBinding>, resources: Vec<ResourcePair>) -> Self {
        Self { slots, resources }
    }

    /// Resolve an index input. Missing or non-numeric resolves to 0, which
    /// yields an empty range; negative values clamp to 0.
    fn resolve_index(inputs: &Inputs, field: &str) -> StepIndex {
        let n = inputs.number(field).unwrap_or(0).max(0);
        StepIndex(u32::try_from(n).unwrap_or(u32::MAX))
    }
}

impl Aggregate for RangeAggregator {
    fn aggregate(&self, inputs: &Inputs, tables: &TableSet) -> Result<Outputs, AggregateError> {
        // Resolve bindings up front so the summing pass is infallible.
        let mut ranges: Vec<(&ProgressionTable, StepIndex, StepIndex)> =
            Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let table = tables
                .get(&slot.table)
                .ok_or_else(|| format!("slot references unknown table \"{}\"", slot.table))?;
            let current = Self::resolve_index(inputs, &slot.current_field);
            let target = Self::resolve_index(inputs, &slot.target_field);
            ranges.push((table, current, target));
        }

        // Per-slot sums are independent; integer addition is associative
        // and commutative, so the parallel reduce is bit-identical to the
        // serial fold.
        #[cfg(feature = "parallel")]
        let totals = ranges
            .par_iter()
            .map(|(table, current, target)| table.sum_range(*current, *target))
            .reduce(CostBundle::zero, CostBundle::merged);

        #[cfg(not(feature = "parallel"))]
        let totals = ranges
            .iter()
            .map(|(table, current, target)| table.sum_range(*current, *target))
            .fold(CostBundle::zero(), CostBundle::merged);

        let mut outputs = Outputs::new();
        let mut sufficient = true;
        for pair in &self.resources {
            let need = totals.get(&pair.resource);
            outputs.insert(format!("need_{}", pair.resource), OutputValue::Amount(need));
            if let Some(have_field) = &pair.have_field {
                let have = inputs.number(have_field).unwrap_or(0).max(0) as u64;
                let lack = shortfall(need, have);
                outputs.insert(format!("lack_{}", pair.resource), OutputValue::Amount(lack));
                if lack > 0 {
                    sufficient = false;
                }
            }
        }
        outputs.insert("sufficient".to_string(), OutputValue::Flag(sufficient));

        Ok(outputs)
    }

    fn check_config(&self, fields: &[FieldDef], tables: &TableSet) -> Vec<String> {
        let mut problems = Vec::new();
        let field_declared = |name: &str| fields.iter().any(|f| f.name == name);

        if self.slots.is_empty() {
            problems.push("aggregator declares no slots".to_string());
        }
        if self.resources.is_empty() {
            problems.push("aggregator declares no resources".to_string());
        }
        for slot in &self.slots {
            if tables.get(&slot.table).is_none() {
                problems.push(format!("slot references unknown table \"{}\"", slot.table));
            }
            for field in [&slot.current_field, &slot.target_field] {
                if !field_declared(field) {
                    problems.push(format!("slot references undeclared field \"{field}\""));
                }
            }
        }
        for pair in &self.resources {
            if let Some(have_field) = &pair.have_field
                && !field_declared(have_field)
            {
                problems.push(format!(
                    "resource \"{}\" references undeclared field \"{have_field}\"",
                    pair.resource
                ));
            }
        }
        problems
    }
}

// ---------------------------------------------------------------------------
// Tool spec and registered tool
// ---------------------------------------------------------------------------

/// Everything a tool registration supplies. Consumed by
/// [`crate::engine::Engine::register`], which validates it and freezes it
/// into a [`Tool`].
#[derive(Debug)]
pub struct ToolSpec {
    pub id: String,
    pub name: String,
    pub description: String,
    pub fields: Vec<FieldDef>,
    pub tables: Vec<ProgressionTable>,
    pub aggregator: Box<dyn Aggregate>,
    pub rule: Option<Box<dyn ValidateRule>>,
    pub exporter: Option<Box<dyn ExportOverride>>,
}

/// A registered tool. Immutable: no `&mut` accessors exist, so a tool can
/// never change behind the engine's back.
#[derive(Debug)]
pub struct Tool {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) fields: Vec<FieldDef>,
    pub(crate) tables: TableSet,
    pub(crate) aggregator: Box<dyn Aggregate>,
    pub(crate) rule: Option<Box<dyn ValidateRule>>,
    pub(crate) exporter: Option<Box<dyn ExportOverride>>,
}

impl Tool {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The input schema, in declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ProgressionStep;

    fn step(index: u32, guides: u64, designs: u64) -> ProgressionStep {
        ProgressionStep {
            index: StepIndex(index),
            label: None,
            costs: [("guides", guides), ("designs", designs)]
                .into_iter()
                .collect(),
        }
    }

    fn jewel_table() -> ProgressionTable {
        ProgressionTable::new(
            "jewel",
            vec![
                step(0, 0, 0),
                step(1, 5, 5),
                step(2, 40, 15),
                step(3, 60, 40),
            ],
        )
        .unwrap()
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::numeric("a_current", "A current", Some(0), None, 0),
            FieldDef::numeric("a_target", "A target", Some(0), None, 0),
            FieldDef::numeric("b_current", "B current", Some(0), None, 0),
            FieldDef::numeric("b_target", "B target", Some(0), None, 0),
            FieldDef::numeric("have_guides", "Guides held", Some(0), None, 0),
            FieldDef::numeric("have_designs", "Designs held", Some(0), None, 0),
        ]
    }

    fn aggregator() -> RangeAggregator {
        RangeAggregator::new(
            vec![
                SlotBinding::new("jewel", "a_current", "a_target"),
                SlotBinding::new("jewel", "b_current", "b_target"),
            ],
            vec![
                ResourcePair::tracked("guides", "have_guides"),
                ResourcePair::tracked("designs", "have_designs"),
            ],
        )
    }

    fn tables() -> TableSet {
        let (set, problems) = TableSet::build(vec![jewel_table()]);
        assert!(problems.is_empty());
        set
    }

    // -----------------------------------------------------------------------
    // TableSet
    // -----------------------------------------------------------------------

    #[test]
    fn table_set_duplicate_ids_reported() {
        let (set, problems) = TableSet::build(vec![jewel_table(), jewel_table()]);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("duplicate table id"));
        // First occurrence wins; lookup still works.
        assert!(set.get("jewel").is_some());
    }

    // -----------------------------------------------------------------------
    // Aggregation
    // -----------------------------------------------------------------------

    #[test]
    fn slots_sum_independently() {
        let inputs = Inputs::new()
            .with("a_current", 0)
            .with("a_target", 2)
            .with("b_current", 1)
            .with("b_target", 3);
        let outputs = aggregator().aggregate(&inputs, &tables()).unwrap();
        // a: steps 1,2 = 45 guides / 20 designs; b: steps 2,3 = 100 / 55.
        assert_eq!(outputs["need_guides"], OutputValue::Amount(145));
        assert_eq!(outputs["need_designs"], OutputValue::Amount(75));
    }

    #[test]
    fn non_advancing_slot_contributes_nothing() {
        let inputs = Inputs::new()
            .with("a_current", 3)
            .with("a_target", 3)
            .with("b_current", 3)
            .with("b_target", 1);
        let outputs = aggregator().aggregate(&inputs, &tables()).unwrap();
        assert_eq!(outputs["need_guides"], OutputValue::Amount(0));
        assert_eq!(outputs["sufficient"], OutputValue::Flag(true));
    }

    #[test]
    fn missing_inputs_resolve_to_zero_contribution() {
        let outputs = aggregator().aggregate(&Inputs::new(), &tables()).unwrap();
        assert_eq!(outputs["need_guides"], OutputValue::Amount(0));
        assert_eq!(outputs["lack_guides"], OutputValue::Amount(0));
    }

    #[test]
    fn shortfalls_and_sufficiency() {
        let inputs = Inputs::new()
            .with("a_current", 0)
            .with("a_target", 3)
            .with("have_guides", 200)
            .with("have_designs", 10);
        let outputs = aggregator().aggregate(&inputs, &tables()).unwrap();
        // Steps 1..3: guides 105, designs 60.
        assert_eq!(outputs["need_guides"], OutputValue::Amount(105));
        assert_eq!(outputs["lack_guides"], OutputValue::Amount(0));
        assert_eq!(outputs["need_designs"], OutputValue::Amount(60));
        assert_eq!(outputs["lack_designs"], OutputValue::Amount(50));
        assert_eq!(outputs["sufficient"], OutputValue::Flag(false));
    }

    #[test]
    fn untracked_resource_has_no_lack_output() {
        let aggregator = RangeAggregator::new(
            vec![SlotBinding::new("jewel", "a_current", "a_target")],
            vec![ResourcePair::untracked("guides")],
        );
        let inputs = Inputs::new().with("a_current", 0).with("a_target", 1);
        let outputs = aggregator.aggregate(&inputs, &tables()).unwrap();
        assert_eq!(outputs["need_guides"], OutputValue::Amount(5));
        assert!(!outputs.contains_key("lack_guides"));
        // Untracked resources never make the result insufficient.
        assert_eq!(outputs["sufficient"], OutputValue::Flag(true));
    }

    #[test]
    fn negative_index_clamps_to_zero() {
        let inputs = Inputs::new().with("a_current", -5).with("a_target", 1);
        let outputs = aggregator().aggregate(&inputs, &tables()).unwrap();
        assert_eq!(outputs["need_guides"], OutputValue::Amount(5));
    }

    #[test]
    fn unknown_table_is_an_aggregate_error() {
        let bad = RangeAggregator::new(
            vec![SlotBinding::new("nonexistent", "a_current", "a_target")],
            vec![ResourcePair::untracked("guides")],
        );
        let err = bad.aggregate(&Inputs::new(), &tables()).unwrap_err();
        assert!(err.to_string().contains("unknown table"));
    }

    // -----------------------------------------------------------------------
    // Config checking
    // -----------------------------------------------------------------------

    #[test]
    fn config_problems_are_collected_not_short_circuited() {
        let bad = RangeAggregator::new(
            vec![SlotBinding::new("nonexistent", "ghost_current", "ghost_target")],
            vec![ResourcePair::tracked("guides", "ghost_have")],
        );
        let problems = bad.check_config(&fields(), &tables());
        assert_eq!(problems.len(), 4);
        assert!(problems.iter().any(|p| p.contains("unknown table")));
        assert!(problems.iter().any(|p| p.contains("ghost_current")));
        assert!(problems.iter().any(|p| p.contains("ghost_target")));
        assert!(problems.iter().any(|p| p.contains("ghost_have")));
    }

    #[test]
    fn empty_slots_and_resources_reported() {
        let bare = RangeAggregator::new(vec![], vec![]);
        let problems = bare.check_config(&fields(), &tables());
        assert!(problems.iter().any(|p| p.contains("no slots")));
        assert!(problems.iter().any(|p| p.contains("no resources")));
    }

    #[test]
    fn valid_config_has_no_problems() {
        assert!(aggregator().check_config(&fields(), &tables()).is_empty());
    }
}

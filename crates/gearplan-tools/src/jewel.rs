//! The jewel calculator.
//!
//! One 15-level progression table (Lv0..Lv14) costing guides and designs.
//! Each of the six equipment parts carries three jewel slots, every slot
//! ranged independently: 18 slots feeding two shared material totals.

use gearplan_core::field::{FieldDef, options_from_table};
use gearplan_core::table::{ProgressionStep, ProgressionTable, StepIndex, TableError};
use gearplan_core::tool::{RangeAggregator, ResourcePair, SlotBinding, ToolSpec};

/// The six parts carrying jewel slots, `(field id, display label)`.
pub const JEWEL_PARTS: &[(&str, &str)] = &[
    ("hat", "Hat"),
    ("decoration", "Decoration"),
    ("robe", "Robe"),
    ("pants", "Pants"),
    ("ring", "Ring"),
    ("staff", "Staff"),
];

/// Jewel slots per part.
pub const JEWEL_SLOTS: &[u32] = &[1, 2, 3];

/// Master data: `(level, guides, designs)`. Lv0 is the unleveled state and
/// costs nothing.
const JEWEL_MASTER: &[(u32, u64, u64)] = &[
    (0, 0, 0),
    (1, 5, 5),
    (2, 40, 15),
    (3, 60, 40),
    (4, 80, 100),
    (5, 100, 200),
    (6, 120, 300),
    (7, 140, 400),
    (8, 200, 400),
    (9, 300, 400),
    (10, 420, 420),
    (11, 560, 420),
    (12, 580, 600),
    (13, 610, 780),
    (14, 645, 960),
];

/// Build the jewel progression table.
pub fn jewel_table() -> Result<ProgressionTable, TableError> {
    let steps = JEWEL_MASTER
        .iter()
        .map(|&(level, guides, designs)| ProgressionStep {
            index: StepIndex(level),
            label: Some(format!("Lv{level}")),
            costs: [("guides", guides), ("designs", designs)]
                .into_iter()
                .collect(),
        })
        .collect();
    ProgressionTable::new("jewel", steps)
}

/// Build the jewel tool spec.
pub fn jewel_tool() -> Result<ToolSpec, TableError> {
    let table = jewel_table()?;
    let options = options_from_table(&table);

    let mut fields = Vec::new();
    let mut slots = Vec::new();
    for &(part, label) in JEWEL_PARTS {
        for &slot in JEWEL_SLOTS {
            let current = format!("{part}_{slot}_current");
            let target = format!("{part}_{slot}_target");
            fields.push(FieldDef::selection(
                current.clone(),
                format!("{label} #{slot} - current"),
                options.clone(),
                0,
            ));
            fields.push(FieldDef::selection(
                target.clone(),
                format!("{label} #{slot} - target"),
                options.clone(),
                0,
            ));
            slots.push(SlotBinding::new("jewel", current, target));
        }
    }
    fields.push(FieldDef::numeric(
        "have_guides",
        "Guides held",
        Some(0),
        None,
        0,
    ));
    fields.push(FieldDef::numeric(
        "have_designs",
        "Designs held",
        Some(0),
        None,
        0,
    ));

    Ok(ToolSpec {
        id: "jewel".into(),
        name: "Jewel Calculator".into(),
        description: "Guides and designs needed to level jewels".into(),
        fields,
        tables: vec![table],
        aggregator: Box::new(RangeAggregator::new(
            slots,
            vec![
                ResourcePair::tracked("guides", "have_guides"),
                ResourcePair::tracked("designs", "have_designs"),
            ],
        )),
        rule: None,
        exporter: None,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

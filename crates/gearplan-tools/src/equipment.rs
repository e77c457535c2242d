//! The equipment upgrade calculator.
//!
//! One 18-step progression table (Good through Mythic, each rarity with its
//! star tiers), six equipment parts ranged independently, four materials
//! (silk, thread, blueprints, points) with held amounts and shortfalls.

use gearplan_core::export::ExportFormat;
use gearplan_core::field::{FieldDef, options_from_table};
use gearplan_core::result::CalculationResult;
use gearplan_core::table::{ProgressionStep, ProgressionTable, StepIndex, TableError};
use gearplan_core::tool::{ExportOverride, RangeAggregator, ResourcePair, SlotBinding, ToolSpec};

/// The six equipment parts, `(field id, display label)`.
pub const EQUIPMENT_PARTS: &[(&str, &str)] = &[
    ("hat", "Hat"),
    ("decoration", "Decoration"),
    ("robe", "Robe"),
    ("pants", "Pants"),
    ("ring", "Ring"),
    ("staff", "Staff"),
];

/// Upgrade materials, `(resource id, display label)`.
pub const EQUIPMENT_RESOURCES: &[(&str, &str)] = &[
    ("silk", "Silk"),
    ("thread", "Thread"),
    ("bp", "Blueprints"),
    ("pt", "Points"),
];

/// Master data: `(index, label, silk, thread, bp, pt)`. The cost of
/// advancing *to* that step.
const EQUIPMENT_MASTER: &[(u32, &str, u64, u64, u64, u64)] = &[
    (1, "Good \u{2605}0", 1500, 15, 0, 1125),
    (2, "Good \u{2605}1", 3800, 40, 0, 1875),
    (3, "Rare \u{2605}0", 7000, 70, 0, 3000),
    (4, "Rare \u{2605}1", 9700, 95, 0, 4500),
    (5, "Rare \u{2605}2", 1000, 10, 45, 5100),
    (6, "Rare \u{2605}3", 1000, 10, 50, 5440),
    (7, "Epic \u{2605}0", 1500, 15, 60, 3230),
    (8, "Epic \u{2605}1", 1500, 15, 70, 3230),
    (9, "Epic \u{2605}2", 6500, 65, 40, 3225),
    (10, "Epic \u{2605}3", 8000, 80, 50, 3225),
    (11, "Legend \u{2605}0", 22000, 220, 40, 6250),
    (12, "Legend \u{2605}1", 23000, 230, 40, 6250),
    (13, "Legend \u{2605}2", 25000, 250, 45, 6250),
    (14, "Legend \u{2605}3", 26000, 260, 45, 6250),
    (15, "Mythic \u{2605}0", 108000, 1080, 220, 12000),
    (16, "Mythic \u{2605}1", 114000, 1140, 230, 12000),
    (17, "Mythic \u{2605}2", 121000, 1210, 240, 12000),
    (18, "Mythic \u{2605}3", 128000, 1280, 250, 12000),
];

/// Build the equipment progression table.
pub fn equipment_table() -> Result<ProgressionTable, TableError> {
    let steps = EQUIPMENT_MASTER
        .iter()
        .map(|&(index, label, silk, thread, bp, pt)| ProgressionStep {
            index: StepIndex(index),
            label: Some(label.to_string()),
            costs: [("silk", silk), ("thread", thread), ("bp", bp), ("pt", pt)]
                .into_iter()
                .collect(),
        })
        .collect();
    ProgressionTable::new("equipment", steps)
}

/// Build the equipment tool spec.
pub fn equipment_tool() -> Result<ToolSpec, TableError> {
    let table = equipment_table()?;
    let options = options_from_table(&table);
    let first = i64::from(table.min_index().0);

    let mut fields = Vec::new();
    let mut slots = Vec::new();
    for &(part, label) in EQUIPMENT_PARTS {
        let current = format!("{part}_current");
        let target = format!("{part}_target");
        fields.push(FieldDef::selection(
            current.clone(),
            format!("{label} - current"),
            options.clone(),
            first,
        ));
        fields.push(FieldDef::selection(
            target.clone(),
            format!("{label} - target"),
            options.clone(),
            first,
        ));
        slots.push(SlotBinding::new("equipment", current, target));
    }

    let mut resources = Vec::new();
    for &(resource, label) in EQUIPMENT_RESOURCES {
        fields.push(FieldDef::numeric(
            format!("have_{resource}"),
            format!("{label} held"),
            Some(0),
            None,
            0,
        ));
        resources.push(ResourcePair::tracked(resource, format!("have_{resource}")));
    }

    Ok(ToolSpec {
        id: "equipment".into(),
        name: "Equipment Calculator".into(),
        description: "Materials needed to upgrade equipment between rarity tiers".into(),
        fields,
        tables: vec![table],
        aggregator: Box::new(RangeAggregator::new(slots, resources)),
        rule: None,
        exporter: Some(Box::new(EquipmentReport)),
    })
}

/// Custom structured-text report for equipment results; every other format
/// falls back to the built-in renderers.
#[derive(Debug)]
pub struct EquipmentReport;

impl ExportOverride for EquipmentReport {
    fn render(&self, result: &CalculationResult, format: ExportFormat) -> Option<String> {
        if format != ExportFormat::StructuredText {
            return None;
        }
        let mut out = String::new();
        out.push_str("=== Equipment upgrade plan ===\n");
        out.push_str(&format!("time: {}\n\n", result.timestamp));
        for &(resource, label) in EQUIPMENT_RESOURCES {
            let need = result.amount(&format!("need_{resource}"));
            let lack = result.amount(&format!("lack_{resource}"));
            if lack > 0 {
                out.push_str(&format!("{label}: need {need} (short {lack})\n"));
            } else {
                out.push_str(&format!("{label}: need {need} (covered)\n"));
            }
        }
        out.push_str(&format!(
            "\nmaterials {}\n",
            if result.flag("sufficient") {
                "sufficient"
            } else {
                "insufficient"
            }
        ));
        Some(out)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

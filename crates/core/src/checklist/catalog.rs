//! The fixed question catalog used to materialize a new checklist.
//!
//! Editing this table only affects checklists materialized afterwards;
//! stored items keep whatever question text they were created with.

use super::types::{ChecklistItem, ItemKind, Section};

/// Template for one inspection question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub section: Section,
    pub question: &'static str,
    pub kind: ItemKind,
    /// Empty unless `kind` is `MultiChoice`.
    pub options: &'static [&'static str],
}

impl CatalogEntry {
    const fn yes_no(section: Section, question: &'static str) -> Self {
        Self {
            section,
            question,
            kind: ItemKind::YesNo,
            options: &[],
        }
    }

    const fn multi_choice(
        section: Section,
        question: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            section,
            question,
            kind: ItemKind::MultiChoice,
            options,
        }
    }

    const fn text(section: Section, question: &'static str) -> Self {
        Self {
            section,
            question,
            kind: ItemKind::TextInput,
            options: &[],
        }
    }

    /// Instantiates this template as an unanswered, unsaved item.
    pub fn to_item(&self, checklist_id: i64) -> ChecklistItem {
        ChecklistItem::new(checklist_id, self.section, self.question, self.kind)
            .with_options(self.options.iter().copied())
    }
}

use Section::*;

const CATALOG: &[CatalogEntry] = &[
    // Paint & Body
    CatalogEntry::yes_no(PaintBody, "Chips, Scratches, Dings, Dents"),
    CatalogEntry::multi_choice(PaintBody, "Body lines", &["STRAIGHT", "WAVY", "MISSING"]),
    CatalogEntry::yes_no(PaintBody, "Door gaps consistent"),
    CatalogEntry::multi_choice(
        PaintBody,
        "Rust",
        &["SUPERFICIAL", "PITTING", "HOLES", "BLISTERS IN PAINT"],
    ),
    // Engine Bay
    CatalogEntry::yes_no(EngineBay, "Hood opens and closes smoothly"),
    CatalogEntry::yes_no(EngineBay, "Battery terminals are clean and not corroded"),
    CatalogEntry::yes_no(EngineBay, "Belts are not cracked or stringy"),
    CatalogEntry::yes_no(
        EngineBay,
        "Hoses don't seem too hard, worn or show signs of leakage",
    ),
    CatalogEntry::yes_no(EngineBay, "Evidence of fluid leaks"),
    CatalogEntry::text(EngineBay, "Where:"),
    CatalogEntry::yes_no(EngineBay, "Check All Fluid Levels"),
    // Lights
    CatalogEntry::yes_no(Lights, "Check all lights are working"),
    // Interior
    CatalogEntry::yes_no(Interior, "Any odors, mold or moisture"),
    CatalogEntry::yes_no(Interior, "Rips, tears, burns stains or holes in upholstery"),
    CatalogEntry::yes_no(Interior, "Seats feel solid"),
    CatalogEntry::yes_no(
        Interior,
        "Seats slide forward and back, lean forward/back properly",
    ),
    CatalogEntry::yes_no(Interior, "Seatbelts (4) present and fully functional"),
    CatalogEntry::yes_no(Interior, "Missing knobs or components"),
    CatalogEntry::yes_no(
        Interior,
        "Interior accessories work - heater, lighter, radio, gauges, instruments, etc",
    ),
    CatalogEntry::yes_no(Interior, "Interior door handles work properly"),
    CatalogEntry::yes_no(
        Interior,
        "Convertible top locks down at front windshield properly",
    ),
    CatalogEntry::yes_no(Interior, "Convertible top operates smoothly (power or manual)"),
    CatalogEntry::yes_no(
        Interior,
        "Top fitment looks acceptable, installed well, not shrunk, weatherstripping in good condition",
    ),
    // Windows & Trim
    CatalogEntry::yes_no(WindowsTrim, "Windows roll up and down smoothly"),
    CatalogEntry::yes_no(WindowsTrim, "Trim fits evenly and nicely"),
    // Undercarriage
    CatalogEntry::yes_no(Undercarriage, "Evidence of leaks"),
    CatalogEntry::yes_no(Undercarriage, "Worn, cracked, pinched, leaking brake hoses"),
    CatalogEntry::yes_no(Undercarriage, "Metal lines rusty or pinched"),
    CatalogEntry::yes_no(Undercarriage, "Hose connection points clean/solid"),
    CatalogEntry::yes_no(
        Undercarriage,
        "Rust or repairs at frame / rocker panel/floor boards (esp under heater core)",
    ),
    CatalogEntry::yes_no(
        Undercarriage,
        "Evidence of worn out suspension or suspension components",
    ),
    CatalogEntry::yes_no(Undercarriage, "Fuel lines hanging, cracking or leaking"),
    CatalogEntry::yes_no(Undercarriage, "Evidence of repairs"),
    // Gas Tank
    CatalogEntry::yes_no(GasTank, "Strapped in properly"),
    CatalogEntry::yes_no(GasTank, "Fuel filler neck and related hoses in good condition"),
    // Trunk
    CatalogEntry::yes_no(Trunk, "Trunk lid opens and closes properly. Stays up/open"),
    CatalogEntry::yes_no(Trunk, "Light sockets in good visual, working order"),
    CatalogEntry::yes_no(
        Trunk,
        "Evidence of water leaking into trunk. Weatherstripping intact",
    ),
    CatalogEntry::yes_no(
        Trunk,
        "Look under rear window package tray area - Any evidence of repair, water damage, leakage or penetration",
    ),
    // Tires & Lug Nuts
    CatalogEntry::multi_choice(TiresLugNuts, "Tire condition", &["POOR", "FAIR", "GOOD"]),
    CatalogEntry::yes_no(
        TiresLugNuts,
        "Check date on tires to make sure they're safe to drive on. Any evidence of shredding, cracking, rubbing, gashing, bulges, lack of tread",
    ),
    CatalogEntry::yes_no(TiresLugNuts, "Lug nuts on all studs"),
    // VIN Number & Title
    CatalogEntry::yes_no(
        VinTitle,
        "Clear visible VIN tag that does not appear tampered with",
    ),
    CatalogEntry::yes_no(VinTitle, "Does VIN number on car match VIN number on title"),
    CatalogEntry::yes_no(VinTitle, "Is title in seller's name"),
    CatalogEntry::yes_no(
        VinTitle,
        "Does seller have registration documents that support title & history",
    ),
    CatalogEntry::yes_no(VinTitle, "Does vehicle have a trim tag"),
    CatalogEntry::yes_no(VinTitle, "Does the car have the options detailed on trim tag"),
    // Test Drive
    CatalogEntry::yes_no(
        TestDrive,
        "Engine starts easily, idles smoothly and shuts off as it should",
    ),
    CatalogEntry::yes_no(
        TestDrive,
        "Engine starts when hot and is not sluggish or slow. After test drive, turn it off and wait 10 seconds and restart",
    ),
    CatalogEntry::multi_choice(
        TestDrive,
        "How is overall feel - drivability",
        &["POOR", "FAIR", "GOOD", "GREAT"],
    ),
    CatalogEntry::yes_no(TestDrive, "Does temp gauge work properly"),
    CatalogEntry::yes_no(TestDrive, "Does car operate in 160-210 range"),
    CatalogEntry::yes_no(
        TestDrive,
        "Does temp go up when on the freeway or idling in traffic or at stops",
    ),
    CatalogEntry::yes_no(
        TestDrive,
        "Does oil gauge register at least 20 psi at idle and raise to 30-40+ psi as rev'd to increased rpm",
    ),
    CatalogEntry::yes_no(TestDrive, "Does car feel solid, loose clunky or rattly"),
    CatalogEntry::yes_no(TestDrive, "Does transmission shift ok"),
    CatalogEntry::yes_no(TestDrive, "Does car stop ok? Does it shudder, squeal, grind or pull"),
];

/// Returns every catalog entry in inspection order.
pub fn catalog() -> &'static [CatalogEntry] {
    CATALOG
}

/// Returns the unanswered item set for a checklist, in inspection order.
pub fn items_for(checklist_id: i64) -> Vec<ChecklistItem> {
    CATALOG
        .iter()
        .map(|entry| entry.to_item(checklist_id))
        .collect()
}

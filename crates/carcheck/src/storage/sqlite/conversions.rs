//! SQLite row conversion functions.
//!
//! This is the only place that knows how domain types are flattened into
//! text columns: section and kind tags, the JSON option list and the
//! timestamp format. Everything here is pure and testable without a database.

use carcheck_core::checklist::{Checklist, ChecklistItem, ItemKind, Section};
use carcheck_core::storage::RepositoryError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

// ============================================================================
// Checklist conversions
// ============================================================================

/// Convert a SQLite row to a Checklist.
///
/// Expected columns: id, date, car_info, vin, last_modified
pub fn row_to_checklist(row: &Row) -> rusqlite::Result<Checklist> {
    let id: i64 = row.get(0)?;
    let date: String = row.get(1)?;
    let car_info: String = row.get(2)?;
    let vin: String = row.get(3)?;
    let last_modified: String = row.get(4)?;

    Ok(Checklist {
        id,
        date: parse_datetime(1, &date)?,
        car_info,
        vin,
        last_modified: parse_datetime(4, &last_modified)?,
    })
}

// ============================================================================
// Item conversions
// ============================================================================

/// The persisted shape of a checklist item, minus its ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub checklist_id: i64,
    pub section: &'static str,
    pub question: String,
    pub kind: &'static str,
    pub options: String,
    pub value: Option<String>,
}

impl ItemRow {
    /// Flattens a domain item for storage.
    pub fn from_item(item: &ChecklistItem) -> Result<Self, RepositoryError> {
        Ok(Self {
            checklist_id: item.checklist_id,
            section: section_to_tag(item.section),
            question: item.question.clone(),
            kind: kind_to_tag(item.kind),
            options: encode_options(&item.options)?,
            value: item.value.clone(),
        })
    }
}

/// Convert a SQLite row to a ChecklistItem.
///
/// Expected columns: id, checklist_id, section, question, type, options, value
///
/// An option list that fails to decode becomes an empty list; unknown
/// section or kind tags fail the row.
pub fn row_to_item(row: &Row) -> rusqlite::Result<ChecklistItem> {
    let id: i64 = row.get(0)?;
    let checklist_id: i64 = row.get(1)?;
    let section: String = row.get(2)?;
    let question: String = row.get(3)?;
    let kind: String = row.get(4)?;
    let options: String = row.get(5)?;
    let value: Option<String> = row.get(6)?;

    Ok(ChecklistItem {
        id,
        checklist_id,
        section: parse_section(&section).map_err(|e| conversion_error(2, e))?,
        question,
        kind: parse_kind(&kind).map_err(|e| conversion_error(4, e))?,
        options: decode_options(id, &options),
        value,
    })
}

/// Serialize a section to its stored tag.
pub fn section_to_tag(section: Section) -> &'static str {
    match section {
        Section::PaintBody => "PAINT_BODY",
        Section::EngineBay => "ENGINE_BAY",
        Section::Lights => "LIGHTS",
        Section::Interior => "INTERIOR",
        Section::WindowsTrim => "WINDOWS_TRIM",
        Section::Undercarriage => "UNDERCARRIAGE",
        Section::GasTank => "GAS_TANK",
        Section::Trunk => "TRUNK",
        Section::TiresLugNuts => "TIRES_LUG_NUTS",
        Section::VinTitle => "VIN_TITLE",
        Section::TestDrive => "TEST_DRIVE",
    }
}

/// Parse a section from its stored tag.
pub fn parse_section(tag: &str) -> Result<Section, RepositoryError> {
    Section::ALL
        .into_iter()
        .find(|section| section_to_tag(*section) == tag)
        .ok_or_else(|| RepositoryError::Serialization(format!("Unknown section: {tag}")))
}

/// Serialize an item kind to its stored tag.
pub fn kind_to_tag(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::YesNo => "YES_NO",
        ItemKind::MultiChoice => "MULTI_CHOICE",
        ItemKind::TextInput => "TEXT_INPUT",
    }
}

/// Parse an item kind from its stored tag.
pub fn parse_kind(tag: &str) -> Result<ItemKind, RepositoryError> {
    match tag {
        "YES_NO" => Ok(ItemKind::YesNo),
        "MULTI_CHOICE" => Ok(ItemKind::MultiChoice),
        "TEXT_INPUT" => Ok(ItemKind::TextInput),
        _ => Err(RepositoryError::Serialization(format!(
            "Unknown item type: {tag}"
        ))),
    }
}

/// Serialize an option list to a JSON array.
pub fn encode_options(options: &[String]) -> Result<String, RepositoryError> {
    serde_json::to_string(options).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Deserialize an option list, falling back to an empty list.
///
/// A broken option list must not make the whole checklist unreadable, so
/// failures are logged and swallowed.
pub fn decode_options(item_id: i64, json: &str) -> Vec<String> {
    match serde_json::from_str::<Option<Vec<String>>>(json) {
        Ok(options) => options.unwrap_or_default(),
        Err(err) => {
            tracing::warn!(item_id, error = %err, "Undecodable option list, using empty list");
            Vec::new()
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Format a timestamp for SQLite storage.
///
/// RFC 3339 in UTC with a fixed nine-digit fraction, so lexicographic
/// order in SQL matches chronological order.
///
/// Only holds for four-digit years; callers reject anything else first.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a timestamp from RFC 3339 text.
fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn conversion_error(column: usize, err: RepositoryError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

use chrono::{DateTime, Datelike, Utc};

use super::error::ChecklistError;
use super::types::{Checklist, ChecklistItem, CompletionStats, ItemKind, Section, NO, YES};

/// Maximum VIN length.
pub const MAX_VIN_LEN: usize = 17;

/// Text answers longer than this are cut.
pub const MAX_TEXT_ANSWER_LEN: usize = 500;

/// Trims and uppercases a VIN, rejecting anything longer than 17 characters.
pub fn normalize_vin(vin: &str) -> Result<String, ChecklistError> {
    let vin = vin.trim().to_uppercase();
    let len = vin.chars().count();
    if len > MAX_VIN_LEN {
        return Err(ChecklistError::VinTooLong(len));
    }
    Ok(vin)
}

/// Years that keep stored timestamps four digits wide.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Rejects instants whose year cannot be written as four digits.
pub fn check_year(at: &DateTime<Utc>) -> Result<(), ChecklistError> {
    let year = at.year();
    if YEAR_RANGE.contains(&year) {
        Ok(())
    } else {
        Err(ChecklistError::YearOutOfRange(year))
    }
}

/// Validates a checklist before insert or update and returns its normalized form.
pub fn normalize_checklist(mut checklist: Checklist) -> Result<Checklist, ChecklistError> {
    check_year(&checklist.date)?;
    check_year(&checklist.last_modified)?;
    checklist.car_info = checklist.car_info.trim().to_string();
    checklist.vin = normalize_vin(&checklist.vin)?;
    Ok(checklist)
}

/// Computes the answer an item should hold after the user submits `input`.
///
/// `None` always clears the answer. For YES_NO items, submitting the
/// currently selected choice clears it as well.
pub fn resolve_answer(
    item: &ChecklistItem,
    input: Option<&str>,
) -> Result<Option<String>, ChecklistError> {
    let Some(input) = input else {
        return Ok(None);
    };

    match item.kind {
        ItemKind::YesNo => {
            let choice = match input.trim().to_uppercase().as_str() {
                YES => YES,
                NO => NO,
                _ => return Err(invalid_answer(item.kind, input)),
            };
            if item.value.as_deref() == Some(choice) {
                Ok(None)
            } else {
                Ok(Some(choice.to_string()))
            }
        }
        ItemKind::MultiChoice => {
            if item.options.iter().any(|option| option == input) {
                Ok(Some(input.to_string()))
            } else {
                Err(invalid_answer(item.kind, input))
            }
        }
        ItemKind::TextInput => {
            if input.trim().is_empty() {
                return Ok(None);
            }
            Ok(Some(input.chars().take(MAX_TEXT_ANSWER_LEN).collect()))
        }
    }
}

fn invalid_answer(kind: ItemKind, value: &str) -> ChecklistError {
    ChecklistError::InvalidAnswer {
        kind,
        value: value.to_string(),
    }
}

/// Counts answered items against the full item set.
pub fn completion_stats(items: &[ChecklistItem]) -> CompletionStats {
    CompletionStats {
        answered: items.iter().filter(|item| item.is_answered()).count(),
        total: items.len(),
    }
}

/// Groups items by section, preserving item order within each group.
///
/// Sections come out in inspection order; sections without items are skipped.
pub fn group_by_section(items: &[ChecklistItem]) -> Vec<(Section, Vec<&ChecklistItem>)> {
    Section::ALL
        .iter()
        .map(|section| {
            let in_section = items
                .iter()
                .filter(|item| item.section == *section)
                .collect::<Vec<_>>();
            (*section, in_section)
        })
        .filter(|(_, items)| !items.is_empty())
        .collect()
}

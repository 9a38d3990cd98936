mod catalog;
mod error;
mod events;
mod operations;
mod types;

pub use catalog::{catalog, items_for, CatalogEntry};
pub use error::ChecklistError;
pub use events::StoreChange;
pub use operations::{
    check_year, completion_stats, group_by_section, normalize_checklist, normalize_vin,
    resolve_answer, MAX_TEXT_ANSWER_LEN, MAX_VIN_LEN, YEAR_RANGE,
};
pub use types::{
    Checklist, ChecklistItem, ChecklistSummary, CompletionStats, ItemKind, NewChecklist, Section,
    NO, YES,
};

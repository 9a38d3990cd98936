use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inspection session for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    /// Assigned by the store on insert. `0` until then.
    pub id: i64,
    /// Date of the inspection.
    pub date: DateTime<Utc>,
    pub car_info: String,
    pub vin: String,
    /// Maintained by the service; overwritten on every insert and update.
    pub last_modified: DateTime<Utc>,
}

impl Checklist {
    /// Returns true if a VIN has been recorded.
    pub fn has_vin(&self) -> bool {
        !self.vin.is_empty()
    }
}

/// Caller input for creating a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChecklist {
    pub date: DateTime<Utc>,
    pub car_info: String,
    pub vin: String,
}

impl NewChecklist {
    /// Creates a checklist request for the given inspection date.
    pub fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            car_info: String::new(),
            vin: String::new(),
        }
    }

    /// Sets the free-text car description.
    pub fn with_car_info(mut self, car_info: impl Into<String>) -> Self {
        self.car_info = car_info.into();
        self
    }

    /// Sets the VIN.
    pub fn with_vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = vin.into();
        self
    }

    /// Builds the checklist record that gets persisted.
    pub fn into_checklist(self, last_modified: DateTime<Utc>) -> Checklist {
        Checklist {
            id: 0,
            date: self.date,
            car_info: self.car_info,
            vin: self.vin,
            last_modified,
        }
    }
}

/// One of the fixed inspection categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Section {
    PaintBody,
    EngineBay,
    Lights,
    Interior,
    WindowsTrim,
    Undercarriage,
    GasTank,
    Trunk,
    TiresLugNuts,
    VinTitle,
    TestDrive,
}

impl Section {
    /// Every section, in inspection order.
    pub const ALL: [Section; 11] = [
        Section::PaintBody,
        Section::EngineBay,
        Section::Lights,
        Section::Interior,
        Section::WindowsTrim,
        Section::Undercarriage,
        Section::GasTank,
        Section::Trunk,
        Section::TiresLugNuts,
        Section::VinTitle,
        Section::TestDrive,
    ];

    /// Human readable section title.
    pub fn display_name(&self) -> &'static str {
        match self {
            Section::PaintBody => "Paint & Body",
            Section::EngineBay => "Engine Bay",
            Section::Lights => "Lights",
            Section::Interior => "Interior",
            Section::WindowsTrim => "Windows & Trim",
            Section::Undercarriage => "Undercarriage",
            Section::GasTank => "Gas Tank",
            Section::Trunk => "Trunk",
            Section::TiresLugNuts => "Tires & Lug Nuts",
            Section::VinTitle => "VIN Number & Title",
            Section::TestDrive => "Test Drive",
        }
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// Binary YES/NO question.
    YesNo,
    /// One of a fixed list of options.
    MultiChoice,
    /// Free text.
    TextInput,
}

impl ItemKind {
    pub fn is_yes_no(&self) -> bool {
        matches!(self, ItemKind::YesNo)
    }

    pub fn is_multi_choice(&self) -> bool {
        matches!(self, ItemKind::MultiChoice)
    }

    pub fn is_text_input(&self) -> bool {
        matches!(self, ItemKind::TextInput)
    }
}

/// Answer value for a YES_NO item answered "yes".
pub const YES: &str = "YES";
/// Answer value for a YES_NO item answered "no".
pub const NO: &str = "NO";

/// One question and its answer within a checklist.
///
/// Only `value` changes after the item is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Assigned by the store on insert. `0` until then.
    pub id: i64,
    pub checklist_id: i64,
    pub section: Section,
    pub question: String,
    pub kind: ItemKind,
    /// Selectable options. Empty unless `kind` is `MultiChoice`.
    pub options: Vec<String>,
    /// `None` means unanswered.
    pub value: Option<String>,
}

impl ChecklistItem {
    /// Creates an unanswered item that has not been stored yet.
    pub fn new(
        checklist_id: i64,
        section: Section,
        question: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: 0,
            checklist_id,
            section,
            question: question.into(),
            kind,
            options: Vec::new(),
            value: None,
        }
    }

    /// Sets the selectable options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the answer.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets a specific ID for this item (useful for testing).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Returns true if the item has an answer.
    pub fn is_answered(&self) -> bool {
        self.value.is_some()
    }
}

/// Answered and total item counts for one checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub answered: usize,
    pub total: usize,
}

impl CompletionStats {
    /// Returns true once every item has an answer.
    ///
    /// A checklist without items is never complete.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.answered == self.total
    }

    /// Whole-number completion percentage, rounded down.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.answered * 100) / self.total) as u8
    }
}

impl From<CompletionStats> for (usize, usize) {
    fn from(stats: CompletionStats) -> Self {
        (stats.answered, stats.total)
    }
}

/// A checklist together with its progress, as shown in a list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSummary {
    pub checklist: Checklist,
    pub stats: CompletionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_all_is_in_inspection_order() {
        assert_eq!(Section::ALL.len(), 11);
        assert_eq!(Section::ALL[0], Section::PaintBody);
        assert_eq!(Section::ALL[10], Section::TestDrive);
    }

    #[test]
    fn test_section_display_name() {
        assert_eq!(Section::TiresLugNuts.display_name(), "Tires & Lug Nuts");
        assert_eq!(Section::VinTitle.display_name(), "VIN Number & Title");
    }

    #[test]
    fn test_section_serializes_as_tag() {
        let json = serde_json::to_string(&Section::WindowsTrim).unwrap();
        assert_eq!(json, r#""WINDOWS_TRIM""#);
    }

    #[test]
    fn test_item_kind_serializes_as_tag() {
        let json = serde_json::to_string(&ItemKind::MultiChoice).unwrap();
        assert_eq!(json, r#""MULTI_CHOICE""#);
    }

    #[test]
    fn test_new_checklist_builder() {
        let date = Utc::now();
        let checklist = NewChecklist::new(date)
            .with_car_info("1965 Mustang")
            .with_vin("5F08F123456789")
            .into_checklist(date);

        assert_eq!(checklist.id, 0);
        assert_eq!(checklist.car_info, "1965 Mustang");
        assert!(checklist.has_vin());
    }

    #[test]
    fn test_item_builder() {
        let item = ChecklistItem::new(7, Section::TiresLugNuts, "Tire condition", ItemKind::MultiChoice)
            .with_options(["POOR", "FAIR", "GOOD"]);

        assert_eq!(item.checklist_id, 7);
        assert_eq!(item.options.len(), 3);
        assert!(!item.is_answered());
    }

    #[test]
    fn test_completion_stats() {
        let stats = CompletionStats {
            answered: 29,
            total: 58,
        };
        assert_eq!(stats.percent(), 50);
        assert!(!stats.is_complete());
        assert_eq!(<(usize, usize)>::from(stats), (29, 58));

        let done = CompletionStats {
            answered: 3,
            total: 3,
        };
        assert!(done.is_complete());
        assert_eq!(done.percent(), 100);
    }

    #[test]
    fn test_empty_completion_stats() {
        let stats = CompletionStats::default();
        assert_eq!(stats.percent(), 0);
        assert!(!stats.is_complete());
    }
}

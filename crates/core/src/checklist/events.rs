use serde::{Deserialize, Serialize};

/// Notification that stored rows changed.
///
/// Carries no row data; observers re-read the snapshot they care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreChange {
    /// A checklist row was inserted, updated, touched or deleted.
    Checklist { checklist_id: i64 },
    /// Items belonging to the checklist were inserted, updated or deleted.
    Items { checklist_id: i64 },
}

impl StoreChange {
    /// Creates a checklist-row change.
    pub fn checklist(checklist_id: i64) -> Self {
        Self::Checklist { checklist_id }
    }

    /// Creates an item-set change.
    pub fn items(checklist_id: i64) -> Self {
        Self::Items { checklist_id }
    }

    /// The checklist the change belongs to.
    pub fn checklist_id(&self) -> i64 {
        match self {
            Self::Checklist { checklist_id } | Self::Items { checklist_id } => *checklist_id,
        }
    }

    /// Returns true if a list of all checklists may be stale after this change.
    pub fn affects_checklists(&self) -> bool {
        matches!(self, Self::Checklist { .. })
    }

    /// Returns true if the item set of `checklist_id` may be stale after this change.
    pub fn affects_items_of(&self, checklist_id: i64) -> bool {
        matches!(self, Self::Items { checklist_id: id } if *id == checklist_id)
    }
}

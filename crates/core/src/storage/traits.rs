use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::checklist::{Checklist, ChecklistItem};

use super::Result;

/// Repository for checklist rows.
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Gets a checklist by its ID.
    async fn get_checklist(&self, id: i64) -> Result<Option<Checklist>>;

    /// Gets every checklist, most recently modified first.
    ///
    /// Checklists with the same timestamp are ordered by ID, newest first.
    async fn list_checklists(&self) -> Result<Vec<Checklist>>;

    /// Inserts a checklist and returns the ID the store assigned.
    ///
    /// `checklist.id` is ignored.
    async fn create_checklist(&self, checklist: &Checklist) -> Result<i64>;

    /// Overwrites an existing checklist row.
    async fn update_checklist(&self, checklist: &Checklist) -> Result<()>;

    /// Sets only the last-modified timestamp of a checklist.
    async fn touch_checklist(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Deletes a checklist row.
    ///
    /// Items are removed by the schema's cascade; prefer
    /// [`ChecklistStore::delete_checklist_with_items`].
    async fn delete_checklist(&self, id: i64) -> Result<()>;
}

/// Repository for checklist item rows.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Gets an item by its ID.
    async fn get_item(&self, id: i64) -> Result<Option<ChecklistItem>>;

    /// Gets the items of a checklist in insertion order.
    async fn get_items_by_checklist(&self, checklist_id: i64) -> Result<Vec<ChecklistItem>>;

    /// Inserts an item and returns the ID the store assigned.
    ///
    /// `item.id` is ignored.
    async fn create_item(&self, item: &ChecklistItem) -> Result<i64>;

    /// Inserts a batch of items in a single transaction.
    ///
    /// Returns the assigned IDs in input order.
    async fn create_items(&self, items: &[ChecklistItem]) -> Result<Vec<i64>>;

    /// Inserts `items` only if the checklist has no items yet.
    ///
    /// The existence check and the insert happen atomically, so two callers
    /// racing on the same checklist seed it once. Returns true if the batch
    /// was inserted.
    async fn create_items_if_absent(
        &self,
        checklist_id: i64,
        items: &[ChecklistItem],
    ) -> Result<bool>;

    /// Overwrites an existing item row.
    async fn update_item(&self, item: &ChecklistItem) -> Result<()>;

    /// Deletes an item by its ID.
    async fn delete_item(&self, id: i64) -> Result<()>;

    /// Deletes every item of a checklist and returns how many were removed.
    async fn delete_items_by_checklist(&self, checklist_id: i64) -> Result<usize>;
}

/// A backend that stores both checklists and their items.
#[async_trait]
pub trait ChecklistStore: ChecklistRepository + ItemRepository {
    /// Deletes a checklist and all of its items as one atomic unit.
    ///
    /// Returns the number of items removed, or `NotFound` if the checklist
    /// does not exist (in which case nothing is deleted).
    async fn delete_checklist_with_items(&self, id: i64) -> Result<usize>;

    /// Overwrites an item and sets its checklist's last-modified time as one
    /// atomic unit.
    ///
    /// Fails with `NotFound` if either row is missing, and then writes nothing.
    async fn update_item_and_touch(&self, item: &ChecklistItem, at: DateTime<Utc>) -> Result<()>;
}

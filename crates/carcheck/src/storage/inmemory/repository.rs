//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use carcheck_core::checklist::{Checklist, ChecklistItem};
use carcheck_core::storage::{
    ChecklistRepository, ChecklistStore, ItemRepository, RepositoryError, Result,
};

/// In-memory storage backend.
///
/// Maps are keyed by ID, so iteration order is insertion order. IDs come
/// from monotonic counters and are never reused, like SQLite's AUTOINCREMENT.
///
/// Operations that touch both maps lock `checklists` before `items`.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    checklists: Arc<RwLock<BTreeMap<i64, Checklist>>>,
    items: Arc<RwLock<BTreeMap<i64, ChecklistItem>>>,
    next_checklist_id: Arc<AtomicI64>,
    next_item_id: Arc<AtomicI64>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            checklists: Arc::new(RwLock::new(BTreeMap::new())),
            items: Arc::new(RwLock::new(BTreeMap::new())),
            next_checklist_id: Arc::new(AtomicI64::new(1)),
            next_item_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn insert_item(&self, items: &mut BTreeMap<i64, ChecklistItem>, item: &ChecklistItem) -> i64 {
        let id = self.next_item_id.fetch_add(1, Ordering::SeqCst);
        items.insert(id, item.clone().with_id(id));
        id
    }
}

fn missing_parent(checklist_id: i64) -> RepositoryError {
    RepositoryError::InvalidData(format!(
        "Foreign key constraint violation for ChecklistItem (checklist {checklist_id})"
    ))
}

#[async_trait]
impl ChecklistRepository for InMemoryRepository {
    async fn get_checklist(&self, id: i64) -> Result<Option<Checklist>> {
        let checklists = self.checklists.read().await;
        Ok(checklists.get(&id).cloned())
    }

    async fn list_checklists(&self) -> Result<Vec<Checklist>> {
        let checklists = self.checklists.read().await;
        let mut all: Vec<Checklist> = checklists.values().cloned().collect();
        all.sort_by(|a, b| {
            b.last_modified
                .cmp(&a.last_modified)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(all)
    }

    async fn create_checklist(&self, checklist: &Checklist) -> Result<i64> {
        let mut checklists = self.checklists.write().await;
        let id = self.next_checklist_id.fetch_add(1, Ordering::SeqCst);
        checklists.insert(
            id,
            Checklist {
                id,
                ..checklist.clone()
            },
        );
        Ok(id)
    }

    async fn update_checklist(&self, checklist: &Checklist) -> Result<()> {
        let mut checklists = self.checklists.write().await;
        match checklists.get_mut(&checklist.id) {
            Some(stored) => {
                *stored = checklist.clone();
                Ok(())
            }
            None => Err(RepositoryError::checklist_not_found(checklist.id)),
        }
    }

    async fn touch_checklist(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let mut checklists = self.checklists.write().await;
        match checklists.get_mut(&id) {
            Some(stored) => {
                stored.last_modified = at;
                Ok(())
            }
            None => Err(RepositoryError::checklist_not_found(id)),
        }
    }

    async fn delete_checklist(&self, id: i64) -> Result<()> {
        self.delete_checklist_with_items(id).await.map(|_| ())
    }
}

#[async_trait]
impl ItemRepository for InMemoryRepository {
    async fn get_item(&self, id: i64) -> Result<Option<ChecklistItem>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn get_items_by_checklist(&self, checklist_id: i64) -> Result<Vec<ChecklistItem>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| item.checklist_id == checklist_id)
            .cloned()
            .collect())
    }

    async fn create_item(&self, item: &ChecklistItem) -> Result<i64> {
        let checklists = self.checklists.read().await;
        if !checklists.contains_key(&item.checklist_id) {
            return Err(missing_parent(item.checklist_id));
        }
        let mut items = self.items.write().await;
        Ok(self.insert_item(&mut items, item))
    }

    async fn create_items(&self, batch: &[ChecklistItem]) -> Result<Vec<i64>> {
        let checklists = self.checklists.read().await;
        if let Some(orphan) = batch
            .iter()
            .find(|item| !checklists.contains_key(&item.checklist_id))
        {
            return Err(missing_parent(orphan.checklist_id));
        }

        let mut items = self.items.write().await;
        Ok(batch
            .iter()
            .map(|item| self.insert_item(&mut items, item))
            .collect())
    }

    async fn create_items_if_absent(
        &self,
        checklist_id: i64,
        batch: &[ChecklistItem],
    ) -> Result<bool> {
        let checklists = self.checklists.read().await;
        if let Some(orphan) = batch
            .iter()
            .find(|item| !checklists.contains_key(&item.checklist_id))
        {
            return Err(missing_parent(orphan.checklist_id));
        }

        // Holding the write lock across the check makes it atomic.
        let mut items = self.items.write().await;
        if items.values().any(|item| item.checklist_id == checklist_id) {
            return Ok(false);
        }
        for item in batch {
            self.insert_item(&mut items, item);
        }
        Ok(true)
    }

    async fn update_item(&self, item: &ChecklistItem) -> Result<()> {
        let checklists = self.checklists.read().await;
        let mut items = self.items.write().await;
        if !items.contains_key(&item.id) {
            return Err(RepositoryError::item_not_found(item.id));
        }
        if !checklists.contains_key(&item.checklist_id) {
            return Err(missing_parent(item.checklist_id));
        }
        items.insert(item.id, item.clone());
        Ok(())
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        let mut items = self.items.write().await;
        items
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::item_not_found(id))
    }

    async fn delete_items_by_checklist(&self, checklist_id: i64) -> Result<usize> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|_, item| item.checklist_id != checklist_id);
        Ok(before - items.len())
    }
}

#[async_trait]
impl ChecklistStore for InMemoryRepository {
    async fn delete_checklist_with_items(&self, id: i64) -> Result<usize> {
        let mut checklists = self.checklists.write().await;
        let mut items = self.items.write().await;

        if checklists.remove(&id).is_none() {
            return Err(RepositoryError::checklist_not_found(id));
        }

        let before = items.len();
        items.retain(|_, item| item.checklist_id != id);
        Ok(before - items.len())
    }

    async fn update_item_and_touch(&self, item: &ChecklistItem, at: DateTime<Utc>) -> Result<()> {
        let mut checklists = self.checklists.write().await;
        let mut items = self.items.write().await;

        if !items.contains_key(&item.id) {
            return Err(RepositoryError::item_not_found(item.id));
        }
        let Some(checklist) = checklists.get_mut(&item.checklist_id) else {
            return Err(RepositoryError::checklist_not_found(item.checklist_id));
        };

        checklist.last_modified = at;
        items.insert(item.id, item.clone());
        Ok(())
    }
}

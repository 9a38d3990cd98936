//! The checklist façade used by every caller.
//!
//! `ChecklistService` owns validation, timestamping and change
//! notification. Storage backends only persist what they are given.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::Stream;

use carcheck_core::checklist::{
    completion_stats, items_for, normalize_checklist, resolve_answer, Checklist, ChecklistItem,
    ChecklistSummary, CompletionStats, NewChecklist, StoreChange,
};
use carcheck_core::storage::{ChecklistStore, RepositoryError};

use crate::error::{Result, ServiceError};
use crate::feed::ChangeFeed;

/// Checklist operations over any [`ChecklistStore`].
///
/// Cloning is cheap; clones share the store and the change feed.
pub struct ChecklistService<R> {
    repo: Arc<R>,
    feed: ChangeFeed,
}

impl<R> Clone for ChecklistService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            feed: self.feed.clone(),
        }
    }
}

impl<R> ChecklistService<R>
where
    R: ChecklistStore + 'static,
{
    /// Creates a service with a default-sized change feed.
    pub fn new(repo: Arc<R>) -> Self {
        Self::with_feed(repo, ChangeFeed::default())
    }

    /// Creates a service that publishes to the given feed.
    pub fn with_feed(repo: Arc<R>, feed: ChangeFeed) -> Self {
        Self { repo, feed }
    }

    // ========================================================================
    // Checklists
    // ========================================================================

    /// Validates and stores a new checklist, returning it with its ID.
    pub async fn insert_checklist(&self, new: NewChecklist) -> Result<Checklist> {
        let checklist = normalize_checklist(new.into_checklist(Utc::now()))?;

        let id = self.repo.create_checklist(&checklist).await?;
        tracing::info!(checklist_id = id, car_info = %checklist.car_info, "Created checklist");
        self.feed.publish(StoreChange::checklist(id));

        Ok(Checklist { id, ..checklist })
    }

    /// Validates and overwrites a checklist, stamping its last-modified time.
    pub async fn update_checklist(&self, checklist: Checklist) -> Result<Checklist> {
        let mut checklist = normalize_checklist(checklist)?;
        checklist.last_modified = Utc::now();

        self.repo.update_checklist(&checklist).await?;
        tracing::debug!(checklist_id = checklist.id, "Updated checklist");
        self.feed.publish(StoreChange::checklist(checklist.id));

        Ok(checklist)
    }

    /// Gets a checklist; a missing checklist is an error.
    pub async fn get_checklist(&self, id: i64) -> Result<Checklist> {
        self.repo
            .get_checklist(id)
            .await?
            .ok_or_else(|| RepositoryError::checklist_not_found(id).into())
    }

    /// Every checklist, most recently modified first.
    pub async fn list_checklists(&self) -> Result<Vec<Checklist>> {
        Ok(self.repo.list_checklists().await?)
    }

    /// Live version of [`Self::list_checklists`].
    ///
    /// Emits the current list right away and a fresh one after every
    /// checklist change. The stream ends when the service's feed is gone.
    pub fn watch_checklists(&self) -> impl Stream<Item = Result<Vec<Checklist>>> + Send + 'static {
        let repo = Arc::clone(&self.repo);
        let mut changes = self.feed.subscribe();

        async_stream::stream! {
            yield repo.list_checklists().await.map_err(ServiceError::from);

            while wait_for(&mut changes, StoreChange::affects_checklists).await {
                yield repo.list_checklists().await.map_err(ServiceError::from);
            }
        }
    }

    /// Deletes a checklist and all of its items atomically.
    ///
    /// Returns the number of items removed.
    pub async fn delete_checklist(&self, id: i64) -> Result<usize> {
        let removed = self.repo.delete_checklist_with_items(id).await?;
        tracing::info!(checklist_id = id, removed_items = removed, "Deleted checklist");

        self.feed.publish(StoreChange::checklist(id));
        self.feed.publish(StoreChange::items(id));

        Ok(removed)
    }

    // ========================================================================
    // Items
    // ========================================================================

    /// The items of a checklist in inspection order.
    pub async fn get_items(&self, checklist_id: i64) -> Result<Vec<ChecklistItem>> {
        Ok(self.repo.get_items_by_checklist(checklist_id).await?)
    }

    /// Live version of [`Self::get_items`].
    pub fn watch_items(
        &self,
        checklist_id: i64,
    ) -> impl Stream<Item = Result<Vec<ChecklistItem>>> + Send + 'static {
        let repo = Arc::clone(&self.repo);
        let mut changes = self.feed.subscribe();

        async_stream::stream! {
            yield repo.get_items_by_checklist(checklist_id).await.map_err(ServiceError::from);

            while wait_for(&mut changes, |change| change.affects_items_of(checklist_id)).await {
                yield repo.get_items_by_checklist(checklist_id).await.map_err(ServiceError::from);
            }
        }
    }

    /// Gives a checklist its catalog items if it has none yet, then returns its items.
    ///
    /// Safe to call on every visit: the catalog is applied at most once,
    /// even when callers race.
    pub async fn ensure_items(&self, checklist_id: i64) -> Result<Vec<ChecklistItem>> {
        // Fail with NotFound rather than a foreign-key error.
        self.get_checklist(checklist_id).await?;

        let seeded = self
            .repo
            .create_items_if_absent(checklist_id, &items_for(checklist_id))
            .await?;
        if seeded {
            tracing::info!(checklist_id, "Materialized checklist items from catalog");
            self.feed.publish(StoreChange::items(checklist_id));
        }

        self.get_items(checklist_id).await
    }

    /// Stores one item and returns it with its ID.
    pub async fn insert_item(&self, item: ChecklistItem) -> Result<ChecklistItem> {
        let id = self.repo.create_item(&item).await?;
        tracing::debug!(item_id = id, checklist_id = item.checklist_id, "Inserted item");
        self.feed.publish(StoreChange::items(item.checklist_id));

        Ok(item.with_id(id))
    }

    /// Stores a batch of items in one transaction.
    pub async fn insert_items(&self, items: Vec<ChecklistItem>) -> Result<Vec<ChecklistItem>> {
        let ids = self.repo.create_items(&items).await?;
        tracing::debug!(count = ids.len(), "Inserted items");

        let mut checklist_ids: Vec<i64> = items.iter().map(|item| item.checklist_id).collect();
        checklist_ids.sort_unstable();
        checklist_ids.dedup();
        for checklist_id in checklist_ids {
            self.feed.publish(StoreChange::items(checklist_id));
        }

        Ok(items
            .into_iter()
            .zip(ids)
            .map(|(item, id)| item.with_id(id))
            .collect())
    }

    /// Overwrites an item as given.
    pub async fn update_item(&self, item: ChecklistItem) -> Result<ChecklistItem> {
        self.repo.update_item(&item).await?;
        tracing::debug!(item_id = item.id, "Updated item");
        self.feed.publish(StoreChange::items(item.checklist_id));

        Ok(item)
    }

    /// Deletes one item.
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        let item = self.get_item(id).await?;

        self.repo.delete_item(id).await?;
        tracing::debug!(item_id = id, "Deleted item");
        self.feed.publish(StoreChange::items(item.checklist_id));

        Ok(())
    }

    /// Gets an item; a missing item is an error.
    pub async fn get_item(&self, id: i64) -> Result<ChecklistItem> {
        self.repo
            .get_item(id)
            .await?
            .ok_or_else(|| RepositoryError::item_not_found(id).into())
    }

    /// Records an answer for an item.
    ///
    /// `None` clears the answer. Invalid input for the item's kind is
    /// rejected and leaves the stored item untouched. On success the parent
    /// checklist's last-modified time moves forward in the same write.
    pub async fn answer_item(&self, item_id: i64, input: Option<&str>) -> Result<ChecklistItem> {
        let mut item = self.get_item(item_id).await?;
        item.value = resolve_answer(&item, input)?;

        self.repo.update_item_and_touch(&item, Utc::now()).await?;
        tracing::debug!(
            item_id,
            checklist_id = item.checklist_id,
            answered = item.is_answered(),
            "Answered item"
        );

        self.feed.publish(StoreChange::items(item.checklist_id));
        self.feed.publish(StoreChange::checklist(item.checklist_id));

        Ok(item)
    }

    // ========================================================================
    // Progress
    // ========================================================================

    /// Answered and total item counts, read from the current item set.
    pub async fn completion_stats(&self, checklist_id: i64) -> Result<CompletionStats> {
        let items = self.get_items(checklist_id).await?;
        Ok(completion_stats(&items))
    }

    /// Every checklist with its progress, most recently modified first.
    pub async fn list_summaries(&self) -> Result<Vec<ChecklistSummary>> {
        load_summaries(self.repo.as_ref()).await
    }

    /// Live version of [`Self::list_summaries`].
    ///
    /// Refreshes on any change, since item answers move the progress.
    pub fn watch_summaries(
        &self,
    ) -> impl Stream<Item = Result<Vec<ChecklistSummary>>> + Send + 'static {
        let repo = Arc::clone(&self.repo);
        let mut changes = self.feed.subscribe();

        async_stream::stream! {
            yield load_summaries(repo.as_ref()).await;

            while wait_for(&mut changes, |_| true).await {
                yield load_summaries(repo.as_ref()).await;
            }
        }
    }
}

async fn load_summaries<R: ChecklistStore>(repo: &R) -> Result<Vec<ChecklistSummary>> {
    let checklists = repo.list_checklists().await?;

    let mut summaries = Vec::with_capacity(checklists.len());
    for checklist in checklists {
        let items = repo.get_items_by_checklist(checklist.id).await?;
        summaries.push(ChecklistSummary {
            stats: completion_stats(&items),
            checklist,
        });
    }
    Ok(summaries)
}

/// Waits until a change matching `relevant` arrives.
///
/// Returns false once the feed is closed. A lagged receiver has missed
/// changes it cannot inspect, so it counts as relevant.
async fn wait_for<F>(changes: &mut tokio::sync::broadcast::Receiver<StoreChange>, relevant: F) -> bool
where
    F: Fn(&StoreChange) -> bool,
{
    loop {
        match changes.recv().await {
            Ok(change) if relevant(&change) => return true,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Change feed lagged, refreshing snapshot");
                return true;
            }
            Err(RecvError::Closed) => return false,
        }
    }
}

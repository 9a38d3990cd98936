//! SQLite repository implementation.
//!
//! Implements the repository traits from `carcheck_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;
use tokio_rusqlite::Connection;

use carcheck_core::checklist::{Checklist, ChecklistItem};
use carcheck_core::storage::{
    ChecklistRepository, ChecklistStore, ItemRepository, RepositoryError, Result,
};

use super::conversions::{format_datetime, row_to_checklist, row_to_item, ItemRow};
use super::error::map_call_error;
use super::schema;

const CHECKLIST: &str = "Checklist";
const ITEM: &str = "ChecklistItem";

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Turns a zero-row write into `QueryReturnedNoRows`, which maps to `NotFound`.
fn require_rows(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

fn insert_item_row(
    conn: &rusqlite::Connection,
    row: &ItemRow,
) -> std::result::Result<i64, tokio_rusqlite::Error> {
    conn.execute(
        schema::INSERT_ITEM,
        rusqlite::params![
            row.checklist_id,
            row.section,
            row.question,
            row.kind,
            row.options,
            row.value
        ],
    )
    .map_err(wrap_err)?;
    Ok(conn.last_insert_rowid())
}

fn update_item_row(
    conn: &rusqlite::Connection,
    id: i64,
    row: &ItemRow,
) -> std::result::Result<(), tokio_rusqlite::Error> {
    let rows = conn
        .execute(
            schema::UPDATE_ITEM,
            rusqlite::params![
                id,
                row.checklist_id,
                row.section,
                row.question,
                row.kind,
                row.options,
                row.value
            ],
        )
        .map_err(wrap_err)?;
    require_rows(rows)
}

/// SQLite-based repository implementation.
///
/// A single connection serialized through `tokio_rusqlite`'s background
/// thread, so every call observes the writes of the calls before it.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database and applies the schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(path, "Opened SQLite checklist store");

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Data is lost when the repository is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CONNECTION_PRAGMAS)
                .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// ChecklistRepository implementation
// ============================================================================

#[async_trait]
impl ChecklistRepository for SqliteRepository {
    async fn get_checklist(&self, id: i64) -> Result<Option<Checklist>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CHECKLIST_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([id], row_to_checklist) {
                    Ok(checklist) => Ok(Some(checklist)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, Some(id)))
    }

    async fn list_checklists(&self) -> Result<Vec<Checklist>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ALL_CHECKLISTS)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_checklist).map_err(wrap_err)?;

                let mut checklists = Vec::new();
                for row_result in rows {
                    checklists.push(row_result.map_err(wrap_err)?);
                }
                Ok(checklists)
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, None))
    }

    async fn create_checklist(&self, checklist: &Checklist) -> Result<i64> {
        let date = format_datetime(&checklist.date);
        let car_info = checklist.car_info.clone();
        let vin = checklist.vin.clone();
        let last_modified = format_datetime(&checklist.last_modified);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_CHECKLIST,
                    rusqlite::params![date, car_info, vin, last_modified],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, None))
    }

    async fn update_checklist(&self, checklist: &Checklist) -> Result<()> {
        let id = checklist.id;
        let date = format_datetime(&checklist.date);
        let car_info = checklist.car_info.clone();
        let vin = checklist.vin.clone();
        let last_modified = format_datetime(&checklist.last_modified);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_CHECKLIST,
                        rusqlite::params![id, date, car_info, vin, last_modified],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, Some(id)))
    }

    async fn touch_checklist(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let last_modified = format_datetime(&at);

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::TOUCH_CHECKLIST, rusqlite::params![id, last_modified])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, Some(id)))
    }

    async fn delete_checklist(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_CHECKLIST, [id])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, Some(id)))
    }
}

// ============================================================================
// ItemRepository implementation
// ============================================================================

#[async_trait]
impl ItemRepository for SqliteRepository {
    async fn get_item(&self, id: i64) -> Result<Option<ChecklistItem>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_ITEM_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([id], row_to_item) {
                    Ok(item) => Ok(Some(item)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, Some(id)))
    }

    async fn get_items_by_checklist(&self, checklist_id: i64) -> Result<Vec<ChecklistItem>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ITEMS_BY_CHECKLIST)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([checklist_id], row_to_item).map_err(wrap_err)?;

                let mut items = Vec::new();
                for row_result in rows {
                    items.push(row_result.map_err(wrap_err)?);
                }
                Ok(items)
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, None))
    }

    async fn create_item(&self, item: &ChecklistItem) -> Result<i64> {
        let row = ItemRow::from_item(item)?;

        self.conn
            .call(move |conn| insert_item_row(conn, &row))
            .await
            .map_err(|e| map_call_error(e, ITEM, None))
    }

    async fn create_items(&self, items: &[ChecklistItem]) -> Result<Vec<i64>> {
        let rows = items
            .iter()
            .map(ItemRow::from_item)
            .collect::<Result<Vec<_>>>()?;

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let mut ids = Vec::with_capacity(rows.len());
                for row in &rows {
                    ids.push(insert_item_row(&tx, row)?);
                }
                tx.commit().map_err(wrap_err)?;
                Ok(ids)
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, None))
    }

    async fn create_items_if_absent(
        &self,
        checklist_id: i64,
        items: &[ChecklistItem],
    ) -> Result<bool> {
        let rows = items
            .iter()
            .map(ItemRow::from_item)
            .collect::<Result<Vec<_>>>()?;

        self.conn
            .call(move |conn| {
                // IMMEDIATE takes the write lock up front so the count and the
                // inserts cannot interleave with another writer.
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let existing: i64 = tx
                    .query_row(schema::COUNT_ITEMS_BY_CHECKLIST, [checklist_id], |row| {
                        row.get(0)
                    })
                    .map_err(wrap_err)?;
                if existing > 0 {
                    return Ok(false);
                }

                for row in &rows {
                    insert_item_row(&tx, row)?;
                }
                tx.commit().map_err(wrap_err)?;
                Ok(true)
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, None))
    }

    async fn update_item(&self, item: &ChecklistItem) -> Result<()> {
        let id = item.id;
        let row = ItemRow::from_item(item)?;

        self.conn
            .call(move |conn| update_item_row(conn, id, &row))
            .await
            .map_err(|e| map_call_error(e, ITEM, Some(id)))
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_ITEM, [id]).map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, Some(id)))
    }

    async fn delete_items_by_checklist(&self, checklist_id: i64) -> Result<usize> {
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_ITEMS_BY_CHECKLIST, [checklist_id])
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, None))
    }
}

// ============================================================================
// ChecklistStore implementation
// ============================================================================

#[async_trait]
impl ChecklistStore for SqliteRepository {
    async fn delete_checklist_with_items(&self, id: i64) -> Result<usize> {
        self.conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;

                let removed_items = tx
                    .execute(schema::DELETE_ITEMS_BY_CHECKLIST, [id])
                    .map_err(wrap_err)?;
                let removed_checklists = tx
                    .execute(schema::DELETE_CHECKLIST, [id])
                    .map_err(wrap_err)?;
                // Dropping the transaction rolls back the item deletion.
                require_rows(removed_checklists)?;

                tx.commit().map_err(wrap_err)?;
                Ok(removed_items)
            })
            .await
            .map_err(|e| map_call_error(e, CHECKLIST, Some(id)))
    }

    async fn update_item_and_touch(&self, item: &ChecklistItem, at: DateTime<Utc>) -> Result<()> {
        let id = item.id;
        let row = ItemRow::from_item(item)?;
        let last_modified = format_datetime(&at);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                update_item_row(&tx, id, &row)?;
                let touched = tx
                    .execute(
                        schema::TOUCH_CHECKLIST,
                        rusqlite::params![row.checklist_id, last_modified],
                    )
                    .map_err(wrap_err)?;
                require_rows(touched)?;

                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_call_error(e, ITEM, Some(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carcheck_core::checklist::{items_for, ItemKind, NewChecklist, Section};
    use chrono::Duration;

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn checklist(car_info: &str) -> Checklist {
        let now = Utc::now();
        NewChecklist::new(now)
            .with_car_info(car_info)
            .into_checklist(now)
    }

    async fn seeded(repo: &SqliteRepository) -> i64 {
        repo.create_checklist(&checklist("1965 Mustang")).await.unwrap()
    }

    // ==================== Checklist Tests ====================

    #[tokio::test]
    async fn test_checklist_create_and_get() {
        let repo = repo().await;
        let input = checklist("1965 Mustang");

        let id = repo.create_checklist(&input).await.unwrap();
        let stored = repo.get_checklist(id).await.unwrap().unwrap();

        assert!(id > 0);
        assert_eq!(stored, Checklist { id, ..input });
    }

    #[tokio::test]
    async fn test_checklist_ids_are_not_reused() {
        let repo = repo().await;
        let first = seeded(&repo).await;
        repo.delete_checklist(first).await.unwrap();

        let second = seeded(&repo).await;
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_checklist_get_nonexistent() {
        let repo = repo().await;
        assert!(repo.get_checklist(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_checklists_orders_by_last_modified() {
        let repo = repo().await;
        let base = Utc::now();

        let mut older = checklist("older");
        older.last_modified = base - Duration::minutes(5);
        let mut newer = checklist("newer");
        newer.last_modified = base;

        let older_id = repo.create_checklist(&older).await.unwrap();
        let newer_id = repo.create_checklist(&newer).await.unwrap();

        let ids: Vec<_> = repo
            .list_checklists()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![newer_id, older_id]);

        repo.touch_checklist(older_id, base + Duration::seconds(1))
            .await
            .unwrap();
        let ids: Vec<_> = repo
            .list_checklists()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![older_id, newer_id]);
    }

    #[tokio::test]
    async fn test_update_checklist() {
        let repo = repo().await;
        let id = seeded(&repo).await;

        let mut stored = repo.get_checklist(id).await.unwrap().unwrap();
        stored.vin = "5F08F123456789".to_string();
        repo.update_checklist(&stored).await.unwrap();

        assert_eq!(repo.get_checklist(id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_update_missing_checklist_is_not_found() {
        let repo = repo().await;
        let mut missing = checklist("ghost");
        missing.id = 99;

        let err = repo.update_checklist(&missing).await.unwrap_err();
        assert_eq!(err, RepositoryError::checklist_not_found(99));

        let err = repo.touch_checklist(99, Utc::now()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    // ==================== Item Tests ====================

    #[tokio::test]
    async fn test_item_create_and_get() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let item = ChecklistItem::new(checklist_id, Section::TiresLugNuts, "Tire condition", ItemKind::MultiChoice)
            .with_options(["POOR", "FAIR", "GOOD"]);

        let id = repo.create_item(&item).await.unwrap();
        let stored = repo.get_item(id).await.unwrap().unwrap();

        assert_eq!(stored, item.with_id(id));
    }

    #[tokio::test]
    async fn test_item_requires_existing_checklist() {
        let repo = repo().await;
        let orphan = ChecklistItem::new(404, Section::Lights, "Lights", ItemKind::YesNo);

        let err = repo.create_item(&orphan).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidData(_)));
    }

    #[tokio::test]
    async fn test_create_items_keeps_catalog_order() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let template = items_for(checklist_id);

        let ids = repo.create_items(&template).await.unwrap();
        let stored = repo.get_items_by_checklist(checklist_id).await.unwrap();

        assert_eq!(ids.len(), template.len());
        assert_eq!(stored.iter().map(|i| i.id).collect::<Vec<_>>(), ids);
        assert_eq!(
            stored.iter().map(|i| &i.question).collect::<Vec<_>>(),
            template.iter().map(|i| &i.question).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_create_items_is_all_or_nothing() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let batch = vec![
            ChecklistItem::new(checklist_id, Section::Lights, "Lights", ItemKind::YesNo),
            ChecklistItem::new(404, Section::Lights, "Orphan", ItemKind::YesNo),
        ];

        assert!(repo.create_items(&batch).await.is_err());
        assert!(repo.get_items_by_checklist(checklist_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_items_if_absent_seeds_once() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let template = items_for(checklist_id);

        assert!(repo.create_items_if_absent(checklist_id, &template).await.unwrap());
        assert!(!repo.create_items_if_absent(checklist_id, &template).await.unwrap());

        let stored = repo.get_items_by_checklist(checklist_id).await.unwrap();
        assert_eq!(stored.len(), template.len());
    }

    #[tokio::test]
    async fn test_update_item_value() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let item = ChecklistItem::new(checklist_id, Section::EngineBay, "Where:", ItemKind::TextInput);
        let id = repo.create_item(&item).await.unwrap();

        let answered = item.clone().with_id(id).with_value("Oil pan, \"minor\" seep & drip");
        repo.update_item(&answered).await.unwrap();
        assert_eq!(repo.get_item(id).await.unwrap(), Some(answered.clone()));

        let cleared = ChecklistItem { value: None, ..answered };
        repo.update_item(&cleared).await.unwrap();
        assert_eq!(repo.get_item(id).await.unwrap().unwrap().value, None);
    }

    #[tokio::test]
    async fn test_delete_item() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let id = repo
            .create_item(&ChecklistItem::new(checklist_id, Section::Trunk, "Spare tire", ItemKind::YesNo))
            .await
            .unwrap();

        repo.delete_item(id).await.unwrap();
        assert!(repo.get_item(id).await.unwrap().is_none());
        assert_eq!(
            repo.delete_item(id).await.unwrap_err(),
            RepositoryError::item_not_found(id)
        );
    }

    #[tokio::test]
    async fn test_undecodable_options_read_as_empty() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let id = repo
            .create_item(
                &ChecklistItem::new(checklist_id, Section::TestDrive, "Drivability", ItemKind::MultiChoice)
                    .with_options(["POOR", "GREAT"]),
            )
            .await
            .unwrap();

        repo.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE checklist_items SET options = 'broken' WHERE id = ?1",
                    [id],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .unwrap();

        let item = repo.get_item(id).await.unwrap().unwrap();
        assert!(item.options.is_empty());
    }

    // ==================== Store Tests ====================

    #[tokio::test]
    async fn test_delete_checklist_with_items() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let other_id = seeded(&repo).await;
        repo.create_items(&items_for(checklist_id)).await.unwrap();
        repo.create_items(&items_for(other_id)).await.unwrap();

        let removed = repo.delete_checklist_with_items(checklist_id).await.unwrap();

        assert_eq!(removed, 58);
        assert!(repo.get_checklist(checklist_id).await.unwrap().is_none());
        assert!(repo.get_items_by_checklist(checklist_id).await.unwrap().is_empty());
        assert_eq!(repo.get_items_by_checklist(other_id).await.unwrap().len(), 58);
    }

    #[tokio::test]
    async fn test_delete_missing_checklist_is_not_found() {
        let repo = repo().await;
        let err = repo.delete_checklist_with_items(7).await.unwrap_err();
        assert_eq!(err, RepositoryError::checklist_not_found(7));
    }

    #[tokio::test]
    async fn test_deleting_checklist_row_cascades_to_items() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        repo.create_items(&items_for(checklist_id)).await.unwrap();

        repo.delete_checklist(checklist_id).await.unwrap();

        assert!(repo.get_items_by_checklist(checklist_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_item_and_touch() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let item = ChecklistItem::new(checklist_id, Section::Lights, "Lights", ItemKind::YesNo);
        let id = repo.create_item(&item).await.unwrap();
        let later = Utc::now() + Duration::minutes(5);

        let answered = item.with_id(id).with_value("YES");
        repo.update_item_and_touch(&answered, later).await.unwrap();

        assert_eq!(repo.get_item(id).await.unwrap(), Some(answered));
        assert_eq!(
            repo.get_checklist(checklist_id).await.unwrap().unwrap().last_modified,
            later
        );
    }

    #[tokio::test]
    async fn test_update_missing_item_does_not_touch() {
        let repo = repo().await;
        let checklist_id = seeded(&repo).await;
        let before = repo.get_checklist(checklist_id).await.unwrap().unwrap();
        let ghost = ChecklistItem::new(checklist_id, Section::Lights, "Lights", ItemKind::YesNo)
            .with_id(404)
            .with_value("NO");

        let err = repo
            .update_item_and_touch(&ghost, before.last_modified + Duration::minutes(5))
            .await
            .unwrap_err();

        assert_eq!(err, RepositoryError::item_not_found(404));
        assert_eq!(repo.get_checklist(checklist_id).await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn test_file_database_persists_between_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carcheck.db");
        let path = path.to_str().unwrap();

        let id = {
            let repo = SqliteRepository::new(path).await.unwrap();
            let id = seeded(&repo).await;
            repo.create_items(&items_for(id)).await.unwrap();
            id
        };

        let reopened = SqliteRepository::new(path).await.unwrap();
        assert!(reopened.get_checklist(id).await.unwrap().is_some());
        assert_eq!(reopened.get_items_by_checklist(id).await.unwrap().len(), 58);
    }
}

//! Durable task storage backed by SQLite.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use thiserror::Error;

/// Persisted shape of a task.
///
/// `id` is assigned by the store on insert and never reused afterwards.
/// `end_time` is written by callers when they decide a task is finished; no
/// operation here populates it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct TaskRecord {
    pub id: i64,
    pub title: Option<String>,
    pub description: Option<String>,
    pub estimated_time: f32,
    pub due_date: NaiveDateTime,
    pub is_complete: Option<bool>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage contract for task records.
///
/// The API service only sees this trait, so tests can swap the SQLite
/// implementation for an in-memory fake. Mutating methods commit durably
/// before returning; there is no pending-change buffer to flush separately.
/// No optimistic concurrency: concurrent writers to the same id are
/// last-commit-wins.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Looks up a single record by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<TaskRecord>, StoreError>;

    /// Returns every record, in insertion order.
    async fn list_all(&self) -> Result<Vec<TaskRecord>, StoreError>;

    /// Persists a new record, ignoring `task.id`, and returns the assigned id.
    async fn insert(&self, task: &TaskRecord) -> Result<i64, StoreError>;

    /// Overwrites the record with `task.id` with the given field values.
    async fn update(&self, task: &TaskRecord) -> Result<(), StoreError>;

    /// Deletes the record with the given id. Returns whether a record existed.
    async fn remove(&self, id: i64) -> Result<bool, StoreError>;
}

// AUTOINCREMENT keeps SQLite from ever reusing the id of a deleted row.
const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS tasks (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    title          TEXT,
    description    TEXT,
    estimated_time REAL NOT NULL,
    due_date       TEXT NOT NULL,
    is_complete    INTEGER,
    start_time     TEXT NOT NULL,
    end_time       TEXT
)";

/// Creates the schema if it does not exist yet. Run once at startup, before
/// the server starts accepting requests.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// [`TaskStore`] implementation over a sqlx SQLite pool.
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<TaskRecord>, StoreError> {
        let task = sqlx::query_as::<_, TaskRecord>("SELECT * FROM tasks WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn list_all(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let tasks = sqlx::query_as::<_, TaskRecord>("SELECT * FROM tasks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    async fn insert(&self, task: &TaskRecord) -> Result<i64, StoreError> {
        let result = sqlx::query(
            "INSERT INTO tasks \
             (title, description, estimated_time, due_date, is_complete, start_time, end_time) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.estimated_time)
        .bind(task.due_date)
        .bind(task.is_complete)
        .bind(task.start_time)
        .bind(task.end_time)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update(&self, task: &TaskRecord) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE tasks SET \
             title = ?1, description = ?2, estimated_time = ?3, due_date = ?4, \
             is_complete = ?5, start_time = ?6, end_time = ?7 \
             WHERE id = ?8",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.estimated_time)
        .bind(task.due_date)
        .bind(task.is_complete)
        .bind(task.start_time)
        .bind(task.end_time)
        .bind(task.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::sqlite::SqlitePoolOptions;

    // A multi-connection pool would give every connection its own private
    // in-memory database, so tests pin the pool to a single connection.
    async fn test_store() -> SqliteTaskStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate(&pool).await.unwrap();
        SqliteTaskStore::new(pool)
    }

    fn record(title: &str) -> TaskRecord {
        TaskRecord {
            id: 0,
            title: Some(title.to_string()),
            description: Some("2%".to_string()),
            estimated_time: 0.5,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            is_complete: Some(false),
            start_time: NaiveDate::from_ymd_opt(2024, 12, 31)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            end_time: None,
        }
    }

    #[actix_web::test]
    async fn insert_assigns_id_and_find_round_trips() {
        let store = test_store().await;

        let id = store.insert(&record("Buy milk")).await.unwrap();
        let found = store.find_by_id(id).await.unwrap().unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.title.as_deref(), Some("Buy milk"));
        assert_eq!(found.description.as_deref(), Some("2%"));
        assert_eq!(found.estimated_time, 0.5);
        assert_eq!(found.is_complete, Some(false));
        assert_eq!(found.end_time, None);
    }

    #[actix_web::test]
    async fn ids_are_unique_and_never_reused() {
        let store = test_store().await;

        let first = store.insert(&record("a")).await.unwrap();
        let second = store.insert(&record("b")).await.unwrap();
        assert_ne!(first, second);

        assert!(store.remove(second).await.unwrap());
        let third = store.insert(&record("c")).await.unwrap();
        assert!(third > second);
    }

    #[actix_web::test]
    async fn list_all_returns_records_in_insertion_order() {
        let store = test_store().await;
        assert!(store.list_all().await.unwrap().is_empty());

        store.insert(&record("first")).await.unwrap();
        store.insert(&record("second")).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title.as_deref(), Some("first"));
        assert_eq!(all[1].title.as_deref(), Some("second"));
    }

    #[actix_web::test]
    async fn update_overwrites_the_stored_record() {
        let store = test_store().await;
        let id = store.insert(&record("before")).await.unwrap();

        let mut task = store.find_by_id(id).await.unwrap().unwrap();
        task.title = Some("after".to_string());
        task.is_complete = Some(true);
        store.update(&task).await.unwrap();

        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.title.as_deref(), Some("after"));
        assert_eq!(found.is_complete, Some(true));
        assert_eq!(found.description.as_deref(), Some("2%"));
    }

    #[actix_web::test]
    async fn remove_reports_whether_a_record_existed() {
        let store = test_store().await;
        let id = store.insert(&record("gone")).await.unwrap();

        assert!(store.remove(id).await.unwrap());
        assert!(!store.remove(id).await.unwrap());
        assert_eq!(store.find_by_id(id).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn find_by_id_returns_none_for_unknown_id() {
        let store = test_store().await;
        assert_eq!(store.find_by_id(42).await.unwrap(), None);
    }
}

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::domain::repository::TaskRepository;
use crate::domain::task::{Task, TaskId};

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTaskRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // Every connection to :memory: opens its own database; cap the pool at one there.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> Result<()> {
        // AUTOINCREMENT keeps ids strictly increasing even after the highest row is deleted.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT 0
            )",
        )
        .execute(&*self.pool)
        .await?;
        Ok(())
    }

    async fn create(&self, text: String) -> Result<Task> {
        let result = sqlx::query("INSERT INTO todos (text) VALUES (?1)")
            .bind(&text)
            .execute(&*self.pool)
            .await?;
        let id = TaskId(result.last_insert_rowid());
        Ok(Task { id, text, completed: false })
    }

    async fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT id, text, completed FROM todos WHERE id = ?1")
            .bind(id.0)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_task))
    }

    async fn list(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query("SELECT id, text, completed FROM todos ORDER BY id ASC")
            .fetch_all(&*self.pool)
            .await?;
        Ok(rows.into_iter().map(row_to_task).collect())
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Option<Task>> {
        let Some(mut task) = self.get(id).await? else { return Ok(None) };
        sqlx::query("UPDATE todos SET completed = ?2 WHERE id = ?1")
            .bind(id.0)
            .bind(completed)
            .execute(&*self.pool)
            .await?;
        task.completed = completed;
        Ok(Some(task))
    }

    async fn delete(&self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.0)
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_task(row: SqliteRow) -> Task {
    Task {
        id: TaskId(row.get("id")),
        text: row.get("text"),
        completed: row.get("completed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteTaskRepository {
        let repo = SqliteTaskRepository::connect("sqlite::memory:").await.unwrap();
        repo.init().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn init_is_idempotent() {
        let repo = repo().await;
        repo.init().await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_defaults_and_lists_in_id_order() {
        let repo = repo().await;
        let a = repo.create("first".into()).await.unwrap();
        let b = repo.create("second".into()).await.unwrap();
        assert!(!a.completed);
        assert!(b.id > a.id);
        assert_eq!(repo.list().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn ids_keep_growing_after_delete() {
        let repo = repo().await;
        let a = repo.create("a".into()).await.unwrap();
        let b = repo.create("b".into()).await.unwrap();
        assert!(repo.delete(b.id).await.unwrap());
        let c = repo.create("c".into()).await.unwrap();
        assert!(c.id > b.id);
        assert_eq!(repo.list().await.unwrap(), vec![a, c]);
    }

    #[tokio::test]
    async fn set_completed_round_trips_and_keeps_text() {
        let repo = repo().await;
        let task = repo.create("laundry".into()).await.unwrap();
        let done = repo.set_completed(task.id, true).await.unwrap().unwrap();
        assert!(done.completed);
        assert_eq!(done.text, "laundry");
        let back = repo.set_completed(task.id, false).await.unwrap().unwrap();
        assert_eq!(back, task);
        assert_eq!(repo.get(task.id).await.unwrap().unwrap(), task);
    }

    #[tokio::test]
    async fn missing_ids_are_reported() {
        let repo = repo().await;
        assert!(repo.get(TaskId(42)).await.unwrap().is_none());
        assert!(repo.set_completed(TaskId(42), true).await.unwrap().is_none());
        assert!(!repo.delete(TaskId(42)).await.unwrap());
    }
}

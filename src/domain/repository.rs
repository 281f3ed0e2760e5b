use async_trait::async_trait;

use super::task::{Task, TaskId};

#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    async fn create(&self, text: String) -> anyhow::Result<Task>;
    async fn get(&self, id: TaskId) -> anyhow::Result<Option<Task>>;
    async fn list(&self) -> anyhow::Result<Vec<Task>>;
    async fn set_completed(&self, id: TaskId, completed: bool) -> anyhow::Result<Option<Task>>;
    async fn delete(&self, id: TaskId) -> anyhow::Result<bool>;
}

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::repository::TaskRepository;
use crate::domain::task::{Task, TaskId};

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn create(&self, text: String) -> Result<Task>;
    async fn list(&self) -> Result<Vec<Task>>;
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Option<Task>>;
    async fn delete(&self, id: TaskId) -> Result<bool>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn create(&self, text: String) -> Result<Task> { self.repo.create(text).await }
    async fn list(&self) -> Result<Vec<Task>> { self.repo.list().await }
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Option<Task>> {
        self.repo.set_completed(id, completed).await
    }
    async fn delete(&self, id: TaskId) -> Result<bool> { self.repo.delete(id).await }
}

use crate::client::api::{ApiClientError, TodoApi};
use crate::client::model::TaskListModel;
use crate::domain::task::TaskId;

/// Drives the display model against the HTTP API. Every failure is logged
/// and the previous state stays on screen; nothing is retried.
pub struct TodoClient {
    api: TodoApi,
    model: TaskListModel,
}

impl TodoClient {
    pub fn new(api: TodoApi) -> Self {
        Self { api, model: TaskListModel::new() }
    }

    pub fn model(&self) -> &TaskListModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut TaskListModel {
        &mut self.model
    }

    pub async fn refresh(&mut self) {
        match self.api.list().await {
            Ok(tasks) => self.model.replace_all(tasks),
            Err(err) => tracing::warn!(error = %err, "failed to fetch todos"),
        }
    }

    pub async fn submit(&mut self) {
        let Some(text) = self.model.begin_submit() else { return };
        match self.api.create(&text).await {
            Ok(task) => self.model.complete_submit(task),
            Err(err) => tracing::warn!(error = %err, "failed to add todo"),
        }
    }

    pub async fn toggle(&mut self, id: TaskId) {
        let Some(completed) = self.model.begin_toggle(id) else { return };
        match self.api.set_completed(id, completed).await {
            Ok(task) => self.model.complete_toggle(id, Some(task)),
            Err(err) => {
                tracing::warn!(error = %err, "failed to toggle todo");
                self.model.complete_toggle(id, None);
            }
        }
    }

    pub async fn remove(&mut self, id: TaskId) {
        if !self.model.begin_delete(id) {
            return;
        }
        match self.api.delete(id).await {
            Ok(()) => self.model.complete_delete(id, true),
            // An error status is still a completed exchange; the row goes away
            // locally either way. Only a transport failure keeps it.
            Err(err @ ApiClientError::Status(_)) => {
                tracing::warn!(error = %err, "delete returned an error status");
                self.model.complete_delete(id, true);
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to delete todo");
                self.model.complete_delete(id, false);
            }
        }
    }
}

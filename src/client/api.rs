use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::domain::task::{Task, TaskId};

/// A non-success status is a completed exchange; a transport error means
/// the request may or may not have reached the server.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("server returned {0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Thin wrapper over the service's HTTP surface.
#[derive(Debug, Clone)]
pub struct TodoApi {
    http: Client,
    base_url: String,
}

impl TodoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: Client::new(), base_url }
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiClientError> {
        let res = self.http.get(self.url("/todos")).send().await?;
        Ok(Self::ok(res)?.json().await?)
    }

    pub async fn create(&self, text: &str) -> Result<Task, ApiClientError> {
        let res = self
            .http
            .post(self.url("/todos"))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await?;
        Ok(Self::ok(res)?.json().await?)
    }

    pub async fn set_completed(&self, id: TaskId, completed: bool) -> Result<Task, ApiClientError> {
        let res = self
            .http
            .put(self.url(&format!("/todos/{}", id.0)))
            .json(&serde_json::json!({ "completed": completed }))
            .send()
            .await?;
        Ok(Self::ok(res)?.json().await?)
    }

    pub async fn delete(&self, id: TaskId) -> Result<(), ApiClientError> {
        let res = self.http.delete(self.url(&format!("/todos/{}", id.0))).send().await?;
        Self::ok(res)?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn ok(res: Response) -> Result<Response, ApiClientError> {
        if res.status().is_success() {
            Ok(res)
        } else {
            Err(ApiClientError::Status(res.status()))
        }
    }
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::{Json, Router};
use serde::Deserialize;

use crate::application::task_service::TaskService;
use crate::domain::task::{Task, TaskId};
use crate::http::error::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> {
    pub service: S,
}

pub fn router<S: TaskService + Clone>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", post(create_todo::<S>).get(list_todos::<S>))
        .route("/todos/:id", put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

async fn list_todos<S: TaskService>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.service.list().await?;
    Ok(Json(tasks))
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    #[serde(default)]
    text: Option<String>,
}

async fn create_todo<S: TaskService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    // An unreadable body, a missing field, and empty text are all the same fault.
    let text = payload
        .ok()
        .and_then(|Json(body)| body.text)
        .filter(|text| !text.is_empty())
        .ok_or(ApiError::TextRequired)?;
    let task = state.service.create(text).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    completed: bool,
}

async fn update_todo<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateBody>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    match state.service.set_completed(TaskId(id), body.completed).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::NotFound),
    }
}

async fn delete_todo<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.service.delete(TaskId(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

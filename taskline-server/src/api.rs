//! REST handlers for the task collection and item endpoints.
//!
//! Four operations over `/api/todos`: list, create, update, delete. Each
//! handler runs its own load-mutate-save cycle through the shared
//! [`TaskStore`]; there is no cross-request cache.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use taskline_proto::task::{self, Task, TaskPatch};

use crate::static_files::StaticFiles;
use crate::store::{StoreError, TaskStore};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Task persistence, shared across requests.
    pub store: Arc<TaskStore>,
    /// Static front-end responder for unmatched paths.
    pub statics: Arc<StaticFiles>,
}

/// Error responses for the API surface.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was not valid JSON in the expected shape.
    #[error("invalid request body")]
    InvalidData,
    /// No task with the requested id exists.
    #[error("todo not found")]
    NotFound,
    /// The snapshot could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidData => (StatusCode::BAD_REQUEST, "Invalid data"),
            Self::NotFound => (StatusCode::NOT_FOUND, "Todo not found"),
            Self::Store(e) => {
                tracing::error!(error = %e, "task mutation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Body of a create request.
#[derive(Debug, Deserialize)]
struct CreateTodo {
    text: String,
}

/// Routes for the collection and item endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            axum::routing::put(update_todo).delete(delete_todo),
        )
}

/// `GET /api/todos` — the full task list.
async fn list_todos(State(state): State<AppState>) -> Json<Vec<Task>> {
    Json(state.store.snapshot().await)
}

/// `POST /api/todos` — create a task from `{"text": ...}`.
///
/// The new task gets id max+1 (1 when the list is empty), starts
/// uncompleted, and is stamped with the current UTC time. A body that is
/// not JSON carrying a string `text` answers 400.
async fn create_todo(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let req: CreateTodo = serde_json::from_str(&body).map_err(|_| ApiError::InvalidData)?;
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let created = state
        .store
        .mutate(move |tasks| {
            let new = Task::new(task::next_id(tasks), req.text, created_at);
            tasks.push(new.clone());
            new
        })
        .await?;

    tracing::debug!(id = created.id, "task created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/todos/{id}` — shallow-merge a partial update onto one task.
///
/// An invalid JSON body answers 400, consistent with create; an unknown id
/// answers 404 without touching the snapshot.
async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    body: String,
) -> Result<Json<Task>, ApiError> {
    let patch: TaskPatch = serde_json::from_str(&body).map_err(|_| ApiError::InvalidData)?;

    let updated = state
        .store
        .try_mutate(move |tasks| {
            let found = tasks.iter_mut().find(|t| t.id == id)?;
            found.apply(&patch);
            Some(found.clone())
        })
        .await?;

    updated.map(Json).ok_or(ApiError::NotFound)
}

/// `DELETE /api/todos/{id}` — remove one task.
///
/// Answers 204 with an empty body on success; an unknown id answers 404
/// and leaves the snapshot untouched.
async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .store
        .try_mutate(move |tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            (tasks.len() != before).then_some(())
        })
        .await?;

    match removed {
        Some(()) => {
            tracing::debug!(id, "task deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound),
    }
}

//! Task collection routes.
//!
//! Every mutation is the same cycle: load the whole document, apply one
//! transform from [`crate::model`], save the whole document. The cycle runs
//! under the context's store guard so concurrent requests cannot interleave
//! their read-modify-write and lose updates.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::model::Task;
use crate::storage::StoreError;
use crate::AppContext;

/// Collapse a storage failure into the opaque client-facing 500. The full
/// error chain only ever appears in the server log.
fn storage_failure(operation: &'static str, err: StoreError) -> (StatusCode, Json<Value>) {
    error!(operation, error = %err, "storage operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}

/// GET /todos. Returns the bare task array, not the document wrapper.
pub async fn list_todos(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<Task>>, (StatusCode, Json<Value>)> {
    let _guard = ctx.store_guard.lock().await;
    let doc = ctx.store.load().await.map_err(|e| storage_failure("list", e))?;
    Ok(Json(doc.todos))
}

#[derive(Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub task: Option<String>,
}

/// POST /todos. Rejects a missing or empty `task` with 400 before touching
/// storage; otherwise appends and returns the stored entry with 201.
pub async fn create_todo(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Task>), (StatusCode, Json<Value>)> {
    let text = match body.task.filter(|t| !t.is_empty()) {
        Some(t) => t,
        None => {
            debug!("create rejected, no task text");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Task is required" })),
            ));
        }
    };

    let _guard = ctx.store_guard.lock().await;
    let mut doc = ctx
        .store
        .load()
        .await
        .map_err(|e| storage_failure("create", e))?;
    let created = doc.append(text);
    ctx.store
        .save(&doc)
        .await
        .map_err(|e| storage_failure("create", e))?;
    debug!(id = created.id, "task created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /todos/update-even. Marks every incomplete even-id task complete.
pub async fn update_even_todos(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let _guard = ctx.store_guard.lock().await;
    let mut doc = ctx
        .store
        .load()
        .await
        .map_err(|e| storage_failure("update-even", e))?;
    let changed = doc.complete_even_ids();
    ctx.store
        .save(&doc)
        .await
        .map_err(|e| storage_failure("update-even", e))?;
    debug!(changed, "even-id tasks marked complete");
    Ok(Json(json!({ "message": "Updated status of even ID todos" })))
}

/// DELETE /todos/completed. Removes every completed task.
pub async fn delete_completed_todos(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let _guard = ctx.store_guard.lock().await;
    let mut doc = ctx
        .store
        .load()
        .await
        .map_err(|e| storage_failure("delete-completed", e))?;
    let removed = doc.drop_completed();
    ctx.store
        .save(&doc)
        .await
        .map_err(|e| storage_failure("delete-completed", e))?;
    debug!(removed, "completed tasks deleted");
    Ok(Json(json!({ "message": "Deleted completed todos" })))
}

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use super::parse_process_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ProcessInput, ProcessService};

/// PUT /:id - full update; same body as create
pub async fn process_put(
    State(processes): State<ProcessService>,
    Path(id): Path<String>,
    user: Option<AuthUser>,
    payload: Result<Json<ProcessInput>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_process_id(&id)?;
    let Json(input) = payload?;

    processes
        .update(id, input)
        .await
        .map_err(|e| e.into_api_error("Failed to update process"))?;

    if let Some(user) = user {
        tracing::info!("Process {} updated by user {}", id, user.id);
    }

    Ok(ApiResponse::success(json!({ "message": "Process updated successfully" })))
}

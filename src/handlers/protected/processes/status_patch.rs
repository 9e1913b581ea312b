use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::parse_process_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ProcessService;

#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

/// PATCH /:id/status - `{status: "<name>"}`
///
/// 400 when the status is missing or unknown, 404 when the process is.
pub async fn status_patch(
    State(processes): State<ProcessService>,
    Path(id): Path<String>,
    user: Option<AuthUser>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_process_id(&id)?;
    let Json(request) = payload?;

    processes
        .update_status(id, request.status.as_deref())
        .await
        .map_err(|e| e.into_api_error("Failed to update process status"))?;

    if let Some(user) = user {
        tracing::info!("Process {} status changed by user {}", id, user.id);
    }

    Ok(ApiResponse::success(json!({ "message": "Process status updated successfully" })))
}

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ProcessInput, ProcessService};

/// POST / - create a process
///
/// ```json
/// {
///   "sd_number": "string", "opening_date": "YYYY-MM-DD", "simplified_object": "string",
///   "modality": "string", "responsible": "name", "participating_secretaries": ["name"],
///   "contract_supervisors": ["name"], "observations": "string", "status": "name"
/// }
/// ```
///
/// 201 `{message, id}`; 400 when `simplified_object` or `opening_date` is missing.
pub async fn process_post(
    State(processes): State<ProcessService>,
    user: Option<AuthUser>,
    payload: Result<Json<ProcessInput>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(input) = payload?;

    let id = processes
        .create(input)
        .await
        .map_err(|e| e.into_api_error("Failed to create process"))?;

    if let Some(user) = user {
        tracing::info!("Process {} created by user {} ({})", id, user.id, user.role);
    }

    Ok(ApiResponse::created(json!({
        "message": "Process created successfully",
        "id": id
    })))
}

use axum::extract::State;

use crate::database::models::{Responsible, Secretary, Status};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ListService;

/// GET /status
pub async fn status_list(State(lists): State<ListService>) -> ApiResult<Vec<Status>> {
    let rows = lists
        .statuses()
        .await
        .map_err(|e| e.into_api_error("Failed to fetch statuses"))?;
    Ok(ApiResponse::success(rows))
}

/// GET /responsibles
pub async fn responsible_list(State(lists): State<ListService>) -> ApiResult<Vec<Responsible>> {
    let rows = lists
        .responsibles()
        .await
        .map_err(|e| e.into_api_error("Failed to fetch responsibles"))?;
    Ok(ApiResponse::success(rows))
}

/// GET /secretaries
pub async fn secretary_list(State(lists): State<ListService>) -> ApiResult<Vec<Secretary>> {
    let rows = lists
        .secretaries()
        .await
        .map_err(|e| e.into_api_error("Failed to fetch secretaries"))?;
    Ok(ApiResponse::success(rows))
}

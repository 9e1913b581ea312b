use axum::extract::{Path, Query, State};
use serde::Deserialize;

use super::parse_process_id;
use crate::database::models::Process;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ProcessFilter, ProcessService};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub responsible: Option<String>,
}

/// GET / - list processes, newest opening date first
pub async fn process_list(
    State(processes): State<ProcessService>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Process>> {
    let filter = ProcessFilter::parse(query.status.as_deref(), query.responsible.as_deref())
        .map_err(|e| e.into_api_error("Failed to fetch processes"))?;

    let rows = processes
        .list(filter)
        .await
        .map_err(|e| e.into_api_error("Failed to fetch processes"))?;

    Ok(ApiResponse::success(rows))
}

/// GET /:id - show one process
pub async fn process_get(
    State(processes): State<ProcessService>,
    Path(id): Path<String>,
) -> ApiResult<Process> {
    let id = parse_process_id(&id)?;

    let process = processes
        .get(id)
        .await
        .map_err(|e| e.into_api_error("Failed to fetch process"))?;

    Ok(ApiResponse::success(process))
}

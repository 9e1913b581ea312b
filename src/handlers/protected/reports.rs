use axum::extract::State;

use crate::database::models::{StatusCount, Summary};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ReportService;

/// GET /status - process count per status, in workflow order
pub async fn status_report(State(reports): State<ReportService>) -> ApiResult<Vec<StatusCount>> {
    let rows = reports
        .status_breakdown()
        .await
        .map_err(|e| e.into_api_error("Failed to generate status report"))?;
    Ok(ApiResponse::success(rows))
}

/// GET /summary
pub async fn summary_report(State(reports): State<ReportService>) -> ApiResult<Summary> {
    let summary = reports
        .summary()
        .await
        .map_err(|e| e.into_api_error("Failed to generate process summary"))?;
    Ok(ApiResponse::success(summary))
}

use axum::{
    extract::State,
    response::Json,
    routing::{get, MethodRouter},
};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::database::DatabaseManager;
use crate::error::ApiError;

/// GET /health - liveness, never touches the database
pub fn health<S>(service_name: &'static str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(move || async move {
        Json(json!({
            "status": "OK",
            "message": format!("{} is running", service_name)
        }))
    })
}

/// GET /ready - readiness, pings the database (503 when unreachable)
pub async fn ready(State(pool): State<PgPool>) -> Result<Json<Value>, ApiError> {
    DatabaseManager::health_check(&pool).await?;

    Ok(Json(json!({
        "status": "OK",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}

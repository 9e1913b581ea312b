use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, RegisterInput};

/// POST /register - Register new user account
///
/// ```json
/// { "name": "string", "email": "string", "password": "string", "role": "string (optional)" }
/// ```
///
/// 201 `{message, user: {id, name, email, role}}`; 400 on missing fields or a
/// duplicate email.
pub async fn register_post(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(input) = payload?;

    let user = auth
        .register(input)
        .await
        .map_err(|e| e.into_api_error("Failed to register user"))?;

    Ok(ApiResponse::created(json!({
        "message": "User registered successfully",
        "user": user
    })))
}

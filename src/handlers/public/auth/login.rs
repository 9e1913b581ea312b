use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, LoginInput};

/// POST /login - Authenticate user and receive an access token
///
/// ```json
/// { "email": "string", "password": "string" }
/// ```
///
/// 200 `{message, token, user}`; 400 missing fields; 401 invalid credentials.
pub async fn login_post(
    State(auth): State<AuthService>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(input) = payload?;

    let (token, user) = auth
        .login(input)
        .await
        .map_err(|e| e.into_api_error("Failed to log in"))?;

    Ok(ApiResponse::success(json!({
        "message": "Login successful",
        "token": token,
        "user": user
    })))
}

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{AuthService, ResetPasswordInput};

const RECOVERY_MESSAGE: &str =
    "If the email is registered, you will receive instructions to reset your password";

#[derive(Debug, Default, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

/// POST /forgot-password
///
/// Same message whether or not the email exists. For a known email the reset
/// token is included as `resetToken`; there is no out-of-band delivery.
pub async fn forgot_password_post(
    State(auth): State<AuthService>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(request) = payload?;

    let token = auth
        .forgot_password(request.email.as_deref())
        .await
        .map_err(|e| e.into_api_error("Failed to process password recovery request"))?;

    let body = match token {
        Some(token) => json!({ "message": RECOVERY_MESSAGE, "resetToken": token }),
        None => json!({ "message": RECOVERY_MESSAGE }),
    };
    Ok(ApiResponse::success(body))
}

/// POST /reset-password - `{token, newPassword}`
pub async fn reset_password_post(
    State(auth): State<AuthService>,
    payload: Result<Json<ResetPasswordInput>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(input) = payload?;

    auth.reset_password(input)
        .await
        .map_err(|e| e.into_api_error("Failed to reset password"))?;

    Ok(ApiResponse::success(json!({ "message": "Password reset successfully" })))
}

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::auth::{Claims, JwtKeys};
use crate::error::ApiError;

/// Identity headers attached to authenticated requests
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");
pub const USER_ROLE_HEADER: HeaderName = HeaderName::from_static("x-user-role");

/// Authenticated user context extracted from the access token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.id,
            role: claims.role,
        }
    }
}

impl AuthUser {
    /// Identity forwarded by the gateway as `x-user-id` / `x-user-role`
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let id = headers
            .get(USER_ID_HEADER)?
            .to_str()
            .ok()?
            .parse::<i32>()
            .ok()?;
        let role = headers.get(USER_ROLE_HEADER)?.to_str().ok()?.to_string();
        Some(Self { id, role })
    }
}

/// Request extension set by the token gate in this process, else the
/// identity headers set by the gateway in front of it.
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        AuthUser::from_headers(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Bearer-token gate: 401 when no token is presented, 403 when it does not verify.
///
/// On success the identity is stored in request extensions and in the
/// `x-user-id` / `x-user-role` headers (client-supplied copies are dropped).
pub async fn jwt_auth_middleware(
    State(keys): State<JwtKeys>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let headers = request.headers_mut();
    headers.remove(USER_ID_HEADER);
    headers.remove(USER_ROLE_HEADER);

    let token = extract_bearer_token(request.headers()).map_err(|msg| {
        tracing::debug!("Rejected request without token: {}", msg);
        ApiError::unauthorized("Authentication required")
    })?;

    let claims = keys.verify_access(&token).map_err(|e| {
        tracing::warn!("Rejected bearer token: {}", e);
        ApiError::forbidden("Invalid or expired token")
    })?;

    let auth_user = AuthUser::from(claims);
    let headers = request.headers_mut();
    headers.insert(USER_ID_HEADER, HeaderValue::from(auth_user.id));
    if let Ok(role) = HeaderValue::from_str(&auth_user.role) {
        headers.insert(USER_ROLE_HEADER, role);
    }
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, &'static str> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err("Empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}

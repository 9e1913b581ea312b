#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use process_control_api::auth::JwtKeys;
use process_control_api::config::AppConfig;
use process_control_api::database::DatabaseManager;
use process_control_api::server::{self, ServiceRole};

/// Development preset; DATABASE_URL is not read so tests never pick up a real store
pub fn test_config() -> AppConfig {
    AppConfig::development()
}

/// Pool that never connects unless a request reaches the store
pub fn lazy_pool() -> Result<PgPool> {
    Ok(DatabaseManager::connect_lazy(&test_config().database)?)
}

/// Router for a backend role over a pool that is never touched
pub fn app(role: ServiceRole) -> Result<Router> {
    server::build_app(role, &test_config(), lazy_pool()?)
}

/// Router for a backend role over a real pool
pub fn app_with_pool(role: ServiceRole, pool: PgPool) -> Result<Router> {
    server::build_app(role, &test_config(), pool)
}

pub fn keys() -> Result<JwtKeys> {
    Ok(JwtKeys::from_config(&test_config().security)?)
}

pub fn access_token(id: i32, role: &str) -> Result<String> {
    Ok(keys()?.issue_access(id, role)?)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, bearer(token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}

/// Drive one request through the router and decode the JSON body (Null when empty)
pub async fn send(app: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await.context("router failed")?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).context("response body is not JSON")?
    };
    Ok((status, body))
}

/// Common error body: `{error: true, message, status}` mirroring the HTTP status
pub fn assert_error_body(status: StatusCode, body: &Value, message: &str) {
    assert_eq!(body["error"], true, "error flag missing: {}", body);
    assert_eq!(body["message"], message, "unexpected message: {}", body);
    assert_eq!(body["status"], status.as_u16(), "status not mirrored: {}", body);
}

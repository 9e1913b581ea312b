mod common;

use std::collections::HashMap;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, Request},
    http::{Method, StatusCode},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};

use process_control_api::config::AppConfig;
use process_control_api::server;

/// Upstream that echoes what it received
async fn spawn_echo_upstream() -> Result<String> {
    async fn echo(Query(query): Query<HashMap<String, String>>, request: Request) -> Json<Value> {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "method": request.method().as_str(),
            "path": request.uri().path(),
            "query": query,
            "user_id": header("x-user-id"),
            "user_role": header("x-user-role"),
        }))
    }

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = Router::new()
        .route("/", any(echo))
        .route("/*rest", any(echo));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

async fn gateway_config() -> Result<AppConfig> {
    let upstream = spawn_echo_upstream().await?;
    let closed = portpicker::pick_unused_port().context("failed to pick free port")?;

    let mut config = common::test_config();
    config.services.auth_url = upstream.clone();
    config.services.processes_url = upstream.clone();
    config.services.reports_url = upstream;
    config.services.lists_url = format!("http://127.0.0.1:{}", closed);
    Ok(config)
}

#[tokio::test]
async fn protected_prefix_without_token_is_401() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;

    let (status, body) = common::send(
        gateway,
        common::json_request(Method::GET, "/api/processes", None, None),
    )
    .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    common::assert_error_body(status, &body, "Authentication required");
    Ok(())
}

#[tokio::test]
async fn protected_prefix_with_bad_token_is_403() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;

    let (status, body) = common::send(
        gateway,
        common::json_request(Method::GET, "/api/reports/status", Some("not-a-jwt"), None),
    )
    .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    common::assert_error_body(status, &body, "Invalid or expired token");
    Ok(())
}

#[tokio::test]
async fn reset_token_is_not_an_access_token() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;
    let reset = common::keys()?.issue_reset(7)?;

    let (status, _) = common::send(
        gateway,
        common::json_request(Method::GET, "/api/processes/1", Some(&reset), None),
    )
    .await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn forwards_with_prefix_stripped_and_identity_attached() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;
    let token = common::access_token(42, "admin")?;

    let (status, body) = common::send(
        gateway,
        common::json_request(
            Method::PATCH,
            "/api/processes/9/status?trace=1",
            Some(&token),
            Some(json!({ "status": "Concluído" })),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["method"], "PATCH");
    assert_eq!(body["path"], "/9/status");
    assert_eq!(body["query"]["trace"], "1");
    assert_eq!(body["user_id"], "42");
    assert_eq!(body["user_role"], "admin");
    Ok(())
}

#[tokio::test]
async fn client_supplied_identity_headers_are_replaced() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;
    let token = common::access_token(5, "user")?;

    let mut request = common::json_request(Method::GET, "/api/reports/summary", Some(&token), None);
    request
        .headers_mut()
        .insert("x-user-role", "admin".parse()?);

    let (status, body) = common::send(gateway, request).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "/summary");
    assert_eq!(body["user_id"], "5");
    assert_eq!(body["user_role"], "user");
    Ok(())
}

#[tokio::test]
async fn auth_prefix_needs_no_token() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;

    let (status, body) = common::send(
        gateway,
        common::json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "a@b.c", "password": "x" })),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "/login");
    assert_eq!(body["user_id"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_is_502() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;
    let token = common::access_token(1, "user")?;

    let (status, body) = common::send(
        gateway,
        common::json_request(Method::GET, "/api/lists/status", Some(&token), None),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], true);
    assert_eq!(body["status"], 502);
    Ok(())
}

#[tokio::test]
async fn oversized_body_is_413() -> Result<()> {
    let mut config = gateway_config().await?;
    config.services.max_body_bytes = 16;
    let gateway = server::build_gateway(&config)?;
    let token = common::access_token(1, "user")?;

    let (status, body) = common::send(
        gateway,
        common::json_request(
            Method::POST,
            "/api/processes",
            Some(&token),
            Some(json!({ "simplified_object": "x".repeat(64), "opening_date": "2025-01-10" })),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    common::assert_error_body(status, &body, "Request body too large");
    Ok(())
}

#[tokio::test]
async fn gateway_answers_its_own_health() -> Result<()> {
    let gateway = server::build_gateway(&gateway_config().await?)?;

    let (status, body) = common::send(
        gateway,
        common::json_request(Method::GET, "/health", None, None),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API Gateway is running");
    Ok(())
}

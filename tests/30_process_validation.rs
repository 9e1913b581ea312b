// Requests rejected before any store access; the pool here never connects.
mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use process_control_api::server::ServiceRole;

#[tokio::test]
async fn create_without_required_fields_is_400() -> Result<()> {
    let cases = [
        json!({ "opening_date": "2025-01-10" }),
        json!({ "simplified_object": "Aquisição de materiais" }),
        json!({ "simplified_object": "", "opening_date": "2025-01-10" }),
    ];

    for body in cases {
        let (status, response) = common::send(
            common::app(ServiceRole::Processes)?,
            common::json_request(Method::POST, "/", None, Some(body.clone())),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["error"], true);
        assert_eq!(response["status"], 400);
    }
    Ok(())
}

#[tokio::test]
async fn create_with_unparsable_date_is_400() -> Result<()> {
    let (status, body) = common::send(
        common::app(ServiceRole::Processes)?,
        common::json_request(
            Method::POST,
            "/",
            None,
            Some(json!({ "simplified_object": "Obra", "opening_date": "10/01/2025" })),
        ),
    )
    .await?;
    common::assert_error_body(status, &body, "Invalid opening date: 10/01/2025");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_json_uses_the_common_error_body() -> Result<()> {
    let mut request = common::json_request(Method::POST, "/", None, None);
    *request.body_mut() = axum::body::Body::from("{not json");
    request
        .headers_mut()
        .insert("content-type", "application/json".parse()?);

    let (status, body) = common::send(common::app(ServiceRole::Processes)?, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert_eq!(body["status"], 400);
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_404() -> Result<()> {
    for (method, uri, body) in [
        (Method::GET, "/abc", None),
        (Method::PUT, "/abc", Some(json!({ "simplified_object": "x" }))),
        (Method::PATCH, "/abc/status", Some(json!({ "status": "Concluído" }))),
    ] {
        let (status, response) = common::send(
            common::app(ServiceRole::Processes)?,
            common::json_request(method.clone(), uri, None, body),
        )
        .await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        common::assert_error_body(status, &response, "Process not found");
    }
    Ok(())
}

#[tokio::test]
async fn non_numeric_filter_is_400() -> Result<()> {
    let (status, body) = common::send(
        common::app(ServiceRole::Processes)?,
        common::json_request(Method::GET, "/?status=ativo", None, None),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    common::assert_error_body(status, &body, "Invalid status filter: ativo");
    Ok(())
}

#[tokio::test]
async fn status_patch_requires_status() -> Result<()> {
    for body in [json!({}), json!({ "status": "" })] {
        let (status, response) = common::send(
            common::app(ServiceRole::Processes)?,
            common::json_request(Method::PATCH, "/1/status", None, Some(body)),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        common::assert_error_body(status, &response, "Status is required");
    }
    Ok(())
}

#[tokio::test]
async fn combined_router_guards_process_routes() -> Result<()> {
    let (status, body) = common::send(
        common::app(ServiceRole::All)?,
        common::json_request(Method::GET, "/api/processes/1", None, None),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    common::assert_error_body(status, &body, "Authentication required");

    let (status, _) = common::send(
        common::app(ServiceRole::All)?,
        common::json_request(Method::GET, "/api/lists/status", Some("garbage"), None),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Valid token reaches the handler, which rejects before the store
    let token = common::access_token(1, "user")?;
    let (status, body) = common::send(
        common::app(ServiceRole::All)?,
        common::json_request(
            Method::POST,
            "/api/processes",
            Some(&token),
            Some(json!({ "simplified_object": "Obra" })),
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    Ok(())
}

// gateway/mod.rs - Token gate and reverse proxy in front of the backends
//
// /api/auth/*       -> auth service, no token required
// /api/processes/*  -> process service   (bearer token)
// /api/reports/*    -> report service    (bearer token)
// /api/lists/*      -> list service      (bearer token)
//
// The /api/<prefix> part is stripped before forwarding; the verified identity
// travels upstream as x-user-id / x-user-role.
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    handler::Handler,
    http::{header, HeaderMap, HeaderName, Uri},
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::health::health;
use crate::middleware::jwt_auth_middleware;

/// Headers that describe one hop and must not be forwarded
const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::HOST,
];

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid upstream URL for {name}: {source}")]
    InvalidUpstream {
        name: &'static str,
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Keys(#[from] JwtError),
}

/// One upstream service
#[derive(Clone, Debug)]
pub struct ProxyTarget {
    name: &'static str,
    base: Url,
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl ProxyTarget {
    pub fn new(
        name: &'static str,
        base: &str,
        client: reqwest::Client,
        max_body_bytes: usize,
    ) -> Result<Self, GatewayError> {
        let base = Url::parse(base).map_err(|source| GatewayError::InvalidUpstream { name, source })?;
        Ok(Self {
            name,
            base,
            client,
            max_body_bytes,
        })
    }

    /// Upstream URL for a request whose /api/<prefix> has already been stripped
    pub fn upstream_url(&self, uri: &Uri) -> Result<Url, url::ParseError> {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let base = self.base.as_str().trim_end_matches('/');

        if path_and_query.starts_with('/') {
            Url::parse(&format!("{}{}", base, path_and_query))
        } else {
            Url::parse(&format!("{}/{}", base, path_and_query))
        }
    }
}

/// Build the gateway router from the configured upstreams
pub fn router(config: &AppConfig) -> Result<Router, GatewayError> {
    let keys = JwtKeys::from_config(&config.security)?;
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;

    let services = &config.services;
    let limit = services.max_body_bytes;
    let auth = ProxyTarget::new("auth", &services.auth_url, client.clone(), limit)?;
    let processes = ProxyTarget::new("processes", &services.processes_url, client.clone(), limit)?;
    let reports = ProxyTarget::new("reports", &services.reports_url, client.clone(), limit)?;
    let lists = ProxyTarget::new("lists", &services.lists_url, client, limit)?;

    Ok(routes(keys, auth, processes, reports, lists))
}

/// Gateway routes over explicit targets
pub fn routes(
    keys: JwtKeys,
    auth: ProxyTarget,
    processes: ProxyTarget,
    reports: ProxyTarget,
    lists: ProxyTarget,
) -> Router {
    let protected = Router::new()
        .nest_service("/api/processes", forward.with_state(processes))
        .nest_service("/api/reports", forward.with_state(reports))
        .nest_service("/api/lists", forward.with_state(lists))
        .route_layer(middleware::from_fn_with_state(keys, jwt_auth_middleware));

    Router::new()
        .nest_service("/api/auth", forward.with_state(auth))
        .merge(protected)
        .route("/health", health("API Gateway"))
}

/// Relay one request and hand back the upstream response verbatim
async fn forward(State(target): State<ProxyTarget>, request: Request) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();

    let url = target.upstream_url(&parts.uri).map_err(|e| {
        tracing::error!("Cannot build {} upstream URL for {}: {}", target.name, parts.uri, e);
        ApiError::bad_gateway("Service unavailable")
    })?;

    let body = to_bytes(body, target.max_body_bytes)
        .await
        .map_err(|_| ApiError::payload_too_large("Request body too large"))?;

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);

    tracing::debug!("{} {} -> {}", parts.method, parts.uri, url);

    let upstream = target
        .client
        .request(parts.method, url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            tracing::error!("{} service unreachable: {}", target.name, e);
            ApiError::bad_gateway(format!("{} service unavailable", target.name))
        })?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);

    let bytes = upstream.bytes().await.map_err(|e| {
        tracing::error!("{} service response failed: {}", target.name, e);
        ApiError::bad_gateway(format!("{} service unavailable", target.name))
    })?;

    Ok((status, headers, Body::from(bytes)).into_response())
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(base: &str) -> ProxyTarget {
        ProxyTarget::new("processes", base, reqwest::Client::new(), 1024).unwrap()
    }

    #[test]
    fn rewrites_path_and_keeps_query() {
        let t = target("http://localhost:3002");
        let uri: Uri = "/7/status".parse().unwrap();
        assert_eq!(t.upstream_url(&uri).unwrap().as_str(), "http://localhost:3002/7/status");

        let uri: Uri = "/?status=2&responsible=1".parse().unwrap();
        assert_eq!(
            t.upstream_url(&uri).unwrap().as_str(),
            "http://localhost:3002/?status=2&responsible=1"
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let t = target("http://processes:3002/");
        let uri: Uri = "/12".parse().unwrap();
        assert_eq!(t.upstream_url(&uri).unwrap().as_str(), "http://processes:3002/12");
    }

    #[test]
    fn rejects_bad_upstream() {
        let err = ProxyTarget::new("lists", "not a url", reqwest::Client::new(), 1).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUpstream { name: "lists", .. }));
    }

    #[test]
    fn strips_connection_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, "keep-alive".parse().unwrap());
        headers.insert(header::HOST, "gateway:3000".parse().unwrap());
        headers.insert(header::AUTHORIZATION, "Bearer t".parse().unwrap());
        strip_hop_by_hop(&mut headers);
        assert!(headers.get(header::CONNECTION).is_none());
        assert!(headers.get(header::HOST).is_none());
        assert!(headers.get(header::AUTHORIZATION).is_some());
    }
}

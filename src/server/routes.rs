// server/routes.rs - Routers for each backend role
//
// Resource routers are mounted at the root of their own service; the gateway
// strips /api/<prefix> before forwarding. `all_routes` mounts the same routers
// under the gateway prefixes in one process.
use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handlers::health::{health, ready};
use crate::handlers::protected::{lists, processes, reports};
use crate::handlers::public::auth;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register_post))
        .route("/login", post(auth::login_post))
        .route("/forgot-password", post(auth::forgot_password_post))
        .route("/reset-password", post(auth::reset_password_post))
}

pub fn process_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(processes::process_list).post(processes::process_post),
        )
        .route(
            "/:id",
            get(processes::process_get).put(processes::process_put),
        )
        .route("/:id/status", patch(processes::status_patch))
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(reports::status_report))
        .route("/summary", get(reports::summary_report))
}

pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(lists::status_list))
        .route("/responsibles", get(lists::responsible_list))
        .route("/secretaries", get(lists::secretary_list))
}

/// Standalone service: its resource router at the root plus /health and /ready
pub fn standalone(resource: Router<AppState>, service_name: &'static str, state: AppState) -> Router {
    resource
        .route("/health", health(service_name))
        .route("/ready", get(ready))
        .with_state(state)
}

/// Every backend behind the gateway prefixes, with the gateway's token policy
pub fn all_routes(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/processes", process_routes())
        .nest("/api/reports", report_routes())
        .nest("/api/lists", list_routes())
        .route_layer(middleware::from_fn_with_state(
            state.keys.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes())
        .merge(protected)
        .route("/health", health("Process control API"))
        .route("/ready", get(ready))
        .with_state(state)
}

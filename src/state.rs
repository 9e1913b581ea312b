use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::{JwtError, JwtKeys};
use crate::config::AppConfig;
use crate::services::{AuthService, ListService, ProcessService, ReportService};

/// Per-process handler state, built once at startup around the shared pool.
/// Handlers extract only the service they need via `FromRef`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub pool: PgPool,
    pub keys: JwtKeys,
    pub auth: AuthService,
    pub processes: ProcessService,
    pub reports: ReportService,
    pub lists: ListService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &AppConfig) -> Result<Self, JwtError> {
        let keys = JwtKeys::from_config(&config.security)?;
        Ok(Self {
            auth: AuthService::new(pool.clone(), keys.clone()),
            processes: ProcessService::new(pool.clone()),
            reports: ReportService::new(pool.clone()),
            lists: ListService::new(pool.clone()),
            keys,
            pool,
        })
    }
}

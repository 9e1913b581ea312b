pub mod auth_service;
pub mod list_service;
pub mod process_service;
pub mod report_service;

pub use auth_service::{AuthService, LoginInput, RegisterInput, ResetPasswordInput};
pub use list_service::ListService;
pub use process_service::{ProcessFilter, ProcessInput, ProcessService};
pub use report_service::ReportService;

use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use crate::auth::{JwtError, PasswordError};
use crate::error::ApiError;

/// Failures of a service operation
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    /// Client errors keep their message; everything else is logged and
    /// reported as `context` without internals.
    pub fn into_api_error(self, context: &str) -> ApiError {
        match self {
            ServiceError::Validation(msg) => ApiError::validation_error(msg),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Unauthorized(msg) => ApiError::unauthorized(msg),
            other => {
                tracing::error!("{}: {}", context, other);
                ApiError::internal_server_error(context)
            }
        }
    }
}

/// Start a read-only transaction that sees one snapshot for all its queries
pub(crate) async fn begin_snapshot(
    pool: &PgPool,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}

/// Explicit rollback of a failed write; a rollback failure is only logged
pub(crate) async fn rollback(tx: Transaction<'static, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::error!("Transaction rollback failed: {}", e);
    }
}

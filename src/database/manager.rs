use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the pool lifecycle
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Opens, checks and closes the shared connection pool.
///
/// The pool is created once at startup and handed to each service by value
/// (`PgPool` is a cheap handle), never looked up through a global.
pub struct DatabaseManager;

impl DatabaseManager {
    fn options(config: &DatabaseConfig) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
    }

    /// Open the pool and verify one connection can be acquired
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        Self::check_url(&config.url)?;
        let pool = Self::options(config)
            .connect(&config.url)
            .await
            .map_err(DatabaseError::Connection)?;
        info!("Database pool opened (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Build the pool without connecting; connections are opened on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        Self::check_url(&config.url)?;
        Self::options(config)
            .connect_lazy(&config.url)
            .map_err(DatabaseError::Connection)
    }

    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(pool)
            .await
            .map_err(DatabaseError::Connection)?;
        Ok(())
    }

    pub async fn close(pool: PgPool) {
        pool.close().await;
        info!("Database pool closed");
    }

    fn check_url(database_url: &str) -> Result<(), DatabaseError> {
        let url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => Ok(()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }
}

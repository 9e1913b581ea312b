use crate::cli::utils::{open_pool, output_success};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_pool(config).await?;
    let result = DatabaseManager::migrate(&pool).await;
    DatabaseManager::close(pool).await;
    result?;

    output_success(&output_format, "Migrations applied", None)
}

use clap::Subcommand;

use crate::cli::utils::{open_pool, output_rows};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::services::ListService;

#[derive(Subcommand)]
pub enum ListCommands {
    #[command(about = "Workflow statuses in order")]
    Status,

    #[command(about = "Responsibles by name")]
    Responsibles,

    #[command(about = "Secretaries by name")]
    Secretaries,
}

pub async fn handle(
    cmd: ListCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let pool = open_pool(config).await?;
    let lists = ListService::new(pool.clone());

    let result = print_list(cmd, &lists, &output_format).await;

    DatabaseManager::close(pool).await;
    result
}

async fn print_list(
    cmd: ListCommands,
    lists: &ListService,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ListCommands::Status => {
            let rows = lists.statuses().await?;
            output_rows(output_format, ("name", "order"), &rows, |s| {
                (s.name.clone(), s.order_num.to_string())
            })
        }
        ListCommands::Responsibles => {
            let rows = lists.responsibles().await?;
            output_rows(output_format, ("name", "id"), &rows, |r| (r.name.clone(), r.id.to_string()))
        }
        ListCommands::Secretaries => {
            let rows = lists.secretaries().await?;
            output_rows(output_format, ("name", "id"), &rows, |s| (s.name.clone(), s.id.to_string()))
        }
    }
}

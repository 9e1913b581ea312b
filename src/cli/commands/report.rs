use clap::Subcommand;

use crate::cli::utils::{open_pool, output_rows};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::services::ReportService;

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "Process count per status, in workflow order")]
    Status,

    #[command(about = "Totals by responsible, modality, month and secretary")]
    Summary,
}

pub async fn handle(
    cmd: ReportCommands,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let pool = open_pool(config).await?;
    let reports = ReportService::new(pool.clone());

    let result = match cmd {
        ReportCommands::Status => print_status(&reports, &output_format).await,
        ReportCommands::Summary => print_summary(&reports, &output_format).await,
    };

    DatabaseManager::close(pool).await;
    result
}

async fn print_status(reports: &ReportService, output_format: &OutputFormat) -> anyhow::Result<()> {
    let rows = reports.status_breakdown().await?;
    output_rows(output_format, ("status", "total"), &rows, |r| {
        (r.status.clone(), r.total.to_string())
    })
}

async fn print_summary(reports: &ReportService, output_format: &OutputFormat) -> anyhow::Result<()> {
    let summary = reports.summary().await?;

    if let OutputFormat::Json = output_format {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Total processes: {}\n", summary.total);
    output_rows(output_format, ("responsible", "total"), &summary.by_responsible, |r| {
        (r.responsible.clone(), r.total.to_string())
    })?;
    println!();
    output_rows(output_format, ("modality", "total"), &summary.by_modality, |r| {
        (r.modality.clone(), r.total.to_string())
    })?;
    println!();
    output_rows(output_format, ("month", "total"), &summary.by_month, |r| {
        (r.month.clone(), r.total.to_string())
    })?;
    println!();
    output_rows(output_format, ("secretary", "total"), &summary.by_secretary, |r| {
        (r.secretary.clone(), r.total.to_string())
    })
}

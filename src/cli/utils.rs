use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Open the pool for a one-shot command, refusing development fallbacks in production
pub async fn open_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    config.validate()?;
    Ok(DatabaseManager::connect(&config.database).await?)
}

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print rows as JSON, or as a two-column table in text mode
pub fn output_rows<T, F>(
    output_format: &OutputFormat,
    headings: (&str, &str),
    rows: &[T],
    columns: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> (String, String),
{
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No rows");
                return Ok(());
            }
            println!("{:<40} {}", headings.0.to_uppercase(), headings.1.to_uppercase());
            println!("{}", "-".repeat(50));
            for row in rows {
                let (left, right) = columns(row);
                println!("{:<40} {}", left, right);
            }
        }
    }
    Ok(())
}

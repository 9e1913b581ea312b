use serde_json::json;

use crate::auth::JwtKeys;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

/// Prints a signed access token; the token itself goes to stdout alone in text mode
pub fn handle(
    id: i32,
    role: &str,
    config: &AppConfig,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    config.validate()?;
    let keys = JwtKeys::from_config(&config.security)?;
    let token = keys.issue_access(id, role)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "id": id, "role": role })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

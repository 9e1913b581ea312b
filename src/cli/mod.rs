pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::server::ServiceRole;

#[derive(Parser)]
#[command(name = "pcctl")]
#[command(about = "pcctl - Operator CLI for the process control services")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run one service role in the foreground")]
    Serve {
        #[arg(value_enum, help = "Service role to run")]
        role: ServiceRole,
        #[arg(long, help = "Listen port (defaults to the role's port)")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations")]
    Migrate,

    #[command(about = "Process reports")]
    Report {
        #[command(subcommand)]
        cmd: commands::report::ReportCommands,
    },

    #[command(about = "Reference lists")]
    Lists {
        #[command(subcommand)]
        cmd: commands::lists::ListCommands,
    },

    #[command(about = "Mint a development access token with the configured secret")]
    Token {
        #[arg(long, help = "User id to embed")]
        id: i32,
        #[arg(long, default_value = "user", help = "Role to embed")]
        role: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config();

    match cli.command {
        Commands::Serve { role, port } => crate::server::run(role, config, port).await,
        Commands::Migrate => commands::migrate::handle(config, output_format).await,
        Commands::Report { cmd } => commands::report::handle(cmd, config, output_format).await,
        Commands::Lists { cmd } => commands::lists::handle(cmd, config, output_format).await,
        Commands::Token { id, role } => commands::token::handle(id, &role, config, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_serve_with_port() {
        let cli = Cli::try_parse_from(["pcctl", "serve", "processes", "--port", "4002"]).unwrap();
        match cli.command {
            Commands::Serve { role, port } => {
                assert_eq!(role, ServiceRole::Processes);
                assert_eq!(port, Some(4002));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["pcctl", "report", "summary", "--json"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
    }
}

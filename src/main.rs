use anyhow::Context;
use process_control_api::config;
use process_control_api::server::{self, ServiceRole};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    server::init_tracing();

    let config = config::config();

    // SERVICE picks the role; one binary runs every service
    let role: ServiceRole = std::env::var("SERVICE")
        .unwrap_or_else(|_| "all".to_string())
        .parse()
        .map_err(anyhow::Error::msg)?;

    let port = std::env::var("PORT")
        .ok()
        .map(|s| s.parse::<u16>())
        .transpose()
        .context("PORT must be a port number")?;

    server::run(role, config, port).await
}

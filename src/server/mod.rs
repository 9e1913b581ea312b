// server/mod.rs - Service roles, router assembly and the serve loop
pub mod layers;
pub mod routes;

use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use axum::Router;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::gateway;
use crate::state::AppState;

/// Which part of the system a process serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ServiceRole {
    Gateway,
    Auth,
    Processes,
    Reports,
    Lists,
    /// Every backend plus the token gate in one process
    All,
}

impl ServiceRole {
    pub fn default_port(self) -> u16 {
        match self {
            ServiceRole::Gateway | ServiceRole::All => 3000,
            ServiceRole::Auth => 3001,
            ServiceRole::Processes => 3002,
            ServiceRole::Reports => 3003,
            ServiceRole::Lists => 3004,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceRole::Gateway => "gateway",
            ServiceRole::Auth => "auth",
            ServiceRole::Processes => "processes",
            ServiceRole::Reports => "reports",
            ServiceRole::Lists => "lists",
            ServiceRole::All => "all",
        }
    }

    /// The gateway forwards and never opens the database
    pub fn needs_database(self) -> bool {
        self != ServiceRole::Gateway
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gateway" => Ok(ServiceRole::Gateway),
            "auth" => Ok(ServiceRole::Auth),
            "processes" | "process" => Ok(ServiceRole::Processes),
            "reports" | "report" => Ok(ServiceRole::Reports),
            "lists" | "list" => Ok(ServiceRole::Lists),
            "all" => Ok(ServiceRole::All),
            other => Err(format!("unknown service role '{}'", other)),
        }
    }
}

/// Router for a backend role over an already opened pool
pub fn build_app(role: ServiceRole, config: &AppConfig, pool: PgPool) -> anyhow::Result<Router> {
    let state = AppState::new(pool, config).context("failed to load JWT keys")?;

    let router = match role {
        ServiceRole::Auth => routes::standalone(routes::auth_routes(), "Auth service", state),
        ServiceRole::Processes => {
            routes::standalone(routes::process_routes(), "Process service", state)
        }
        ServiceRole::Reports => routes::standalone(routes::report_routes(), "Report service", state),
        ServiceRole::Lists => routes::standalone(routes::list_routes(), "List service", state),
        ServiceRole::All => routes::all_routes(state),
        ServiceRole::Gateway => anyhow::bail!("the gateway is built with build_gateway"),
    };

    Ok(layers::apply(router, &config.security))
}

pub fn build_gateway(config: &AppConfig) -> anyhow::Result<Router> {
    let router = gateway::router(config).context("failed to build gateway")?;
    Ok(layers::apply(router, &config.security))
}

/// Serve one role until Ctrl-C, then close the pool
pub async fn run(role: ServiceRole, config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    config.validate()?;

    let (app, pool) = if role.needs_database() {
        let pool = DatabaseManager::connect_lazy(&config.database)?;
        if config.database.run_migrations {
            DatabaseManager::migrate(&pool).await?;
        }
        (build_app(role, config, pool.clone())?, Some(pool))
    } else {
        (build_gateway(config)?, None)
    };

    let port = port.unwrap_or_else(|| role.default_port());
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(
        "{} listening on http://{} ({:?})",
        role, bind_addr, config.environment
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pool) = pool {
        DatabaseManager::close(pool).await;
    }
    info!("{} stopped", role);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// `RUST_LOG` filter, defaulting to info with quiet sqlx statement logs
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

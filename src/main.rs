use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use menu_catalog::config::{AppConfig, Environment};
use menu_catalog::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "menu-catalog", version, about = "Menu catalog API server")]
struct Cli {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "SQLite database file, or :memory: (overrides DATABASE_PATH)")]
    database: Option<String>,

    #[arg(long, help = "Directory served as static assets (overrides STATIC_DIR)")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up PORT, ADMIN_USER, ADMIN_PASS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = apply_cli(menu_catalog::config::config().clone(), cli);
    tracing::info!("Starting menu catalog in {:?} mode", config.environment);

    check_credentials(&config)?;

    // Schema and seed are in place before the listener exists
    let state = AppState::new(config)
        .await
        .context("failed to initialize database")?;

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);
    tracing::info!("Static: {} | Admin: /admin.html (Basic Auth)", state.config.server.static_dir.display());
    tracing::info!("DB file: {}", state.store.path());

    let store = state.store.clone();
    axum::serve(listener, menu_catalog::app(state))
        .with_graceful_shutdown(menu_catalog::shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

fn apply_cli(mut config: AppConfig, cli: Cli) -> AppConfig {
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(database) = cli.database {
        config.database.path = database;
    }
    if let Some(static_dir) = cli.static_dir {
        config.server.static_dir = static_dir;
    }
    config
}

/// Placeholder credentials are tolerated outside production, with a warning.
fn check_credentials(config: &AppConfig) -> anyhow::Result<()> {
    if !config.security.uses_placeholder_credentials() {
        return Ok(());
    }
    if config.environment == Environment::Production {
        bail!("ADMIN_USER or ADMIN_PASS is unset or left at its default; refusing to start in production");
    }
    tracing::warn!("Using placeholder admin credentials; set ADMIN_USER and ADMIN_PASS before deploying");
    Ok(())
}

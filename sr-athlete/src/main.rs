//! sr-athlete - athlete service of the swim results platform
//!
//! Serves athletes, teams and certificates over HTTP and reconciles records
//! imported from meeting feeds.

use anyhow::Result;
use clap::Parser;
use sr_athlete::db::SqliteStore;
use sr_athlete::repository::Repositories;
use sr_athlete::AppState;
use sr_common::config::{Overrides, ServiceConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sr-athlete", version, about = "Swim results athlete service")]
struct Args {
    /// TOML config file
    #[arg(short, long, env = "SR_ATHLETE_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP port
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServiceConfig::resolve(&Overrides {
        config_file: args.config,
        port: args.port,
        bind_address: args.bind,
        database_path: args.database,
        log_level: args.log_level,
    })?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sr_athlete={0},sr_common={0},tower_http={0}", config.log_level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting sr-athlete v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
    );
    info!("Database: {}", config.database_path.display());

    let pool = sr_common::db::init_database(&config.database_path).await?;
    info!("Database connection established");

    let store = Arc::new(SqliteStore::with_timeout(pool, config.storage_timeout));
    let state = AppState::new(Repositories::from_store(store));
    let app = sr_athlete::build_router(state);

    let address = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{}", address);
    info!("Health check: http://{}/actuator", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("sr-athlete stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

//! fincache HTTP server and seeding CLI.
//!
//! `serve` (the default) exposes the read-through cache over HTTP; `seed`
//! loads the provider's traded-symbols list into the reference collection.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fincache::{FmpProvider, ReadThroughCache, SqliteStore};

mod config;
mod error;
mod routes;

use config::ServerConfig;
use routes::AppState;

#[derive(Debug, Parser)]
#[command(name = "fincache")]
#[command(about = "Read-through cache for FMP company fundamentals", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve,
    /// Load the traded-symbols reference list from FMP
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fincache=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    let cache = Arc::new(build_cache(&config)?);
    cache.ping().await.context("Store is not reachable")?;
    info!(database = %config.database_url, "Store opened");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cache, &config).await,
        Command::Seed => {
            let report = cache.seed_reference_items().await?;
            info!(
                fetched = report.fetched,
                upserted = report.upserted,
                "Seeding complete"
            );
            Ok(())
        }
    }
}

fn build_cache(config: &ServerConfig) -> anyhow::Result<ReadThroughCache> {
    let store = SqliteStore::new(&config.database_url)
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let mut provider = FmpProvider::new(config.fmp_api_key.clone());
    if let Some(base_url) = &config.fmp_base_url {
        provider = provider.with_base_url(base_url.clone());
    }

    Ok(ReadThroughCache::new(Arc::new(store), Arc::new(provider)))
}

async fn serve(cache: Arc<ReadThroughCache>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = routes::router(AppState { cache }, &config.cors_origins);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}

mod auth;
mod config;
mod error;
mod handlers;
mod mailer;
mod metrics;
mod server;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use mailer::LogMailer;
use podspace_store_sqlite::SqliteStore;
use server::PodspaceServer;

// ───────────────────────────── CLI Types ──────────────────────────────

#[derive(Parser)]
#[command(name = "podspace-server")]
#[command(about = "Podspace collaboration server")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db); defaults to ~/.podspace/store.db
    #[arg(long, global = true, env = "PODSPACE_DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:8080", env = "PODSPACE_BIND")]
        addr: String,
    },
}

// ─────────────────────────────── Serve ────────────────────────────────

async fn cmd_serve(database_url: Option<String>, addr: &str) -> anyhow::Result<()> {
    let store = match database_url {
        Some(url) => SqliteStore::open(&url)
            .await
            .with_context(|| format!("failed to open store at {url}"))?,
        None => SqliteStore::open_default()
            .await
            .context("failed to open default store")?,
    };

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let metrics_handle = metrics::init_metrics();
    let server = Arc::new(PodspaceServer::new(
        Arc::new(store),
        config,
        Arc::new(LogMailer),
    ));

    let router = handlers::router(server, Some(metrics_handle));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "podspace-server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            tracing::info!("received SIGINT, shutting down");
        }
    }
}

// ─────────────────────────────── Main ─────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { addr } => cmd_serve(cli.database_url, &addr).await?,
    }

    Ok(())
}

mod bootstrap;
mod health;
mod webhook;

use std::time::Duration;

use anyhow::{Context, Result};
use haggle_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use haggle_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    let bind = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;

    let router = webhook::router(webhook::AppState {
        runtime: app.runtime.clone(),
        sender: app.sender.clone(),
    })
    .merge(health::router(app.catalog.clone()));

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind = %bind,
        product_count = app.catalog.len(),
        "haggle-server listening"
    );

    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown(grace))
        .await
        .context("server terminated unexpectedly")?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "haggle-server stopping"
    );

    Ok(())
}

async fn wait_for_shutdown(grace: Duration) {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::warn!(
            event_name = "system.server.signal_unavailable",
            correlation_id = "shutdown",
            "ctrl-c handler unavailable, running until the task is aborted"
        );
        std::future::pending::<()>().await;
    }
    tracing::info!(
        event_name = "system.server.shutdown_signal",
        correlation_id = "shutdown",
        grace_secs = grace.as_secs(),
        "shutdown signal received, draining in-flight requests"
    );
    // Cap the drain: in-flight requests get the configured window, then we go.
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        tracing::warn!(
            event_name = "system.server.drain_timeout",
            correlation_id = "shutdown",
            "drain exceeded the graceful window, exiting"
        );
        std::process::exit(0);
    });
}

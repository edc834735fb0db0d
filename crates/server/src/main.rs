mod bootstrap;
mod health;
mod webhook;

use anyhow::Result;
use impressions_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use impressions_core::config::LogFormat::*;
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
    dotenvy::dotenv().ok();

    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    tracing::info!(
        event_name = "system.server.starting",
        correlation_id = "bootstrap",
        "starting honest-impressions"
    );

    let app = bootstrap::bootstrap_with_config(config)?;
    let listener = tokio::net::TcpListener::bind(app.config.server.listen_address()).await?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %app.config.server.listen_address(),
        "starting server on port {}",
        app.config.server.port
    );

    axum::serve(listener, app.router).with_graceful_shutdown(wait_for_shutdown()).await?;

    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "honest-impressions stopping"
    );

    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %error, "ctrl-c handler unavailable; running until killed");
        std::future::pending::<()>().await;
    }
}

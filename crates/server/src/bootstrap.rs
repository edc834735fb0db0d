use std::sync::Arc;

use axum::Router;
use impressions_core::config::{AppConfig, ConfigError};
use impressions_slack::{
    client::{SlackApiError, SlackWebClient, ViewsApi},
    interactions::InteractionDispatcher,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{health, webhook};

pub struct Application {
    pub config: AppConfig,
    pub router: Router,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("slack client initialization failed: {0}")]
    SlackClient(#[source] SlackApiError),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    config.validate()?;

    let client = SlackWebClient::new(&config.slack).map_err(BootstrapError::SlackClient)?;
    info!(
        event_name = "system.bootstrap.slack_client_ready",
        correlation_id = "bootstrap",
        api_base_url = %config.slack.api_base_url,
        timeout_secs = config.slack.timeout_secs,
        "slack web client initialized"
    );

    Ok(Application { router: router(Arc::new(client)), config })
}

pub fn router(views: Arc<dyn ViewsApi>) -> Router {
    health::router()
        .merge(webhook::router(InteractionDispatcher::new(views)))
        .layer(TraceLayer::new_for_http())
}

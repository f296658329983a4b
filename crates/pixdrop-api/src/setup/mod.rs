//! Application setup and initialization
//!
//! Everything is built from an explicit [`Config`] value, so tests can stand up
//! as many independent applications as they like.

pub mod routes;
pub mod server;
pub mod storage;
pub mod transcoder;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use pixdrop_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first; a second initialization in the same process keeps the first
    if let Err(e) = crate::telemetry::init_telemetry() {
        tracing::debug!(error = %e, "Tracing already initialized");
    }

    // Validate configuration - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let transcoder = transcoder::setup_transcoder(&config)?;

    let state = Arc::new(AppState {
        config: config.clone(),
        storage,
        transcoder,
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

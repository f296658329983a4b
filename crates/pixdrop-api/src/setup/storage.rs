//! Storage setup and initialization

use anyhow::{Context, Result};
use pixdrop_core::Config;
use pixdrop_storage::{LocalStorage, Storage};
use std::sync::Arc;

/// Prepare the storage directory. A directory that cannot be created is fatal.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!(path = %config.storage_dir().display(), "Initializing local storage...");

    let storage = LocalStorage::new(config.storage_dir())
        .await
        .context("Failed to initialize storage directory")?;

    let existing = storage.list().await.map(|files| files.len()).unwrap_or(0);
    tracing::info!(
        path = %storage.base_path().display(),
        existing_files = existing,
        "Local storage initialized successfully"
    );

    Ok(Arc::new(storage))
}

//! Storage backend setup

use anyhow::{Context, Result};
use pixconv_core::Config;
use pixconv_storage::{LocalStorage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = LocalStorage::new(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to prepare upload directory {}", config.upload_dir.display()))?;

    tracing::info!(path = %config.upload_dir.display(), "Local storage ready");

    Ok(Arc::new(storage))
}

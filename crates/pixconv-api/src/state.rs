//! Application state shared by handlers.

use pixconv_core::{Config, ValidationPolicy};
use pixconv_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    /// Policy every uploaded file is re-validated against.
    pub policy: ValidationPolicy,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let policy = config.upload_policy();
        Self {
            config,
            storage,
            policy,
        }
    }
}

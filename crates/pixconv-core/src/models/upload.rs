//! Per-file result reported by the upload endpoint.

use serde::{Deserialize, Serialize};

/// Serializes as a single-key object: `{"success": "..."}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadOutcome {
    Success(String),
    Error(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            UploadOutcome::Success(msg) | UploadOutcome::Error(msg) => msg,
        }
    }
}

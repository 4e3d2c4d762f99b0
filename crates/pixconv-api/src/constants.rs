//! HTTP-level constants.

pub use pixconv_core::constants::UPLOAD_PATH;

pub const HEALTH_PATH: &str = "/health";

/// Reported when the storage backend fails for a file.
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading file(s).";

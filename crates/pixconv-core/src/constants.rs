//! Application-wide constants.

/// Number of leading bytes the sniffer needs to identify every supported format.
pub const SNIFF_LEN: usize = 12;

/// Format tokens accepted when a control declares no accept list.
pub const DEFAULT_ALLOWED_FORMATS: [&str; 4] = ["gif", "jpeg", "png", "webp"];

/// Default maximum upload size in bytes (5 MB, decimal).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5_000_000;

/// Default quality fraction for lossy targets.
pub const DEFAULT_QUALITY: f32 = 0.5;

/// Directory the upload endpoint writes into when `UPLOAD_DIR` is unset.
pub const DEFAULT_UPLOAD_DIR: &str = "images/converted";

/// Multipart field name the submission client uses for each converted file.
pub const UPLOAD_FIELD_NAME: &str = "images[]";

/// Path of the upload endpoint.
pub const UPLOAD_PATH: &str = "/upload";

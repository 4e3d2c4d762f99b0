//! Command-line presentation layer: converts local images and submits them to
//! the upload endpoint.

pub mod batch;
pub mod client;

pub use batch::{control_from_config, convert_batch, BatchReport};
pub use client::UploadClient;

use std::path::{Path, PathBuf};

/// Where a converted file lands inside `out_dir`.
///
/// Only the final component of `attached_name` is used.
pub fn output_path(out_dir: &Path, attached_name: &str) -> PathBuf {
    let name = Path::new(attached_name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "converted".into());
    out_dir.join(name)
}

/// Endpoint messages carry `<strong>` markup around file names; drop it for
/// terminal output.
pub fn plain_message(message: &str) -> String {
    message.replace("<strong>", "").replace("</strong>", "")
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

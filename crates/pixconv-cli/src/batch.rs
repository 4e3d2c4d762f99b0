//! Local batch conversion behind `pixconv convert`.
//!
//! Every file is handled on its own: a rejected, unreadable or undecodable
//! file is reported and counted, and the rest of the batch still runs.

use std::path::{Path, PathBuf};

use pixconv_core::{Config, FileCollection};
use pixconv_processing::{ConversionFlow, FileInput, FlowOutcome, SelectedFile};

use crate::output_path;

/// Build the file-selection control from configuration. Explicit values
/// (command-line flags) win over the configured ones.
pub fn control_from_config(
    config: &Config,
    max_bytes: Option<u64>,
    accept: Option<String>,
) -> FileInput {
    let accept = accept.unwrap_or_else(|| {
        config
            .allowed_formats
            .iter()
            .map(|f| format!("image/{}", f))
            .collect::<Vec<_>>()
            .join(", ")
    });

    FileInput::new("images", max_bytes.unwrap_or(config.max_file_size_bytes))
        .with_accept(accept)
        .with_default_quality(config.default_quality)
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Converted files, in input order, ready for submission.
    pub converted: FileCollection,
    /// Where each converted file was written.
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

/// Convert `paths` one after another into `out_dir`.
pub async fn convert_batch(
    flow: &ConversionFlow,
    input: &FileInput,
    paths: &[PathBuf],
    out_dir: &Path,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in paths {
        let file = match SelectedFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{}: {}", path.display(), e);
                report.failed += 1;
                continue;
            }
        };
        let name = file.name().to_string();

        let (preview, result) = match flow.run(input, file).await {
            Ok(FlowOutcome::Applied { preview, result }) => (preview, result),
            Ok(FlowOutcome::Superseded) => {
                tracing::debug!(file = %name, "Conversion superseded");
                continue;
            }
            Err(e) => {
                eprintln!("{}: {}", name, e);
                report.failed += 1;
                continue;
            }
        };

        let dest = output_path(out_dir, &preview.attached_name);
        if let Err(e) = tokio::fs::write(&dest, &result.bytes).await {
            tracing::error!(file = %name, path = %dest.display(), error = %e, "Failed to write converted file");
            eprintln!("{}: failed to write {}: {}", name, dest.display(), e);
            report.failed += 1;
            continue;
        }

        println!(
            "{} {} ({}) -> {} {} ({}) {}x{}",
            preview.original_name,
            preview.original_label,
            preview.original_size,
            dest.display(),
            preview.converted_label,
            preview.converted_size,
            preview.width,
            preview.height
        );

        for file in input.files().await {
            report.converted.push(file);
        }
        report.written.push(dest);
    }

    report
}

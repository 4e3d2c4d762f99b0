use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use pixconv_core::{AppError, UploadOutcome};
use pixconv_processing::validate_bytes;

use crate::constants::UPLOAD_FAILED_MESSAGE;
use crate::error::{log_error, storage_error_to_app_error, HttpAppError};
use crate::state::AppState;

/// Receive converted images.
///
/// Every file part is handled independently and yields one entry in the
/// response array. Declared names and content types are not trusted: names
/// are sanitised and the bytes are sniffed and checked against the configured
/// policy before anything touches disk.
///
/// # Errors
/// - `AppError::BadRequest` - the multipart body itself could not be read
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<UploadOutcome>>, HttpAppError> {
    let mut outcomes = Vec::new();
    let mut received = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        // Plain form fields carry no file name
        let Some(declared_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        // An empty picker still submits a nameless, empty part
        if declared_name.is_empty() && data.is_empty() {
            continue;
        }

        received += 1;
        if received > state.config.upload_max_files {
            outcomes.push(UploadOutcome::Error(format!(
                "Too many files. At most {} can be uploaded at once.",
                state.config.upload_max_files
            )));
            continue;
        }

        outcomes.push(store_file(&state, &declared_name, data).await);
    }

    tracing::info!(
        files = received,
        stored = outcomes.iter().filter(|o| o.is_success()).count(),
        "Upload request handled"
    );

    Ok(Json(outcomes))
}

async fn store_file(state: &AppState, declared_name: &str, data: Bytes) -> UploadOutcome {
    let filename = sanitize_filename(declared_name);

    let mime_type = match validate_bytes(&data, &state.policy) {
        Ok(mime_type) => mime_type,
        Err(rejection) => {
            tracing::debug!(file = %filename, reason = %rejection, "Upload rejected");
            return UploadOutcome::Error(format!("<strong>{}</strong>: {}", filename, rejection));
        }
    };

    match state
        .storage
        .upload(&filename, mime_type.as_str(), data)
        .await
    {
        Ok(_) => UploadOutcome::Success(format!(
            "<strong>{}</strong> uploaded successfully!",
            filename
        )),
        Err(e) => {
            log_error(&storage_error_to_app_error(e));
            UploadOutcome::Error(UPLOAD_FAILED_MESSAGE.to_string())
        }
    }
}

/// Sanitize a client-supplied filename for storage.
///
/// Keeps only the final path component, refuses `..`, replaces anything
/// outside `[A-Za-z0-9._-]` with `_` and caps the length at 255.
pub(crate) fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches(|c| c == '.' || c == '_').is_empty() || s.len() < 3 {
        "file".to_string()
    } else {
        s
    }
}

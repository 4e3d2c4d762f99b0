//! Submission client for the upload endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use pixconv_core::constants::{UPLOAD_FIELD_NAME, UPLOAD_PATH};
use pixconv_core::{FileCollection, UploadOutcome};
use reqwest::multipart::{Form, Part};
use reqwest::Client;

/// HTTP client posting converted files to a pixconv upload endpoint.
#[derive(Clone, Debug)]
pub struct UploadClient {
    client: Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: PIXCONV_API_URL, falling back to a local server.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("PIXCONV_API_URL")
            .unwrap_or_else(|_| "http://localhost:4000".to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_PATH)
    }

    fn build_form(files: &FileCollection) -> Result<Form> {
        let mut form = Form::new();
        for file in files.iter() {
            let part = Part::bytes(file.bytes.to_vec())
                .file_name(file.name.clone())
                .mime_str(file.mime_type.as_str())
                .with_context(|| format!("Invalid mimetype for {}", file.name))?;
            form = form.part(UPLOAD_FIELD_NAME, part);
        }
        Ok(form)
    }

    /// Post every file in `files` and return the endpoint's per-file outcomes.
    ///
    /// Failures are logged and returned; nothing is retried.
    pub async fn submit(&self, files: &FileCollection) -> Result<Vec<UploadOutcome>> {
        let result = self.send(files).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, url = %self.upload_url(), "Upload submission failed");
        }
        result
    }

    async fn send(&self, files: &FileCollection) -> Result<Vec<UploadOutcome>> {
        let form = Self::build_form(files)?;

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Upload failed with status {}: {}",
                status,
                error_text
            ));
        }

        let outcomes: Vec<UploadOutcome> = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        tracing::info!(
            files = files.len(),
            stored = outcomes.iter().filter(|o| o.is_success()).count(),
            "Upload submitted"
        );

        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_trims_trailing_slash() {
        let client = UploadClient::new("http://localhost:4000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(client.upload_url(), "http://localhost:4000/upload");
    }

    #[test]
    fn empty_collection_builds_empty_form() {
        assert!(UploadClient::build_form(&FileCollection::new()).is_ok());
    }
}

//! Decode a selected file and re-encode it into the chosen target format.
//!
//! Stages run strictly in order: full read, decode, encode. Decode and encode
//! are CPU-bound and run on the blocking pool.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use pixconv_core::{AppError, MimeType, Quality, TargetFormat};
use std::io;
use std::sync::Arc;

use crate::compression::ImageCompressor;
use crate::image::ImageProcessor;
use crate::source::SelectedFile;
use crate::traits::{RasterDecoder, RasterEncoder};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Failed to read source file: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    #[error("Failed to encode image as {format}: {message}")]
    EncodeFailure {
        format: TargetFormat,
        message: String,
    },
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Read(e) => AppError::BadRequest(format!("Failed to read file: {}", e)),
            ConversionError::DecodeFailure(msg) => AppError::DecodeFailure(msg),
            err @ ConversionError::EncodeFailure { .. } => AppError::EncodeFailure(err.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub file: SelectedFile,
    pub target: TargetFormat,
    pub quality: Quality,
}

impl ConversionRequest {
    pub fn new(file: SelectedFile, target: TargetFormat, quality: Quality) -> Self {
        Self {
            file,
            target,
            quality,
        }
    }

    /// Quality handed to the encoder; lossless targets get none.
    pub fn effective_quality(&self) -> Option<Quality> {
        if self.target.is_lossless() {
            None
        } else {
            Some(self.quality)
        }
    }
}

/// Encoded bytes plus the raster they were produced from.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub bytes: Bytes,
    /// Decoded source at its original dimensions, usable as a preview.
    pub raster: DynamicImage,
    pub target: TargetFormat,
}

impl ConversionResult {
    pub fn dimensions(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn mime_type(&self) -> MimeType {
        self.target.mime_type()
    }
}

#[derive(Clone)]
pub struct Converter {
    decoder: Arc<dyn RasterDecoder>,
    encoder: Arc<dyn RasterEncoder>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(ImageProcessor), Arc::new(ImageCompressor))
    }
}

impl Converter {
    pub fn new(decoder: Arc<dyn RasterDecoder>, encoder: Arc<dyn RasterEncoder>) -> Self {
        Self { decoder, encoder }
    }

    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let name = request.file.name().to_string();
        let target = request.target;
        let quality = request.effective_quality();

        let data = request
            .file
            .source()
            .read_all()
            .await
            .map_err(ConversionError::Read)?;

        let decoder = Arc::clone(&self.decoder);
        let raster = tokio::task::spawn_blocking(move || decoder.decode(&data))
            .await
            .map_err(|e| ConversionError::DecodeFailure(format!("Decode task failed: {}", e)))?
            .map_err(|e| {
                tracing::warn!(file = %name, error = %e, "Failed to decode image");
                ConversionError::DecodeFailure(e.to_string())
            })?;

        let encoder = Arc::clone(&self.encoder);
        let (raster, encoded) = tokio::task::spawn_blocking(move || {
            let encoded = encoder.encode(&raster, target, quality);
            (raster, encoded)
        })
        .await
        .map_err(|e| ConversionError::EncodeFailure {
            format: target,
            message: format!("Encode task failed: {}", e),
        })?;

        let bytes = encoded.map_err(|e| {
            tracing::error!(file = %name, format = %target, error = %e, "Failed to encode image");
            ConversionError::EncodeFailure {
                format: target,
                message: e.to_string(),
            }
        })?;

        if bytes.is_empty() {
            return Err(ConversionError::EncodeFailure {
                format: target,
                message: "encoder produced no output".to_string(),
            });
        }

        let (width, height) = raster.dimensions();
        tracing::info!(
            file = %name,
            format = %target,
            width,
            height,
            original_size = request.file.size(),
            converted_size = bytes.len(),
            "Image converted"
        );

        Ok(ConversionResult {
            bytes,
            raster,
            target,
        })
    }
}

//! Codec seams used by the converter and the capability probe.
//!
//! Both traits are synchronous. Callers run them on the blocking thread pool
//! since decode and encode are CPU-bound.

use bytes::Bytes;
use image::DynamicImage;
use pixconv_core::{Quality, TargetFormat};

/// Decodes raw file bytes into a raster.
pub trait RasterDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, anyhow::Error>;
}

/// Encodes a raster into a target format.
pub trait RasterEncoder: Send + Sync {
    /// `quality` is `None` for lossless targets.
    fn encode(
        &self,
        raster: &DynamicImage,
        format: TargetFormat,
        quality: Option<Quality>,
    ) -> Result<Bytes, anyhow::Error>;
}

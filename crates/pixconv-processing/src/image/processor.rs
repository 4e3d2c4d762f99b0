//! Image processor - content-sniffed decoding

use crate::traits::RasterDecoder;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Decodes any format the `image` crate was built with, guessing the format
/// from the content rather than a name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageProcessor;

impl RasterDecoder for ImageProcessor {
    fn decode(&self, data: &[u8]) -> Result<DynamicImage, anyhow::Error> {
        let cursor = Cursor::new(data);
        let reader = ImageReader::new(cursor).with_guessed_format()?;
        if reader.format().is_none() {
            anyhow::bail!("Unrecognised image format");
        }
        Ok(reader.decode()?)
    }
}

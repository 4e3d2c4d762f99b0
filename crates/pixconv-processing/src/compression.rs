use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use pixconv_core::{Quality, TargetFormat};
use std::io::Cursor;

use crate::traits::RasterEncoder;

/// AVIF encoder speed (0 slowest/best, 10 fastest).
const AVIF_SPEED: u8 = 6;

/// Default encoder stack: mozjpeg for JPEG, libwebp for WebP, ravif for AVIF and
/// the `image` crate's encoders for the lossless targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCompressor;

impl RasterEncoder for ImageCompressor {
    fn encode(
        &self,
        raster: &DynamicImage,
        format: TargetFormat,
        quality: Option<Quality>,
    ) -> Result<Bytes> {
        Self::compress(raster, format, quality)
    }
}

impl ImageCompressor {
    /// Encode `img` as `format`. Quality is ignored for lossless targets and
    /// defaults to 0.5 for lossy ones when absent.
    pub fn compress(img: &DynamicImage, format: TargetFormat, quality: Option<Quality>) -> Result<Bytes> {
        let scale = quality.unwrap_or_default().encoder_scale();

        let data = match format {
            TargetFormat::Jpeg => Self::compress_jpeg(img, scale)?,
            TargetFormat::WebP => Self::compress_webp(img, scale)?,
            TargetFormat::Avif => Self::compress_avif(img, scale)?,
            TargetFormat::Png => Self::compress_png(img)?,
            TargetFormat::Gif => Self::compress_gif(img)?,
        };

        if data.is_empty() {
            return Err(anyhow!("{} encoder produced no output", format));
        }

        tracing::debug!(
            format = %format,
            quality = ?quality.map(Quality::fraction),
            size = data.len(),
            "Encoded image"
        );

        Ok(data)
    }

    /// Compress to JPEG using mozjpeg
    fn compress_jpeg(img: &DynamicImage, quality: f32) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress to WebP
    fn compress_webp(img: &DynamicImage, quality: f32) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder.encode(quality);

        Ok(Bytes::copy_from_slice(&webp_data))
    }

    /// Compress to AVIF, keeping the alpha channel
    fn compress_avif(img: &DynamicImage, quality: f32) -> Result<Bytes> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let pixels: Vec<rgb::RGBA8> = rgba_img
            .as_raw()
            .chunks_exact(4)
            .map(|px| rgb::RGBA8::new(px[0], px[1], px[2], px[3]))
            .collect();

        let img_buf = ravif::Img::new(pixels.as_slice(), width as usize, height as usize);

        let encoder = ravif::Encoder::new()
            .with_quality(quality)
            .with_speed(AVIF_SPEED);

        let avif_data = encoder.encode_rgba(img_buf)?;

        Ok(Bytes::from(avif_data.avif_file))
    }

    /// Compress to PNG
    fn compress_png(img: &DynamicImage) -> Result<Bytes> {
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(Bytes::from(buffer))
    }

    /// Compress to GIF. The GIF encoder only takes 8-bit RGBA.
    fn compress_gif(img: &DynamicImage) -> Result<Bytes> {
        let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
        let mut buffer = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Gif)?;
        Ok(Bytes::from(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffer::detect_type;
    use image::{Rgba, RgbaImage};
    use pixconv_core::MimeType;

    fn test_image() -> DynamicImage {
        let mut img = RgbaImage::new(24, 16);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x * 10) as u8, (y * 15) as u8, 128, 255]);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_encoded_bytes_sniff_as_target() {
        let img = test_image();
        let cases = [
            (TargetFormat::Jpeg, MimeType::Jpeg),
            (TargetFormat::Png, MimeType::Png),
            (TargetFormat::WebP, MimeType::WebP),
            (TargetFormat::Gif, MimeType::Gif),
        ];
        for (format, expected) in cases {
            let data = ImageCompressor::compress(&img, format, Some(Quality::new(0.8))).unwrap();
            assert!(!data.is_empty());
            assert_eq!(detect_type(&data), expected, "{format}");
        }
    }

    #[test]
    fn test_avif_output_is_non_empty() {
        let data = ImageCompressor::compress(&test_image(), TargetFormat::Avif, Some(Quality::new(0.6)))
            .unwrap();
        assert!(!data.is_empty());
        assert_eq!(&data[4..8], b"ftyp");
    }

    #[test]
    fn test_lower_quality_is_smaller_jpeg() {
        let img = test_image();
        let low = ImageCompressor::compress(&img, TargetFormat::Jpeg, Some(Quality::new(0.1))).unwrap();
        let high = ImageCompressor::compress(&img, TargetFormat::Jpeg, Some(Quality::new(1.0))).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_lossless_png_round_trips_pixels() {
        let img = test_image();
        let data = ImageCompressor::compress(&img, TargetFormat::Png, None).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());
    }
}

//! Test fixtures: small images generated in memory.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

/// Solid-colour PNG of the given size.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([12, 140, 220, 255]));
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Solid-colour JPEG of the given size.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([220, 140, 12, 255]));
    encode(
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
        ImageFormat::Jpeg,
    )
}

/// Bytes that are not an image in any supported format.
pub fn create_text_file() -> Vec<u8> {
    b"just some plain text pretending to be a picture".to_vec()
}

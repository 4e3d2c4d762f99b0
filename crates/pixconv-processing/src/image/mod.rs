//! Image decoding
//!
//! The default [`RasterDecoder`](crate::traits::RasterDecoder) backed by the
//! `image` crate.

pub mod processor;

pub use processor::ImageProcessor;

//! Pixconv Image Processing Library
//!
//! This crate provides the validation and conversion pipeline: byte sniffing,
//! AVIF capability probing, allow-list/size validation, decode/re-encode and
//! repackaging of the converted bytes for submission.

pub mod attacher;
pub mod capability;
pub mod compression;
pub mod converter;
pub mod display;
pub mod image;
pub mod input;
pub mod pipeline;
pub mod sniffer;
pub mod source;
pub mod traits;
pub mod validator;

// Re-export commonly used types
pub use attacher::{attach, attach_at};
pub use capability::probe_avif_support;
pub use compression::ImageCompressor;
pub use converter::{ConversionError, ConversionRequest, ConversionResult, Converter};
pub use self::image::ImageProcessor;
pub use input::{FileInput, SequenceToken};
pub use pipeline::{ConversionFlow, ConversionPreview, FlowError, FlowOutcome};
pub use sniffer::detect_type;
pub use source::{ByteSource, DiskSource, MemorySource, SelectedFile};
pub use traits::{RasterDecoder, RasterEncoder};
pub use validator::{validate, validate_bytes, Rejection};

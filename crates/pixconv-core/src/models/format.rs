//! Image formats: sniffed mimetypes, conversion targets and quality.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_QUALITY;
use crate::error::AppError;

/// Mimetype identified from a file's leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    Avif,
    Png,
    Gif,
    Pdf,
    Jpeg,
    WebP,
    /// No known signature matched.
    Unknown,
}

impl MimeType {
    pub fn as_str(self) -> &'static str {
        match self {
            MimeType::Avif => "image/avif",
            MimeType::Png => "image/png",
            MimeType::Gif => "image/gif",
            MimeType::Pdf => "application/pdf",
            MimeType::Jpeg => "image/jpeg",
            MimeType::WebP => "image/webp",
            MimeType::Unknown => "unknown",
        }
    }

    /// The part after the slash, e.g. `png` for `image/png`.
    pub fn subtype(self) -> Option<&'static str> {
        self.as_str().split_once('/').map(|(_, sub)| sub)
    }

}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a selected image is re-encoded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Jpeg,
    Png,
    #[serde(rename = "webp")]
    WebP,
    Avif,
    Gif,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 5] = [
        TargetFormat::Jpeg,
        TargetFormat::Png,
        TargetFormat::WebP,
        TargetFormat::Avif,
        TargetFormat::Gif,
    ];

    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(TargetFormat::Jpeg),
            "png" => Ok(TargetFormat::Png),
            "webp" => Ok(TargetFormat::WebP),
            "avif" => Ok(TargetFormat::Avif),
            "gif" => Ok(TargetFormat::Gif),
            other => Err(AppError::InvalidInput(format!(
                "Invalid target format: {}",
                other
            ))),
        }
    }

    /// Token as it appears in a format selector (`jpeg`, not `jpg`).
    pub fn token(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
            TargetFormat::WebP => "webp",
            TargetFormat::Avif => "avif",
            TargetFormat::Gif => "gif",
        }
    }

    /// File extension for converted files. JPEG is written as `jpg`.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpg",
            other => other.token(),
        }
    }

    pub fn mime_type(self) -> MimeType {
        match self {
            TargetFormat::Jpeg => MimeType::Jpeg,
            TargetFormat::Png => MimeType::Png,
            TargetFormat::WebP => MimeType::WebP,
            TargetFormat::Avif => MimeType::Avif,
            TargetFormat::Gif => MimeType::Gif,
        }
    }

    /// Lossless targets ignore the quality setting.
    pub fn is_lossless(self) -> bool {
        matches!(self, TargetFormat::Png | TargetFormat::Gif)
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Encoding quality as a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quality(f32);

impl Quality {
    /// Clamp into `[0, 1]`; NaN falls back to the default.
    pub fn new(fraction: f32) -> Self {
        if fraction.is_nan() {
            return Self::default();
        }
        Quality(fraction.clamp(0.0, 1.0))
    }

    /// Build from a 0-100 slider value.
    pub fn from_percent(percent: u8) -> Self {
        Self::new(f32::from(percent) / 100.0)
    }

    pub fn fraction(self) -> f32 {
        self.0
    }

    /// Quality on the 1-100 scale the lossy encoders expect.
    pub fn encoder_scale(self) -> f32 {
        (self.0 * 100.0).round().clamp(1.0, 100.0)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(DEFAULT_QUALITY)
    }
}

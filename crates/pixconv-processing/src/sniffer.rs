//! Byte sniffer: identify a file's real type from its leading bytes.
//!
//! The declared extension or mimetype of an upload is never trusted. Only the
//! first [`SNIFF_LEN`] bytes are inspected: bytes 0..4 and, for containers
//! that need it, bytes 8..12.

use pixconv_core::constants::SNIFF_LEN;
use pixconv_core::MimeType;

/// A known leading-bytes pattern, as uppercase hex.
#[derive(Debug, Clone, Copy)]
pub struct FormatSignature {
    /// Any of these must equal bytes 0..4.
    pub leading: &'static [&'static str],
    /// When set, bytes 8..12 must equal this as well.
    pub trailing: Option<&'static str>,
    pub mime_type: MimeType,
}

impl FormatSignature {
    fn matches(&self, leading: &str, trailing: &str) -> bool {
        self.leading.iter().any(|sig| *sig == leading)
            && self.trailing.map_or(true, |t| t == trailing)
    }
}

/// Signatures in precedence order. First match wins.
pub const SIGNATURES: &[FormatSignature] = &[
    FormatSignature {
        // ISO-BMFF `ftyp` box size; the brand is not checked
        leading: &["00000020", "0000001C"],
        trailing: None,
        mime_type: MimeType::Avif,
    },
    FormatSignature {
        leading: &["89504E47"],
        trailing: None,
        mime_type: MimeType::Png,
    },
    FormatSignature {
        leading: &["47494638"],
        trailing: None,
        mime_type: MimeType::Gif,
    },
    FormatSignature {
        leading: &["25504446"],
        trailing: None,
        mime_type: MimeType::Pdf,
    },
    FormatSignature {
        leading: &["FFD8FFDB", "FFD8FFE0", "FFD8FFE1", "FFD8FFEE"],
        trailing: None,
        mime_type: MimeType::Jpeg,
    },
    FormatSignature {
        leading: &["52494646"], // "RIFF"
        trailing: Some("57454250"), // "WEBP"
        mime_type: MimeType::WebP,
    },
];

/// Classify a file from its header. Inputs longer than [`SNIFF_LEN`] are truncated;
/// shorter ones only match signatures they fully cover.
pub fn detect_type(header: &[u8]) -> MimeType {
    let hex = hex::encode_upper(&header[..header.len().min(SNIFF_LEN)]);
    let leading = hex.get(0..8).unwrap_or("");
    let trailing = hex.get(16..24).unwrap_or("");

    SIGNATURES
        .iter()
        .find(|sig| sig.matches(leading, trailing))
        .map(|sig| sig.mime_type)
        .unwrap_or(MimeType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(leading: [u8; 4], trailing: [u8; 4]) -> Vec<u8> {
        let mut bytes = leading.to_vec();
        bytes.extend_from_slice(b"\0\0\0\0");
        bytes.extend_from_slice(&trailing);
        bytes
    }

    #[test]
    fn test_detect_png() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        assert_eq!(detect_type(&bytes), MimeType::Png);
    }

    #[test]
    fn test_detect_webp_requires_brand() {
        assert_eq!(detect_type(&header(*b"RIFF", *b"WEBP")), MimeType::WebP);
        // RIFF container that is not WebP (e.g. WAVE)
        assert_eq!(detect_type(&header(*b"RIFF", *b"WAVE")), MimeType::Unknown);
    }

    #[test]
    fn test_detect_avif_by_box_size() {
        assert_eq!(
            detect_type(&header([0, 0, 0, 0x20], *b"avif")),
            MimeType::Avif
        );
        assert_eq!(
            detect_type(&header([0, 0, 0, 0x1C], *b"avif")),
            MimeType::Avif
        );
        assert_eq!(detect_type(&[0, 0, 0, 0x20]), MimeType::Avif);
        // Other box sizes are not recognised
        assert_eq!(
            detect_type(&header([0, 0, 0, 0x18], *b"avif")),
            MimeType::Unknown
        );
    }

    #[test]
    fn test_detect_avif_ignores_brand() {
        let mut animated = vec![0, 0, 0, 0x20];
        animated.extend_from_slice(b"ftypavis");
        assert_eq!(detect_type(&animated), MimeType::Avif);

        let mut mif1 = vec![0, 0, 0, 0x1C];
        mif1.extend_from_slice(b"ftypmif1");
        assert_eq!(detect_type(&mif1), MimeType::Avif);
    }

    #[test]
    fn test_detect_jpeg_variants() {
        for marker in [0xDB, 0xE0, 0xE1, 0xEE] {
            let bytes = [0xFF, 0xD8, 0xFF, marker, 0, 0x10, b'J', b'F', b'I', b'F', 0, 1];
            assert_eq!(detect_type(&bytes), MimeType::Jpeg, "marker {marker:#X}");
        }
        let bytes = [0xFF, 0xD8, 0xFF, 0xE2, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(detect_type(&bytes), MimeType::Unknown);
    }

    #[test]
    fn test_detect_gif_and_pdf() {
        assert_eq!(detect_type(b"GIF89a\x01\x00\x01\x00\x80\x00"), MimeType::Gif);
        assert_eq!(detect_type(b"%PDF-1.7\n%\xE2\xE3"), MimeType::Pdf);
    }

    #[test]
    fn test_detect_short_and_empty_input() {
        assert_eq!(detect_type(&[]), MimeType::Unknown);
        assert_eq!(detect_type(&[0x89, 0x50]), MimeType::Unknown);
        // Four bytes are enough for signatures without a trailing check
        assert_eq!(detect_type(&[0x47, 0x49, 0x46, 0x38]), MimeType::Gif);
        assert_eq!(detect_type(b"RIFF"), MimeType::Unknown);
    }

    #[test]
    fn test_detect_ignores_bytes_past_header() {
        let mut bytes = header(*b"RIFF", *b"WEBP");
        bytes.extend_from_slice(&[0xFF; 64]);
        assert_eq!(detect_type(&bytes), MimeType::WebP);
    }
}

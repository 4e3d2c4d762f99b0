//! Repackage converted bytes as the file a control will submit.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use pixconv_core::{AttachedFile, FileCollection, TargetFormat};

use crate::display::file_stem;
use crate::source::SelectedFile;

/// Wrap `encoded` as a single-file collection named after `original`,
/// timestamped now.
pub fn attach(original: &SelectedFile, encoded: Bytes, target: TargetFormat) -> FileCollection {
    attach_at(original, encoded, target, Utc::now())
}

/// As [`attach`], with an explicit timestamp.
pub fn attach_at(
    original: &SelectedFile,
    encoded: Bytes,
    target: TargetFormat,
    now: DateTime<Utc>,
) -> FileCollection {
    let file = AttachedFile {
        name: converted_file_name(original.name(), target, now),
        mime_type: target.mime_type(),
        bytes: encoded,
        last_modified: now,
    };
    tracing::debug!(name = %file.name, size = file.size(), "Attached converted file");
    FileCollection::from(file)
}

/// `<stem>-<epoch millis>.<ext>`, e.g. `photo-1700000000000.webp`.
pub fn converted_file_name(original_name: &str, target: TargetFormat, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}.{}",
        file_stem(original_name),
        now.timestamp_millis(),
        target.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixconv_core::MimeType;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn test_attach_webp() {
        let original = SelectedFile::from_bytes("photo.heic", vec![0u8; 8]);
        let collection = attach_at(
            &original,
            Bytes::from_static(b"webp-bytes"),
            TargetFormat::WebP,
            at(1_700_000_000_123),
        );

        assert_eq!(collection.len(), 1);
        let file = collection.first().unwrap();
        assert_eq!(file.name, "photo-1700000000123.webp");
        assert_eq!(file.mime_type, MimeType::WebP);
        assert_eq!(file.bytes.as_ref(), b"webp-bytes");
        assert_eq!(file.last_modified, at(1_700_000_000_123));
    }

    #[test]
    fn test_attach_jpeg_uses_jpg_extension() {
        let original = SelectedFile::from_bytes("scan.final.png", vec![0u8; 8]);
        let collection = attach_at(&original, Bytes::from_static(b"j"), TargetFormat::Jpeg, at(5));
        let file = collection.first().unwrap();
        assert_eq!(file.name, "scan.final-5.jpg");
        assert_eq!(file.mime_type, MimeType::Jpeg);
    }

    #[test]
    fn test_attach_name_without_extension() {
        assert_eq!(converted_file_name("README", TargetFormat::Png, at(42)), "README-42.png");
    }

    #[test]
    fn test_attach_uses_current_time() {
        let before = Utc::now().timestamp_millis();
        let original = SelectedFile::from_bytes("a.png", vec![0u8; 4]);
        let collection = attach(&original, Bytes::from_static(b"x"), TargetFormat::Gif);
        let file = collection.first().unwrap();
        assert!(file.last_modified.timestamp_millis() >= before);
        assert!(file.name.starts_with("a-") && file.name.ends_with(".gif"));
    }
}

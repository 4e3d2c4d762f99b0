use pixconv_core::constants::SNIFF_LEN;
use pixconv_core::{AppError, MimeType, ValidationPolicy};

use crate::sniffer::detect_type;
use crate::source::SelectedFile;

/// Why a selected file was refused before conversion.
///
/// The display strings are the user-facing messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("This is not a correct image file type. Please choose from either a {allowed}.")]
    UnsupportedType { detected: MimeType, allowed: String },

    #[error("The file size is too large. Please choose another ({max_megabytes} MB or less).")]
    TooLarge { size: u64, max_megabytes: u64 },

    #[error("Unfortunately this functionality is not supported in your environment.")]
    UnsupportedEnvironment,

    #[error("The file could not be read: {0}")]
    Unreadable(String),
}

impl From<Rejection> for AppError {
    fn from(rejection: Rejection) -> Self {
        let message = rejection.to_string();
        match rejection {
            Rejection::UnsupportedType { .. } => AppError::UnsupportedType(message),
            Rejection::TooLarge { .. } => AppError::PayloadTooLarge(message),
            Rejection::UnsupportedEnvironment => AppError::UnsupportedEnvironment(message),
            Rejection::Unreadable(_) => AppError::BadRequest(message),
        }
    }
}

/// Validate a selected file against a policy, reading only its leading bytes.
///
/// Returns the sniffed mimetype on success. The declared name plays no part.
pub async fn validate(
    file: &SelectedFile,
    policy: &ValidationPolicy,
) -> Result<MimeType, Rejection> {
    let source = file.source();
    if !source.supports_binary_read() {
        tracing::warn!(file = %file.name(), "Byte source cannot be read as binary");
        return Err(Rejection::UnsupportedEnvironment);
    }

    let header = source.read_head(SNIFF_LEN).await.map_err(|e| {
        tracing::warn!(file = %file.name(), error = %e, "Failed to read file header");
        Rejection::Unreadable(e.to_string())
    })?;

    check(detect_type(&header), file.size(), policy)
}

/// Validate bytes already held in memory, e.g. a multipart upload.
pub fn validate_bytes(data: &[u8], policy: &ValidationPolicy) -> Result<MimeType, Rejection> {
    check(detect_type(data), data.len() as u64, policy)
}

fn check(mime_type: MimeType, size: u64, policy: &ValidationPolicy) -> Result<MimeType, Rejection> {
    if !policy.allows(mime_type.as_str()) {
        tracing::debug!(mimetype = %mime_type, "Rejected file type");
        return Err(Rejection::UnsupportedType {
            detected: mime_type,
            allowed: policy.allowed_list_message(),
        });
    }

    if size > policy.max_bytes {
        tracing::debug!(size, max_bytes = policy.max_bytes, "Rejected file size");
        return Err(Rejection::TooLarge {
            size,
            max_megabytes: policy.max_megabytes(),
        });
    }

    Ok(mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ByteSource;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::io;
    use std::sync::Arc;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0, 1];

    fn padded(magic: &[u8], len: usize) -> Vec<u8> {
        let mut data = magic.to_vec();
        data.resize(len, 0);
        data
    }

    #[derive(Debug)]
    struct TextOnlySource;

    #[async_trait]
    impl ByteSource for TextOnlySource {
        fn supports_binary_read(&self) -> bool {
            false
        }

        async fn read_head(&self, _len: usize) -> io::Result<Bytes> {
            unreachable!("binary reads are unsupported")
        }

        async fn read_all(&self) -> io::Result<Bytes> {
            unreachable!("binary reads are unsupported")
        }
    }

    #[derive(Debug)]
    struct BrokenSource;

    #[async_trait]
    impl ByteSource for BrokenSource {
        async fn read_head(&self, _len: usize) -> io::Result<Bytes> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }

        async fn read_all(&self) -> io::Result<Bytes> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[tokio::test]
    async fn test_accepts_allowed_type() {
        let policy = ValidationPolicy::new(5_000_000, vec![]);
        let file = SelectedFile::from_bytes("photo.png", padded(&PNG_MAGIC, 64));
        assert_eq!(validate(&file, &policy).await, Ok(MimeType::Png));
    }

    #[tokio::test]
    async fn test_declared_name_is_ignored() {
        // JPEG bytes behind a .png name are sniffed as JPEG
        let policy = ValidationPolicy::new(5_000_000, vec!["png".to_string()]);
        let file = SelectedFile::from_bytes("spoofed.png", padded(&JPEG_MAGIC, 64));

        let err = validate(&file, &policy).await.unwrap_err();
        assert_eq!(
            err,
            Rejection::UnsupportedType {
                detected: MimeType::Jpeg,
                allowed: "png".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unsupported_type_message_lists_formats() {
        let policy = ValidationPolicy::new(5_000_000, vec![]);
        let file = SelectedFile::from_bytes("doc.pdf", b"%PDF-1.7\n%\xE2\xE3\xCF\xD3".to_vec());

        let err = validate(&file, &policy).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "This is not a correct image file type. Please choose from either a gif, jpeg, png, or webp."
        );
    }

    #[tokio::test]
    async fn test_size_boundary() {
        let policy = ValidationPolicy::new(1_000, vec![]);

        let at_limit = SelectedFile::from_bytes("a.png", padded(&PNG_MAGIC, 1_000));
        assert!(validate(&at_limit, &policy).await.is_ok());

        let over = SelectedFile::from_bytes("b.png", padded(&PNG_MAGIC, 1_001));
        assert_eq!(
            validate(&over, &policy).await,
            Err(Rejection::TooLarge {
                size: 1_001,
                max_megabytes: 0,
            })
        );
    }

    #[tokio::test]
    async fn test_too_large_message_uses_whole_megabytes() {
        let policy = ValidationPolicy::new(5_900_000, vec![]);
        let file = SelectedFile::new(
            "big.png",
            6_000_000,
            Arc::new(crate::source::MemorySource::new(PNG_MAGIC.to_vec())),
        );

        let err = validate(&file, &policy).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "The file size is too large. Please choose another (5 MB or less)."
        );
    }

    #[tokio::test]
    async fn test_type_checked_before_size() {
        let policy = ValidationPolicy::new(10, vec![]);
        let file = SelectedFile::from_bytes("x.bin", vec![0u8; 100]);
        assert!(matches!(
            validate(&file, &policy).await,
            Err(Rejection::UnsupportedType { .. })
        ));
    }

    #[tokio::test]
    async fn test_unsupported_environment() {
        let policy = ValidationPolicy::new(5_000_000, vec![]);
        let file = SelectedFile::new("a.png", 10, Arc::new(TextOnlySource));
        let err = validate(&file, &policy).await.unwrap_err();
        assert_eq!(err, Rejection::UnsupportedEnvironment);
        assert_eq!(
            err.to_string(),
            "Unfortunately this functionality is not supported in your environment."
        );
    }

    #[tokio::test]
    async fn test_read_failure_is_unreadable() {
        let policy = ValidationPolicy::new(5_000_000, vec![]);
        let file = SelectedFile::new("a.png", 10, Arc::new(BrokenSource));
        assert!(matches!(
            validate(&file, &policy).await,
            Err(Rejection::Unreadable(_))
        ));
    }

    #[test]
    fn test_validate_bytes_uses_length() {
        let policy = ValidationPolicy::new(20, vec![]);
        assert_eq!(
            validate_bytes(&padded(&PNG_MAGIC, 20), &policy),
            Ok(MimeType::Png)
        );
        assert!(validate_bytes(&padded(&PNG_MAGIC, 21), &policy).is_err());
    }

    #[test]
    fn test_rejection_maps_to_app_error() {
        let err: AppError = Rejection::TooLarge {
            size: 2,
            max_megabytes: 1,
        }
        .into();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));

        let err: AppError = Rejection::UnsupportedEnvironment.into();
        assert!(matches!(err, AppError::UnsupportedEnvironment(_)));
    }
}

//! Runtime check for AVIF decode support.
//!
//! A tiny embedded AVIF image is decoded with the configured decoder. If that
//! works, every control's accept list is widened with `image/avif`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pixconv_core::MimeType;
use std::sync::Arc;

use crate::input::FileInput;
use crate::traits::RasterDecoder;

/// A 2x2 AVIF still image.
const AVIF_SAMPLE_BASE64: &str = concat!(
    "AAAAIGZ0eXBhdmlmAAAAAGF2aWZtaWYxbWlhZk1BMUIAAADybWV0YQAAAAAAAAAoaGRscgAA",
    "AAAAAAAAcGljdAAAAAAAAAAAAAAAAGxpYmF2aWYAAAAADnBpdG0AAAAAAAEAAAAeaWxvYwAA",
    "AABEAAABAAEAAAABAAABGgAAAB0AAAAoaWluZgAAAAAAAQAAABppbmZlAgAAAAABAABhdjAx",
    "Q29sb3IAAAAAamlwcnAAAABLaXBjbwAAABRpc3BlAAAAAAAAAAIAAAACAAAAEHBpeGkAAAAA",
    "AwgICAAAAAxhdjFDgQ0MAAAAABNjb2xybmNseAACAAIAAYAAAAAXaXBtYQAAAAAAAAABAAEE",
    "AQKDBAAAACVtZGF0EgAKCBgANogQEAwgMg8f8D///8WfhwB8+ErK42A=",
);

/// Probe whether `decoder` can read AVIF. Never fails: any error means no.
///
/// On success `image/avif` is added to every input's accept list.
pub async fn probe_avif_support(decoder: Arc<dyn RasterDecoder>, inputs: &mut [FileInput]) -> bool {
    let sample = match STANDARD.decode(AVIF_SAMPLE_BASE64) {
        Ok(sample) => sample,
        Err(e) => {
            tracing::error!(error = %e, "Embedded AVIF sample is not valid base64");
            return false;
        }
    };

    let supported = match tokio::task::spawn_blocking(move || decoder.decode(&sample)).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "AVIF decode unavailable");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "AVIF probe task failed");
            false
        }
    };

    if supported {
        for input in inputs.iter_mut() {
            input.allow_format(MimeType::Avif);
        }
    }

    tracing::info!(supported, "AVIF capability probe finished");
    supported
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sniffer::detect_type;
    use image::{DynamicImage, RgbaImage};

    struct AcceptingDecoder;

    impl RasterDecoder for AcceptingDecoder {
        fn decode(&self, _data: &[u8]) -> Result<DynamicImage, anyhow::Error> {
            Ok(DynamicImage::ImageRgba8(RgbaImage::new(2, 2)))
        }
    }

    struct RefusingDecoder;

    impl RasterDecoder for RefusingDecoder {
        fn decode(&self, _data: &[u8]) -> Result<DynamicImage, anyhow::Error> {
            Err(anyhow::anyhow!("no AVIF decoder"))
        }
    }

    fn controls() -> Vec<FileInput> {
        vec![
            FileInput::new("first", 5_000_000).with_accept("image/png, image/jpeg"),
            FileInput::new("second", 5_000_000).with_accept("image/webp"),
        ]
    }

    #[test]
    fn test_embedded_sample_is_avif() {
        let sample = STANDARD.decode(AVIF_SAMPLE_BASE64).unwrap();
        assert_eq!(detect_type(&sample), MimeType::Avif);
    }

    #[tokio::test]
    async fn test_supported_widens_every_control() {
        let mut inputs = controls();
        assert!(probe_avif_support(Arc::new(AcceptingDecoder), &mut inputs).await);
        assert_eq!(inputs[0].accept(), Some("image/png, image/jpeg, image/avif"));
        assert_eq!(inputs[1].accept(), Some("image/webp, image/avif"));
    }

    #[tokio::test]
    async fn test_unsupported_leaves_controls_untouched() {
        let mut inputs = controls();
        assert!(!probe_avif_support(Arc::new(RefusingDecoder), &mut inputs).await);
        assert_eq!(inputs[0].accept(), Some("image/png, image/jpeg"));
        assert_eq!(inputs[1].accept(), Some("image/webp"));
        assert!(!inputs[0].policy().allows("image/avif"));
    }

    #[cfg(feature = "avif-decode")]
    #[tokio::test]
    async fn test_native_decoder_reads_sample() {
        let mut inputs = controls();
        assert!(probe_avif_support(Arc::new(crate::ImageProcessor), &mut inputs).await);
    }
}

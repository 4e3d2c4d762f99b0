//! Conversion flow for one control: validate, convert, attach, install.

use pixconv_core::AppError;

use crate::attacher::attach;
use crate::converter::{ConversionError, ConversionRequest, ConversionResult, Converter};
use crate::display::{file_extension, human_file_size};
use crate::input::FileInput;
use crate::source::SelectedFile;
use crate::validator::{validate, Rejection};

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl From<FlowError> for AppError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::Rejected(r) => r.into(),
            FlowError::Conversion(c) => c.into(),
        }
    }
}

/// What the presentation layer shows after a conversion.
#[derive(Debug, Clone)]
pub struct ConversionPreview {
    pub original_name: String,
    /// Upper-cased original extension, e.g. `HEIC`.
    pub original_label: String,
    pub original_size: String,
    /// Upper-cased target token, e.g. `WEBP`.
    pub converted_label: String,
    pub converted_size: String,
    pub attached_name: String,
    pub width: u32,
    pub height: u32,
}

impl ConversionPreview {
    fn new(file: &SelectedFile, result: &ConversionResult, attached_name: String) -> Self {
        let (width, height) = result.dimensions();
        Self {
            original_name: file.name().to_string(),
            original_label: file_extension(file.name())
                .unwrap_or_default()
                .to_uppercase(),
            original_size: human_file_size(file.size()),
            converted_label: result.target.token().to_uppercase(),
            converted_size: human_file_size(result.size()),
            attached_name,
            width,
            height,
        }
    }
}

#[derive(Debug)]
pub enum FlowOutcome {
    /// The converted file is now installed on the control.
    Applied {
        preview: ConversionPreview,
        result: ConversionResult,
    },
    /// A newer conversion started on the same control; nothing was installed.
    Superseded,
}

#[derive(Clone, Default)]
pub struct ConversionFlow {
    converter: Converter,
}

impl ConversionFlow {
    pub fn new(converter: Converter) -> Self {
        Self { converter }
    }

    /// Run a selected file through the control's policy and current format
    /// and quality. Only the most recent run on a control installs its result.
    pub async fn run(&self, input: &FileInput, file: SelectedFile) -> Result<FlowOutcome, FlowError> {
        let token = input.begin();
        let target = input.target();

        let mime_type = validate(&file, &input.policy()).await?;
        tracing::debug!(file = %file.name(), mimetype = %mime_type, "File accepted");

        let request = ConversionRequest::new(file, target, input.quality());
        let result = self.converter.convert(&request).await?;

        let collection = attach(&request.file, result.bytes.clone(), target);
        let attached_name = collection
            .first()
            .map(|f| f.name.clone())
            .unwrap_or_default();

        if !input.install(token, collection).await {
            return Ok(FlowOutcome::Superseded);
        }

        Ok(FlowOutcome::Applied {
            preview: ConversionPreview::new(&request.file, &result, attached_name),
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::ImageCompressor;
    use crate::traits::RasterDecoder;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use pixconv_core::{MimeType, Quality, TargetFormat};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_image(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    /// Decodes normally but stalls on images wider than `slow_width`.
    struct StallingDecoder {
        slow_width: u32,
    }

    impl RasterDecoder for StallingDecoder {
        fn decode(&self, data: &[u8]) -> Result<DynamicImage, anyhow::Error> {
            let img = image::load_from_memory(data)?;
            if img.width() > self.slow_width {
                std::thread::sleep(Duration::from_millis(300));
            }
            Ok(img)
        }
    }

    #[tokio::test]
    async fn test_run_installs_converted_file() {
        let mut input = FileInput::new("images", 5_000_000);
        input.select_target(TargetFormat::WebP);
        input.set_quality(Quality::new(0.8));

        let file = SelectedFile::from_bytes("holiday.png", create_test_image(40, 30));
        let outcome = ConversionFlow::default().run(&input, file).await.unwrap();

        let FlowOutcome::Applied { preview, result } = outcome else {
            panic!("expected the conversion to be applied");
        };
        assert_eq!((preview.width, preview.height), (40, 30));
        assert_eq!(preview.original_label, "PNG");
        assert_eq!(preview.converted_label, "WEBP");
        assert!(preview.attached_name.starts_with("holiday-"));
        assert!(preview.attached_name.ends_with(".webp"));
        assert_eq!(result.target, TargetFormat::WebP);

        let files = input.files().await;
        assert_eq!(files.len(), 1);
        assert_eq!(files.first().unwrap().mime_type, MimeType::WebP);
        assert_eq!(files.first().unwrap().name, preview.attached_name);
    }

    #[tokio::test]
    async fn test_rejected_file_installs_nothing() {
        let input = FileInput::new("images", 5_000_000).with_accept("image/jpeg");
        let file = SelectedFile::from_bytes("holiday.jpg", create_test_image(4, 4));

        let err = ConversionFlow::default().run(&input, file).await.unwrap_err();
        assert!(matches!(
            err,
            FlowError::Rejected(Rejection::UnsupportedType {
                detected: MimeType::Png,
                ..
            })
        ));
        assert!(matches!(AppError::from(err), AppError::UnsupportedType(_)));
        assert!(input.files().await.is_empty());
    }

    #[tokio::test]
    async fn test_superseded_flow_never_installs() {
        let converter = Converter::new(
            Arc::new(StallingDecoder { slow_width: 50 }),
            Arc::new(ImageCompressor),
        );
        let flow = ConversionFlow::new(converter);
        let mut input = FileInput::new("images", 5_000_000);
        input.select_target(TargetFormat::Png);
        let input = Arc::new(input);

        let slow = {
            let flow = flow.clone();
            let input = Arc::clone(&input);
            tokio::spawn(async move {
                let file = SelectedFile::from_bytes("slow.png", create_test_image(64, 64));
                flow.run(&input, file).await
            })
        };

        // Let the slow flow take its token and start decoding
        tokio::time::sleep(Duration::from_millis(50)).await;

        let fast = flow
            .run(
                &input,
                SelectedFile::from_bytes("fast.png", create_test_image(8, 8)),
            )
            .await
            .unwrap();
        assert!(matches!(fast, FlowOutcome::Applied { .. }));

        let slow = slow.await.unwrap().unwrap();
        assert!(matches!(slow, FlowOutcome::Superseded));

        let files = input.files().await;
        assert_eq!(files.len(), 1);
        assert!(files.first().unwrap().name.starts_with("fast-"));
    }
}

//! File-selection control state owned by the presentation layer.
//!
//! A `FileInput` holds what a control declares (accept list, size limit), the
//! format and quality picked for it, and the collection that will be submitted.
//! Each conversion takes a [`SequenceToken`]; only the latest token may install
//! its result, so a slow earlier conversion never overwrites a newer one.

use std::sync::atomic::{AtomicU64, Ordering};

use pixconv_core::constants::DEFAULT_ALLOWED_FORMATS;
use pixconv_core::models::policy::parse_accept_list;
use pixconv_core::{FileCollection, MimeType, Quality, TargetFormat, ValidationPolicy};
use tokio::sync::Mutex;

/// Identifies one conversion started on a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SequenceToken(u64);

#[derive(Debug)]
pub struct FileInput {
    name: String,
    accept: Option<String>,
    max_bytes: u64,
    target: TargetFormat,
    default_quality: Quality,
    quality: Quality,
    files: Mutex<FileCollection>,
    sequence: AtomicU64,
}

impl FileInput {
    pub fn new(name: impl Into<String>, max_bytes: u64) -> Self {
        Self {
            name: name.into(),
            accept: None,
            max_bytes,
            target: TargetFormat::Jpeg,
            default_quality: Quality::default(),
            quality: Quality::default(),
            files: Mutex::new(FileCollection::new()),
            sequence: AtomicU64::new(0),
        }
    }

    /// Declare an accept list such as `"image/png, image/jpeg"`.
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Quality selected initially and restored whenever the format changes.
    pub fn with_default_quality(mut self, quality: Quality) -> Self {
        self.default_quality = quality;
        self.quality = quality;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Add a mimetype to the accept list. A control without an explicit list
    /// gets the default formats plus the new one.
    pub fn allow_format(&mut self, mime_type: MimeType) {
        let Some(subtype) = mime_type.subtype() else {
            return;
        };

        let current = match self.accept.as_deref() {
            Some(accept) => accept.to_string(),
            None => DEFAULT_ALLOWED_FORMATS
                .iter()
                .map(|f| format!("image/{}", f))
                .collect::<Vec<_>>()
                .join(", "),
        };

        if parse_accept_list(&current).iter().any(|s| s == subtype) {
            self.accept = Some(current);
            return;
        }

        let widened = format!("{}, {}", current, mime_type.as_str());
        tracing::debug!(control = %self.name, accept = %widened, "Widened accept list");
        self.accept = Some(widened);
    }

    /// Policy selected files are validated against.
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy::from_accept(self.accept(), self.max_bytes)
    }

    pub fn target(&self) -> TargetFormat {
        self.target
    }

    /// Changing the format resets quality to the control's default.
    pub fn select_target(&mut self, target: TargetFormat) {
        self.target = target;
        self.quality = self.default_quality;
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Quality only applies to lossy targets.
    pub fn quality_editable(&self) -> bool {
        !self.target.is_lossless()
    }

    /// Returns `false` and leaves the setting alone for lossless targets.
    pub fn set_quality(&mut self, quality: Quality) -> bool {
        if !self.quality_editable() {
            return false;
        }
        self.quality = quality;
        true
    }

    /// Start a conversion. Any conversion started earlier becomes stale.
    pub fn begin(&self) -> SequenceToken {
        SequenceToken(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: SequenceToken) -> bool {
        self.sequence.load(Ordering::SeqCst) == token.0
    }

    /// Install a converted collection if `token` is still the latest.
    pub async fn install(&self, token: SequenceToken, collection: FileCollection) -> bool {
        let mut files = self.files.lock().await;
        if !self.is_current(token) {
            tracing::debug!(control = %self.name, "Discarded stale conversion");
            return false;
        }
        *files = collection;
        true
    }

    /// Files currently installed on the control.
    pub async fn files(&self) -> FileCollection {
        self.files.lock().await.clone()
    }

    /// Drop the installed files and invalidate in-flight conversions, as when
    /// the user opens the picker again.
    pub async fn reset(&self) {
        let mut files = self.files.lock().await;
        self.sequence.fetch_add(1, Ordering::SeqCst);
        *files = FileCollection::new();
    }
}

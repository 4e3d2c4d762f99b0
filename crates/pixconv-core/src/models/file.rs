//! Converted files as they are installed back on a file-selection control.

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::format::MimeType;

/// A file synthesized from converted bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachedFile {
    pub name: String,
    pub mime_type: MimeType,
    pub bytes: Bytes,
    pub last_modified: DateTime<Utc>,
}

impl AttachedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Multi-file container assigned to a file-selection control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileCollection {
    files: Vec<AttachedFile>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: AttachedFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn first(&self) -> Option<&AttachedFile> {
        self.files.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttachedFile> {
        self.files.iter()
    }
}

impl From<AttachedFile> for FileCollection {
    fn from(file: AttachedFile) -> Self {
        Self { files: vec![file] }
    }
}

impl IntoIterator for FileCollection {
    type Item = AttachedFile;
    type IntoIter = std::vec::IntoIter<AttachedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileCollection {
    type Item = &'a AttachedFile;
    type IntoIter = std::slice::Iter<'a, AttachedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

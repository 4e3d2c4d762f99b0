//! Selected files and the byte sources behind them.
//!
//! A `SelectedFile` carries the name and declared size the user picked plus a
//! handle that can read its contents, either fully or just the leading bytes.

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Where a selected file's bytes come from.
#[async_trait]
pub trait ByteSource: Send + Sync + fmt::Debug {
    /// Whether the environment can read this source as binary at all.
    fn supports_binary_read(&self) -> bool {
        true
    }

    /// Read at most `len` leading bytes. Shorter sources return what they have.
    async fn read_head(&self, len: usize) -> io::Result<Bytes>;

    async fn read_all(&self) -> io::Result<Bytes>;
}

/// In-memory bytes, e.g. a multipart field or a test fixture.
#[derive(Clone, Debug)]
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }
}

#[async_trait]
impl ByteSource for MemorySource {
    async fn read_head(&self, len: usize) -> io::Result<Bytes> {
        Ok(self.data.slice(..len.min(self.data.len())))
    }

    async fn read_all(&self) -> io::Result<Bytes> {
        Ok(self.data.clone())
    }
}

/// A file on local disk, read lazily.
#[derive(Clone, Debug)]
pub struct DiskSource {
    path: PathBuf,
}

impl DiskSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ByteSource for DiskSource {
    async fn read_head(&self, len: usize) -> io::Result<Bytes> {
        let file = tokio::fs::File::open(&self.path).await?;
        let mut buffer = Vec::with_capacity(len);
        file.take(len as u64).read_to_end(&mut buffer).await?;
        Ok(Bytes::from(buffer))
    }

    async fn read_all(&self) -> io::Result<Bytes> {
        tokio::fs::read(&self.path).await.map(Bytes::from)
    }
}

/// A file the user selected. Cheap to clone.
#[derive(Clone, Debug)]
pub struct SelectedFile {
    name: String,
    size: u64,
    source: Arc<dyn ByteSource>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, size: u64, source: Arc<dyn ByteSource>) -> Self {
        Self {
            name: name.into(),
            size,
            source,
        }
    }

    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(name, size, Arc::new(MemorySource::new(data)))
    }

    /// Select a file on disk. The name is the path's final component.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(
            name,
            metadata.len(),
            Arc::new(DiskSource::new(path)),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn source(&self) -> &dyn ByteSource {
        self.source.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_memory_source_head_is_bounded() {
        let file = SelectedFile::from_bytes("a.bin", vec![1u8, 2, 3, 4, 5]);
        assert_eq!(file.size(), 5);
        assert_eq!(file.source().read_head(3).await.unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(file.source().read_head(12).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_disk_source_reads_head_and_all() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789abcdef").unwrap();

        let file = SelectedFile::from_path(tmp.path()).await.unwrap();
        assert_eq!(file.size(), 16);
        assert_eq!(file.source().read_head(4).await.unwrap().as_ref(), b"0123");
        assert_eq!(file.source().read_all().await.unwrap().len(), 16);
    }

    #[tokio::test]
    async fn test_from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SelectedFile::from_path(dir.path()).await.is_err());
    }
}

//! File-read capability consumed by import.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

/// One user-selected file whose full text can be read asynchronously.
pub trait ImportSource: Send + Sync {
    /// Display name used in logs and errors.
    fn name(&self) -> &str;

    /// Reads the whole file as UTF-8 text.
    fn read_text<'a>(&'a self) -> Pin<Box<dyn Future<Output = io::Result<String>> + Send + 'a>>;
}

/// File on the local filesystem, read through tokio.
#[derive(Debug, Clone)]
pub struct FsSource {
    path: PathBuf,
    name: String,
}

impl FsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl ImportSource for FsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text<'a>(&'a self) -> Pin<Box<dyn Future<Output = io::Result<String>> + Send + 'a>> {
        Box::pin(async move { tokio::fs::read_to_string(&self.path).await })
    }
}

/// In-memory file content, for tests and embedded callers.
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    content: Vec<u8>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

impl ImportSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text<'a>(&'a self) -> Pin<Box<dyn Future<Output = io::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            String::from_utf8(self.content.clone())
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FsSource, ImportSource, MemorySource};
    use std::io;

    #[tokio::test]
    async fn memory_source_rejects_invalid_utf8() {
        let source = MemorySource::new("bad.json", vec![0xff, 0xfe]);
        let err = source.read_text().await.expect_err("invalid utf-8");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn fs_source_reads_file_and_reports_missing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("tree.json");
        std::fs::write(&path, "[]").expect("write fixture");

        assert_eq!(FsSource::new(&path).read_text().await.expect("read"), "[]");

        let missing = FsSource::new(dir.path().join("absent.json"));
        let err = missing.read_text().await.expect_err("missing file");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}

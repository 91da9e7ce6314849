//! File-based status source.
//!
//! Reads a status response (the same JSON the HTTP endpoint serves) from a
//! file on every fetch. Handy for dry runs and for backends that publish
//! their status by writing a file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pingwatch_adapters::{parse_response, AdapterError};
use pingwatch_types::Snapshot;

use super::StatusFetcher;

/// A status source that reads status responses from a JSON file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatusFetcher for FileSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot, AdapterError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_response(&content)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingwatch_adapters::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_file_source_reads_snapshot() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"status":"success","accounts":[{{"id":1,"name":"Primary","status":"failed"}}]}}"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let snapshot = source.fetch_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.counts.failed, 1);
        assert!(source.description().starts_with("file: "));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/pingwatch/status.json");
        let err = source.fetch_snapshot().await.unwrap_err();
        assert!(matches!(err, AdapterError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_file_source_failure_response() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"status":"error","message":"db offline"}}"#).unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch_snapshot().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }
}

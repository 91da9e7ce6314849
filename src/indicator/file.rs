//! File-based indicator output.
//!
//! Writes the indicator state as pretty JSON, overwriting the file on every
//! refresh. Status bars and dashboards can watch the file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pingwatch_types::Snapshot;

use super::{IndicatorError, IndicatorRenderer, IndicatorState};

/// Indicator renderer that writes [`IndicatorState`] to a JSON file.
#[derive(Debug, Clone)]
pub struct FileIndicator {
    path: PathBuf,
}

impl FileIndicator {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IndicatorRenderer for FileIndicator {
    async fn refresh(&self, snapshot: &Snapshot) -> Result<(), IndicatorError> {
        let state = IndicatorState::from_snapshot(snapshot);
        let json = serde_json::to_string_pretty(&state)?;

        // Write to a sibling and rename so readers never see a partial file
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_writes_indicator_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("indicators.json");
        let indicator = FileIndicator::new(&path);

        let snapshot = Snapshot::builder()
            .entity(1, "connected", |e| e.name("Primary"))
            .entity(2, "failed", |e| e.name("Hedge"))
            .build();

        indicator.refresh(&snapshot).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["summary"]["text"], "1/2 1 Disconnected");
        assert_eq!(written["summary"]["tone"], "error");
        assert_eq!(written["badges"][1]["title"], "Hedge: failed");
        assert_eq!(written["badges"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let indicator = FileIndicator::new(dir.path().join("nope").join("indicators.json"));

        let snapshot = Snapshot::builder().entity(1, "connected", |e| e).build();
        let err = indicator.refresh(&snapshot).await.unwrap_err();
        assert!(matches!(err, IndicatorError::Io(_)));
    }
}

//! Status source abstraction.
//!
//! This module provides the traits the monitor uses to obtain snapshots and
//! to request out-of-band refreshes, together with the stock sources:
//! an HTTP backend and a JSON file.

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use async_trait::async_trait;
use pingwatch_adapters::AdapterError;
use pingwatch_types::{EntityId, Snapshot};

/// Trait for obtaining status snapshots.
///
/// Implementations talk to a backend (HTTP, file, channel, ...) and return
/// the current status of every monitored entity. Errors are reported, not
/// retried; the monitor simply tries again on its next tick.
///
/// # Example
///
/// ```no_run
/// use pingwatch::{FileSource, StatusFetcher};
///
/// # tokio_test::block_on(async {
/// let source = FileSource::new("status.json");
/// if let Ok(snapshot) = source.fetch_snapshot().await {
///     println!("Got {} accounts", snapshot.len());
/// }
/// # });
/// ```
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetch the latest snapshot.
    async fn fetch_snapshot(&self) -> Result<Snapshot, AdapterError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used in log messages.
    fn description(&self) -> &str;
}

/// Trait for asking the backend to re-check a single entity.
#[async_trait]
pub trait EntityRefresher: Send + Sync {
    async fn request_refresh(&self, id: &EntityId) -> Result<(), AdapterError>;
}

//! HTTP status source backed by [`HttpStatusClient`].

use async_trait::async_trait;
use pingwatch_adapters::http::HttpStatusClient;
use pingwatch_adapters::AdapterError;
use pingwatch_types::{EntityId, Snapshot};

use super::{EntityRefresher, StatusFetcher};

/// Status source polling an HTTP backend.
///
/// Serves as both the [`StatusFetcher`] and the [`EntityRefresher`] of a
/// monitor.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: HttpStatusClient,
    description: String,
}

impl HttpSource {
    pub fn new(client: HttpStatusClient) -> Self {
        let description = format!("http: {}", client.status_url());
        Self {
            client,
            description,
        }
    }
}

#[async_trait]
impl StatusFetcher for HttpSource {
    async fn fetch_snapshot(&self) -> Result<Snapshot, AdapterError> {
        self.client.fetch().await
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[async_trait]
impl EntityRefresher for HttpSource {
    async fn request_refresh(&self, id: &EntityId) -> Result<(), AdapterError> {
        self.client.refresh(id).await
    }
}

//! HTTP status client.
//!
//! Polls the backend's JSON status route and posts per-account refresh
//! requests. Authentication is whatever the deployment needs: HTTP basic
//! credentials, extra headers (e.g. a CSRF token or session cookie), or both.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pingwatch_adapters::http::HttpStatusClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpStatusClient::builder()
//!         .endpoint("http://localhost:5000")
//!         .header("X-CSRFToken", "token-from-session")
//!         .build()?;
//!
//!     let snapshot = client.fetch().await?;
//!
//!     for account in snapshot.iter() {
//!         println!("{}: {}", account.display_name(), account.status);
//!     }
//!
//!     client.refresh(&1.into()).await?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response, StatusCode};

use pingwatch_types::{EntityId, Snapshot};

use crate::{parse_response, AdapterError};

/// Default status route, relative to the endpoint.
pub const DEFAULT_STATUS_PATH: &str = "/api/ping-status";

/// Default force-refresh route; `{id}` is replaced with the entity id.
pub const DEFAULT_REFRESH_PATH: &str = "/api/accounts/{id}/ping";

/// HTTP client for a status backend.
#[derive(Debug, Clone)]
pub struct HttpStatusClient {
    client: Client,
    endpoint: String,
    status_path: String,
    refresh_path: String,
    username: Option<String>,
    password: Option<String>,
}

impl HttpStatusClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> HttpStatusClientBuilder {
        HttpStatusClientBuilder::default()
    }

    /// Fetch the current status snapshot.
    pub async fn fetch(&self) -> Result<Snapshot, AdapterError> {
        let request = self
            .client
            .get(self.status_url())
            .header(ACCEPT, "application/json");

        let response = self.authorize(request).send().await?;
        let response = check_status(response, "status route")?;

        let body = response.text().await?;
        parse_response(&body)
    }

    /// Ask the backend to re-check a single entity right away.
    ///
    /// The new status becomes visible on the next [`fetch`](Self::fetch).
    pub async fn refresh(&self, id: &EntityId) -> Result<(), AdapterError> {
        let request = self.client.post(self.refresh_url(id)?);

        let response = self.authorize(request).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AdapterError::Http(format!("Account '{}' not found", id)));
        }

        check_status(response, "refresh route")?;
        Ok(())
    }

    /// Full URL of the status route.
    pub fn status_url(&self) -> String {
        join(&self.endpoint, &self.status_path)
    }

    /// Full URL of the refresh route for an entity.
    ///
    /// Fails for ids that cannot stand as a path segment (`""`, `"."`,
    /// `".."`), since URL normalization would turn them into another route.
    pub fn refresh_url(&self, id: &EntityId) -> Result<String, AdapterError> {
        let path = self.refresh_path.replace("{id}", &path_segment(id)?);
        Ok(join(&self.endpoint, &path))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(username) => request.basic_auth(username, self.password.as_ref()),
            None => request,
        }
    }
}

fn check_status(response: Response, route: &str) -> Result<Response, AdapterError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AdapterError::Auth(format!("{} returned {}", route, status)));
    }

    if !status.is_success() {
        return Err(AdapterError::Http(format!(
            "{} returned status {}",
            route, status
        )));
    }

    Ok(response)
}

/// Builder for HttpStatusClient.
#[derive(Debug, Default)]
pub struct HttpStatusClientBuilder {
    endpoint: Option<String>,
    status_path: Option<String>,
    refresh_path: Option<String>,
    username: Option<String>,
    password: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl HttpStatusClientBuilder {
    /// Set the backend base URL (e.g., "http://localhost:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the status route (default: "/api/ping-status").
    pub fn status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = Some(path.into());
        self
    }

    /// Set the refresh route template (default: "/api/accounts/{id}/ping").
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Set the username and password for HTTP basic authentication.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HttpStatusClient, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AdapterError::Http(format!("invalid header name '{}': {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| {
                    AdapterError::Http(format!("invalid value for '{}': {}", name.as_str(), e))
                })?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(HttpStatusClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:5000".to_string()),
            status_path: self
                .status_path
                .unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string()),
            refresh_path: self
                .refresh_path
                .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string()),
            username: self.username,
            password: self.password,
        })
    }
}

fn join(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// Percent-encode an id for use as a single path segment
fn path_segment(id: &EntityId) -> Result<String, AdapterError> {
    let raw = id.to_string();
    if matches!(raw.as_str(), "" | "." | "..") {
        return Err(AdapterError::Unsupported(format!(
            "Account id '{}' cannot be used in a URL path",
            raw
        )));
    }
    Ok(urlencoding::encode(&raw).into_owned())
}

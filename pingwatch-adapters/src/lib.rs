//! # pingwatch-adapters
//!
//! Status fetchers for pingwatch.
//!
//! This crate knows how a status backend talks: it parses the JSON status
//! response into a [`Snapshot`], classifies what can go wrong while doing so,
//! and (with the `http` feature) provides a ready-to-use HTTP client for the
//! status and force-refresh endpoints.
//!
//! ## Supported Backends
//!
//! - **HTTP** (`http` feature) - Polls a JSON status route and posts
//!   per-account refresh requests
//! - **Raw JSON** (always available) - [`response::parse_response`] for
//!   payloads obtained any other way (files, message buses, tests)
//!
//! ## Quick Start (HTTP)
//!
//! ```rust,no_run
//! # #[cfg(feature = "http")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use pingwatch_adapters::http::HttpStatusClient;
//!
//! let client = HttpStatusClient::builder()
//!     .endpoint("http://localhost:5000")
//!     .build()?;
//!
//! let snapshot = client.fetch().await?;
//! println!("{} accounts, {} connected", snapshot.len(), snapshot.counts.connected);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod response;

#[cfg(feature = "http")]
pub mod http;

pub use error::{AdapterError, ErrorKind};
pub use response::{parse_response, StatusResponse};

// Re-export types for convenience
pub use pingwatch_types::{EntityId, EntityStatus, Snapshot, StatusCounts, StatusValue};

//! # pingwatch-types
//!
//! Core types for account connection monitoring. This crate defines the data
//! model shared by the status fetchers, the monitor and the indicator
//! renderers of pingwatch.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable the `serde` feature to read backend payloads
//! - **Open status domain**: Unknown status strings survive a round trip untouched
//! - **Ergonomic builders**: Fluent API for constructing snapshots in tests and adapters
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use pingwatch_types::{Snapshot, StatusValue};
//!
//! let snapshot = Snapshot::builder()
//!     .entity(1, StatusValue::Connected, |e| e.name("Primary"))
//!     .entity(2, "failed", |e| e.broker("zerodha"))
//!     .build();
//!
//! assert_eq!(snapshot.len(), 2);
//! assert_eq!(snapshot.counts.connected, 1);
//! assert_eq!(snapshot.counts.failed, 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod snapshot;
mod status;

pub use snapshot::*;
pub use status::*;

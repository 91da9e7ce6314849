//! # pingwatch
//!
//! A background monitor that polls account connection status and notifies
//! when an account's connection state changes.
//!
//! The monitor periodically fetches a snapshot of every monitored account,
//! compares it with the last status it recorded for each, and raises a
//! notification for transitions that matter: degradation always, recovery
//! only when the account was previously in a known problem state. After
//! every successful poll a small indicator (log line or JSON file) is
//! refreshed with the whole snapshot.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        StatusMonitor                         │
//! │  ┌─────────┐    ┌───────────┐    ┌──────────┐    ┌────────┐  │
//! │  │ source  │───▶│   table   │───▶│ classify │───▶│ notify │  │
//! │  │ (fetch) │    │  (diff)   │    │ (intent) │    │        │  │
//! │  └────▲────┘    └─────┬─────┘    └──────────┘    └────────┘  │
//! │       │               │                                      │
//! │  schedule /           ▼                                      │
//! │  force_check    ┌───────────┐                                │
//! │                 │ indicator │◀── LogIndicator | FileIndicator│
//! │                 └───────────┘                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`monitor`]**: [`StatusMonitor`] lifecycle (start/pause/resume/stop),
//!   polling, the [`StatusTable`] and the [`classify`] rules
//! - **[`source`]**: [`StatusFetcher`] and [`EntityRefresher`] traits with
//!   HTTP and file implementations
//! - **[`notify`]**: [`Notifier`] trait with log and desktop notifiers
//! - **[`indicator`]**: [`IndicatorRenderer`] trait with log and file renderers
//! - **[`config`]**, **[`logging`]**, **[`duration`]**: ambient plumbing
//!   for the `pingwatch` binary
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a status backend every 10 seconds
//! pingwatch --endpoint http://localhost:5000
//!
//! # Poll a JSON file, write indicator state next to it
//! pingwatch --file status.json --indicator-file indicator.json
//!
//! # Ask the backend to re-check account 7
//! pingwatch --endpoint http://localhost:5000 --force-check 7
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use pingwatch::{FileSource, LogIndicator, StatusMonitor};
//!
//! # tokio_test::block_on(async {
//! let monitor = StatusMonitor::builder(Arc::new(FileSource::new("status.json")))
//!     .indicator(Arc::new(LogIndicator))
//!     .build();
//!
//! let outcome = monitor.poll().await;
//! println!("{:?}", outcome);
//! # });
//! ```

pub mod config;
pub mod duration;
pub mod indicator;
pub mod logging;
pub mod monitor;
pub mod notify;
pub mod source;
#[cfg(unix)]
pub mod visibility;

// Re-export main types for convenience
pub use indicator::{FileIndicator, IndicatorError, IndicatorRenderer, IndicatorState, LogIndicator};
pub use monitor::{
    classify, MonitorState, NotificationIntent, PollOutcome, PollReport, StatusMonitor,
    StatusMonitorBuilder, StatusTable, Transition, Visibility,
};
pub use notify::{DesktopNotifier, LogNotifier, Notifier, Severity};
pub use source::{EntityRefresher, FileSource, HttpSource, StatusFetcher};

pub use pingwatch_adapters::{AdapterError, ErrorKind};
pub use pingwatch_types::{EntityId, EntityStatus, Snapshot, StatusCounts, StatusValue};

//! Signal-driven visibility changes.
//!
//! A running daemon has no window to hide, so the session manager (or a
//! user) signals it instead: `SIGUSR1` marks the session hidden and pauses
//! polling, `SIGUSR2` marks it visible and resumes.

use std::io;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::monitor::{StatusMonitor, Visibility};

/// Listens for visibility signals.
#[derive(Debug)]
pub struct VisibilityObserver {
    hidden: Signal,
    visible: Signal,
}

impl VisibilityObserver {
    /// Install the signal handlers. Must be called inside a tokio runtime.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            hidden: signal(SignalKind::user_defined1())?,
            visible: signal(SignalKind::user_defined2())?,
        })
    }

    /// Wait for the next visibility change.
    ///
    /// Returns `None` once the signal streams are closed.
    pub async fn next(&mut self) -> Option<Visibility> {
        tokio::select! {
            received = self.hidden.recv() => received.map(|_| Visibility::Hidden),
            received = self.visible.recv() => received.map(|_| Visibility::Visible),
        }
    }

    /// Forward every visibility change to `monitor` on a background task.
    pub fn spawn(mut self, monitor: StatusMonitor) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(visibility) = self.next().await {
                info!(event = "visibility.changed", visibility = ?visibility);
                monitor.set_visibility(visibility).await;
            }
            debug!(event = "visibility.observer_stopped");
        })
    }
}

//! Status indicators refreshed after every successful poll.
//!
//! An indicator is a compact, glanceable rendering of the latest snapshot:
//! one summary line for all accounts plus a badge per account. The monitor
//! does not care how (or whether) indicators are drawn; it hands each
//! snapshot to an [`IndicatorRenderer`] and logs any failure.
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot ──▶ IndicatorState::from_snapshot() ──▶ LogIndicator  (log line)
//!                                              └─▶ FileIndicator (JSON file)
//! ```

mod file;

pub use file::FileIndicator;

use async_trait::async_trait;
use pingwatch_types::{EntityId, Snapshot, StatusValue};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors raised while rendering indicators.
#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("Failed to write indicator state: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize indicator state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Visual tone of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Error,
    Neutral,
}

impl Tone {
    /// Tone of a per-account badge.
    pub fn for_status(status: &StatusValue) -> Self {
        match status {
            StatusValue::Connected => Tone::Success,
            StatusValue::Failed => Tone::Error,
            StatusValue::Error => Tone::Warning,
            _ => Tone::Neutral,
        }
    }
}

/// The aggregate line, e.g. `3/4 1 Disconnected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub text: String,
    pub tone: Tone,
}

/// Per-account badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub id: EntityId,
    pub tone: Tone,
    /// Hover text, `{name}: {status}`.
    pub title: String,
}

/// Everything an indicator needs to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorState {
    pub timestamp_ms: u64,
    pub summary: Summary,
    pub badges: Vec<Badge>,
}

impl IndicatorState {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let counts = &snapshot.counts;
        let unhealthy = counts.unhealthy();

        let (label, tone) = if unhealthy > 0 {
            (format!("{} Disconnected", unhealthy), Tone::Error)
        } else if counts.connected == 0 {
            ("No Accounts".to_string(), Tone::Warning)
        } else {
            ("All Connected".to_string(), Tone::Success)
        };

        let badges = snapshot
            .iter()
            .map(|entity| Badge {
                id: entity.id.clone(),
                tone: Tone::for_status(&entity.status),
                title: format!("{}: {}", entity.display_name(), entity.status),
            })
            .collect();

        Self {
            timestamp_ms: snapshot.timestamp_ms,
            summary: Summary {
                text: format!("{}/{} {}", counts.connected, counts.total, label),
                tone,
            },
            badges,
        }
    }
}

/// Post-poll hook receiving the full snapshot.
#[async_trait]
pub trait IndicatorRenderer: Send + Sync {
    async fn refresh(&self, snapshot: &Snapshot) -> Result<(), IndicatorError>;
}

/// Renders the summary line to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogIndicator;

#[async_trait]
impl IndicatorRenderer for LogIndicator {
    async fn refresh(&self, snapshot: &Snapshot) -> Result<(), IndicatorError> {
        let state = IndicatorState::from_snapshot(snapshot);
        info!(event = "indicator.log.refreshed", summary = %state.summary.text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_connected() {
        let snapshot = Snapshot::builder()
            .entity(1, "connected", |e| e.name("Primary"))
            .entity(2, "connected", |e| e.name("Hedge"))
            .build();

        let state = IndicatorState::from_snapshot(&snapshot);
        assert_eq!(state.summary.text, "2/2 All Connected");
        assert_eq!(state.summary.tone, Tone::Success);
    }

    #[test]
    fn test_failures_reported_as_disconnected() {
        let snapshot = Snapshot::builder()
            .entity(1, "connected", |e| e)
            .entity(2, "failed", |e| e)
            .entity(3, "error", |e| e)
            .build();

        let state = IndicatorState::from_snapshot(&snapshot);
        assert_eq!(state.summary.text, "1/3 2 Disconnected");
        assert_eq!(state.summary.tone, Tone::Error);
    }

    #[test]
    fn test_no_connected_accounts() {
        let snapshot = Snapshot::builder()
            .entity(1, "disconnected", |e| e)
            .build();

        let state = IndicatorState::from_snapshot(&snapshot);
        assert_eq!(state.summary.text, "0/1 No Accounts");
        assert_eq!(state.summary.tone, Tone::Warning);

        let empty = IndicatorState::from_snapshot(&Snapshot::builder().build());
        assert_eq!(empty.summary.text, "0/0 No Accounts");
    }

    #[test]
    fn test_badges() {
        let snapshot = Snapshot::builder()
            .entity(1, "connected", |e| e.name("Primary"))
            .entity(2, "error", |e| e.broker("dhan"))
            .entity(3, "maintenance", |e| e)
            .build();

        let state = IndicatorState::from_snapshot(&snapshot);
        let tones: Vec<_> = state.badges.iter().map(|b| b.tone).collect();
        assert_eq!(tones, vec![Tone::Success, Tone::Warning, Tone::Neutral]);
        assert_eq!(state.badges[0].title, "Primary: connected");
        assert_eq!(state.badges[1].title, "dhan: error");
        assert_eq!(state.badges[2].title, "Account 3: maintenance");
    }

    #[tokio::test]
    async fn test_log_indicator() {
        let snapshot = Snapshot::builder().entity(1, "failed", |e| e).build();
        LogIndicator.refresh(&snapshot).await.unwrap();
    }
}

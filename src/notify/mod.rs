//! Notification dispatch.
//!
//! The monitor hands every notification intent to a [`Notifier`]. Notifiers
//! are fire-and-forget: they never report failure back to the monitor, and
//! a failing backend degrades to logging.
//!
//! - [`LogNotifier`]: logs each notification (the default)
//! - [`DesktopNotifier`]: platform desktop notifications, plus logging

mod desktop;

pub use desktop::DesktopNotifier;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
    Info,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Success => "✓",
            Severity::Warning => "⚠",
            Severity::Error => "✗",
            Severity::Info => "ℹ",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders a transient message to the user.
///
/// Implementations must not block for long and must not panic; anything
/// that can fail should be logged and swallowed.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that only writes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(
                event = "notify.log.emitted",
                severity = severity.as_str(),
                notification = message
            ),
            Severity::Warning => warn!(
                event = "notify.log.emitted",
                severity = severity.as_str(),
                notification = message
            ),
            Severity::Success | Severity::Info => info!(
                event = "notify.log.emitted",
                severity = severity.as_str(),
                notification = message
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use parking_lot::Mutex;

    use super::{Notifier, Severity};

    /// Notifier that remembers everything it was asked to show.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        sent: Mutex<Vec<(String, Severity)>>,
    }

    impl RecordingNotifier {
        pub fn sent(&self) -> Vec<(String, Severity)> {
            self.sent.lock().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, severity: Severity) {
            self.sent.lock().push((message.to_string(), severity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Success.to_string(), "success");
        assert_eq!(Severity::Warning.as_str(), "warning");
        assert_eq!(Severity::Error.symbol(), "✗");
    }

    #[test]
    fn test_severity_from_json() {
        let severity: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(severity, Severity::Error);
    }

    #[test]
    fn test_log_notifier_does_not_panic() {
        let notifier = LogNotifier;
        for severity in [
            Severity::Success,
            Severity::Warning,
            Severity::Error,
            Severity::Info,
        ] {
            notifier.notify("Connection restored: Primary", severity);
        }
    }
}

//! Transition classification.
//!
//! Decides whether a status change deserves a notification, and which one.
//! Degradation always notifies; recovery only notifies when the entity was
//! previously in a known problem state, so flicker between unrelated values
//! stays quiet.

use pingwatch_types::StatusValue;
use serde::Serialize;

use crate::notify::Severity;

/// A notification the monitor wants shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationIntent {
    pub message: String,
    pub severity: Severity,
}

impl NotificationIntent {
    fn new(severity: Severity, message: String) -> Self {
        Self { message, severity }
    }
}

/// Classify a transition of the entity called `name` from `old` to `new`.
///
/// | new          | old                               | intent                          |
/// |--------------|-----------------------------------|---------------------------------|
/// | connected    | failed, error or disconnected     | success `Connection restored`   |
/// | connected    | anything else                     | none                            |
/// | failed       | any                               | error `Connection failed`       |
/// | error        | any                               | warning `Connection error`      |
/// | disconnected | any                               | warning `Disconnected`          |
/// | other, null  | any                               | none                            |
pub fn classify(name: &str, old: &StatusValue, new: &StatusValue) -> Option<NotificationIntent> {
    match new {
        StatusValue::Connected if old.is_problem() => Some(NotificationIntent::new(
            Severity::Success,
            format!("Connection restored: {}", name),
        )),
        StatusValue::Connected => None,
        StatusValue::Failed => Some(NotificationIntent::new(
            Severity::Error,
            format!("Connection failed: {}", name),
        )),
        StatusValue::Error => Some(NotificationIntent::new(
            Severity::Warning,
            format!("Connection error: {}", name),
        )),
        StatusValue::Disconnected => Some(NotificationIntent::new(
            Severity::Warning,
            format!("Disconnected: {}", name),
        )),
        StatusValue::Other(_) | StatusValue::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(s: &str) -> StatusValue {
        StatusValue::from(s)
    }

    #[test]
    fn test_recovery_from_problem_states() {
        for old in ["failed", "error", "disconnected"] {
            let intent = classify("Primary", &status(old), &StatusValue::Connected).unwrap();
            assert_eq!(intent.severity, Severity::Success);
            assert_eq!(intent.message, "Connection restored: Primary");
        }
    }

    #[test]
    fn test_connected_from_other_states_is_silent() {
        for old in ["connected", "pending", "unknown", ""] {
            assert_eq!(classify("Primary", &status(old), &StatusValue::Connected), None);
        }
    }

    #[test]
    fn test_degradation_always_notifies() {
        for old in ["connected", "error", "disconnected", "pending"] {
            let intent = classify("Hedge", &status(old), &StatusValue::Failed).unwrap();
            assert_eq!(intent.severity, Severity::Error);
            assert_eq!(intent.message, "Connection failed: Hedge");
        }

        for old in ["connected", "failed", "pending"] {
            let intent = classify("Hedge", &status(old), &StatusValue::Error).unwrap();
            assert_eq!(intent.severity, Severity::Warning);
            assert_eq!(intent.message, "Connection error: Hedge");
        }

        for old in ["connected", "failed", "error"] {
            let intent = classify("Hedge", &status(old), &StatusValue::Disconnected).unwrap();
            assert_eq!(intent.severity, Severity::Warning);
            assert_eq!(intent.message, "Disconnected: Hedge");
        }
    }

    #[test]
    fn test_unrecognised_new_status_is_ignored() {
        for old in ["connected", "failed", "error", "disconnected"] {
            assert_eq!(classify("X", &status(old), &status("maintenance")), None);
            assert_eq!(classify("X", &status(old), &StatusValue::Unknown), None);
        }
    }
}

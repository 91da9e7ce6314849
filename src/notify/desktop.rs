//! Platform-native desktop notifications.
//!
//! Best-effort: failures are logged but never propagate.
//!
//! - macOS: `osascript` (Notification Center)
//! - Linux: `notify-send` (requires libnotify)
//! - Other: log only

use std::process::Output;

use tracing::{debug, warn};

use super::{LogNotifier, Notifier, Severity};

/// A command line ready to be spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NotifyCommand {
    program: &'static str,
    args: Vec<String>,
}

/// Notifier that pops up a desktop notification and logs it.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    /// False when the platform helper is missing; we then only log.
    available: bool,
}

impl DesktopNotifier {
    /// Create a notifier, probing for the platform notification helper.
    pub fn new(app_name: impl Into<String>) -> Self {
        let available = helper_available();
        if !available {
            warn!(
                event = "notify.desktop.unavailable",
                "Desktop notifications unavailable, falling back to log output"
            );
        }
        Self {
            app_name: app_name.into(),
            available,
        }
    }

    /// Whether notifications reach the desktop or only the log.
    pub fn is_available(&self) -> bool {
        self.available
    }

    fn title(&self, severity: Severity) -> String {
        format!("{} {}", severity.symbol(), self.app_name)
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        LogNotifier.notify(message, severity);

        if !self.available {
            return;
        }

        let Some(command) = build_command(&self.title(severity), message, severity) else {
            return;
        };
        spawn(command);
    }
}

#[cfg(target_os = "linux")]
fn helper_available() -> bool {
    match which::which("notify-send") {
        Ok(_) => true,
        Err(which::Error::CannotFindBinaryPath) => {
            debug!(event = "notify.desktop.helper_missing", program = "notify-send");
            false
        }
        Err(e) => {
            warn!(
                event = "notify.desktop.helper_lookup_failed",
                program = "notify-send",
                error = %e
            );
            false
        }
    }
}

#[cfg(target_os = "macos")]
fn helper_available() -> bool {
    true
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn helper_available() -> bool {
    false
}

#[cfg(target_os = "linux")]
fn build_command(title: &str, message: &str, severity: Severity) -> Option<NotifyCommand> {
    let urgency = match severity {
        Severity::Error => "critical",
        Severity::Warning => "normal",
        Severity::Success | Severity::Info => "low",
    };
    Some(NotifyCommand {
        program: "notify-send",
        args: vec![
            "--urgency".to_string(),
            urgency.to_string(),
            title.to_string(),
            message.to_string(),
        ],
    })
}

#[cfg(target_os = "macos")]
fn build_command(title: &str, message: &str, _severity: Severity) -> Option<NotifyCommand> {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        applescript_escape(message),
        applescript_escape(title)
    );
    Some(NotifyCommand {
        program: "osascript",
        args: vec!["-e".to_string(), script],
    })
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn build_command(_title: &str, _message: &str, _severity: Severity) -> Option<NotifyCommand> {
    debug!(event = "notify.desktop.send_skipped", reason = "unsupported platform");
    None
}

#[cfg(any(target_os = "macos", test))]
fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Run the helper without blocking the caller.
///
/// Inside a tokio runtime the helper runs on a spawned task; otherwise it
/// runs inline.
fn spawn(command: NotifyCommand) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                let result = tokio::process::Command::new(command.program)
                    .args(&command.args)
                    .output()
                    .await;
                report(command.program, result);
            });
        }
        Err(_) => {
            let result = std::process::Command::new(command.program)
                .args(&command.args)
                .output();
            report(command.program, result);
        }
    }
}

fn report(program: &str, result: std::io::Result<Output>) {
    match result {
        Ok(output) if output.status.success() => {
            debug!(event = "notify.desktop.send_completed", program = program);
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                event = "notify.desktop.send_failed",
                program = program,
                stderr = %stderr.trim()
            );
        }
        Err(e) => {
            warn!(event = "notify.desktop.send_failed", program = program, error = %e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applescript_escape() {
        assert_eq!(applescript_escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(applescript_escape("a\\b"), "a\\\\b");
        assert_eq!(applescript_escape("line\nbreak"), "line\\nbreak");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_command_urgency() {
        let command = build_command("✗ pingwatch", "Connection failed: Main", Severity::Error)
            .unwrap();
        assert_eq!(command.program, "notify-send");
        assert_eq!(
            command.args,
            vec![
                "--urgency",
                "critical",
                "✗ pingwatch",
                "Connection failed: Main"
            ]
        );
    }

    #[test]
    fn test_title_carries_severity_symbol() {
        let notifier = DesktopNotifier {
            app_name: "pingwatch".to_string(),
            available: false,
        };
        assert_eq!(notifier.title(Severity::Success), "✓ pingwatch");
    }

    #[test]
    fn test_unavailable_notifier_only_logs() {
        let notifier = DesktopNotifier {
            app_name: "pingwatch".to_string(),
            available: false,
        };
        notifier.notify("Disconnected: Main", Severity::Warning);
        assert!(!notifier.is_available());
    }
}

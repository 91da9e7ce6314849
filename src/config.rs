//! Layered configuration.
//!
//! Settings are resolved from built-in defaults, an optional TOML file and
//! `PINGWATCH_*` environment variables, in that order. Command-line flags
//! are applied on top by the binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::duration::parse_duration;

/// Where notifications are delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    #[default]
    Log,
    Desktop,
}

/// Resolved monitor settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the status backend.
    pub endpoint: Option<String>,
    /// JSON file to poll instead of an HTTP backend.
    pub file: Option<PathBuf>,
    pub status_path: Option<String>,
    /// Force-check route; `{id}` is replaced with the account id.
    pub refresh_path: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Extra headers sent with every request.
    pub headers: HashMap<String, String>,
    pub interval: String,
    pub force_check_delay: String,
    pub request_timeout: String,
    pub notifier: NotifierKind,
    pub indicator_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            file: None,
            status_path: None,
            refresh_path: None,
            username: None,
            password: None,
            headers: HashMap::new(),
            interval: "10s".to_string(),
            force_check_delay: "1s".to_string(),
            request_timeout: "10s".to_string(),
            notifier: NotifierKind::Log,
            indicator_file: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix("PINGWATCH"))
            .build()
            .context("Failed to load configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn interval(&self) -> Result<Duration> {
        parse_duration(&self.interval).context("Invalid interval")
    }

    pub fn force_check_delay(&self) -> Result<Duration> {
        parse_duration(&self.force_check_delay).context("Invalid force_check_delay")
    }

    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.request_timeout).context("Invalid request_timeout")
    }

    /// Check that exactly one source is set and timings are usable.
    pub fn validate(&self) -> Result<()> {
        match (&self.endpoint, &self.file) {
            (Some(_), Some(_)) => bail!("Configure either an endpoint or a file, not both"),
            (None, None) => bail!("No status source configured (set an endpoint or a file)"),
            _ => {}
        }

        if self.interval()?.is_zero() {
            bail!("Polling interval must be greater than zero");
        }
        self.force_check_delay()?;
        self.request_timeout()?;

        if self.password.is_some() && self.username.is_none() {
            bail!("A password was given without a username");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.interval().unwrap(), Duration::from_secs(10));
        assert_eq!(settings.force_check_delay().unwrap(), Duration::from_secs(1));
        assert_eq!(settings.notifier, NotifierKind::Log);
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
endpoint = "http://status.local:5000"
interval = "30s"
notifier = "desktop"
username = "ops"
password = "secret"

[headers]
x-csrftoken = "abc"
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.endpoint.as_deref(), Some("http://status.local:5000"));
        assert_eq!(settings.interval().unwrap(), Duration::from_secs(30));
        assert_eq!(settings.notifier, NotifierKind::Desktop);
        assert_eq!(settings.headers.get("x-csrftoken").map(String::as_str), Some("abc"));
        // untouched keys keep their defaults
        assert_eq!(settings.request_timeout, "10s");
        settings.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/pingwatch.toml"))).is_err());
    }

    #[test]
    fn test_validate_requires_one_source() {
        assert!(Settings::default().validate().is_err());

        let both = Settings {
            endpoint: Some("http://localhost:5000".to_string()),
            file: Some(PathBuf::from("status.json")),
            ..Default::default()
        };
        assert!(both.validate().is_err());

        let file_only = Settings {
            file: Some(PathBuf::from("status.json")),
            ..Default::default()
        };
        file_only.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_timings() {
        let zero = Settings {
            file: Some(PathBuf::from("status.json")),
            interval: "0s".to_string(),
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let garbage = Settings {
            file: Some(PathBuf::from("status.json")),
            force_check_delay: "later".to_string(),
            ..Default::default()
        };
        assert!(garbage.validate().is_err());
    }

    #[test]
    fn test_password_needs_username() {
        let settings = Settings {
            endpoint: Some("http://localhost:5000".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}

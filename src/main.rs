use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use pingwatch::config::{NotifierKind, Settings};
use pingwatch::logging::init_logging;
use pingwatch::{
    DesktopNotifier, EntityId, FileIndicator, FileSource, HttpSource, IndicatorRenderer,
    LogIndicator, LogNotifier, Notifier, PollOutcome, Severity, StatusMonitor,
};
use pingwatch_adapters::http::HttpStatusClient;

#[derive(Parser, Debug)]
#[command(name = "pingwatch")]
#[command(about = "Polls account connection status and notifies on state changes")]
struct Args {
    /// Base URL of the status backend (e.g., "http://localhost:5000")
    #[arg(short, long, conflicts_with = "file")]
    endpoint: Option<String>,

    /// Poll a status JSON file instead of an HTTP backend
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Polling interval (e.g., "10s", "1m")
    #[arg(short, long)]
    interval: Option<String>,

    /// Delay before the follow-up poll of a force check (e.g., "1s", "500ms")
    #[arg(long)]
    force_check_delay: Option<String>,

    /// Username for HTTP basic authentication
    #[arg(short, long)]
    username: Option<String>,

    /// Password for HTTP basic authentication
    #[arg(short, long)]
    password: Option<String>,

    /// Show desktop notifications in addition to logging them
    #[arg(long)]
    desktop: bool,

    /// Write indicator state to this JSON file after every poll
    #[arg(long)]
    indicator_file: Option<PathBuf>,

    /// Poll once, print the result and exit
    #[arg(long, conflicts_with_all = ["force_check", "test_notification"])]
    once: bool,

    /// Ask the backend to re-check one account, poll, and exit
    #[arg(long, value_name = "ID", conflicts_with = "test_notification")]
    force_check: Option<String>,

    /// Send a test notification and exit
    #[arg(long, value_name = "SEVERITY", value_enum)]
    test_notification: Option<Severity>,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    let mut settings = Settings::load(args.config.as_deref())?;
    apply_args(&mut settings, &args);
    settings.validate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(args, settings))
}

/// Command-line flags override file and environment settings.
fn apply_args(settings: &mut Settings, args: &Args) {
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = Some(endpoint.clone());
        settings.file = None;
    }
    if let Some(file) = &args.file {
        settings.file = Some(file.clone());
        settings.endpoint = None;
    }
    if let Some(interval) = &args.interval {
        settings.interval = interval.clone();
    }
    if let Some(delay) = &args.force_check_delay {
        settings.force_check_delay = delay.clone();
    }
    if let Some(username) = &args.username {
        settings.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        settings.password = Some(password.clone());
    }
    if args.desktop {
        settings.notifier = NotifierKind::Desktop;
    }
    if let Some(path) = &args.indicator_file {
        settings.indicator_file = Some(path.clone());
    }
}

/// Numeric ids are sent as numbers, anything else as text.
fn parse_entity_id(s: &str) -> EntityId {
    s.trim()
        .parse::<i64>()
        .map(EntityId::from)
        .unwrap_or_else(|_| EntityId::from(s.trim()))
}

fn build_monitor(settings: &Settings) -> Result<StatusMonitor> {
    let notifier: Arc<dyn Notifier> = match settings.notifier {
        NotifierKind::Log => Arc::new(LogNotifier),
        NotifierKind::Desktop => Arc::new(DesktopNotifier::new("Ping Monitor")),
    };

    let indicator: Arc<dyn IndicatorRenderer> = match &settings.indicator_file {
        Some(path) => Arc::new(FileIndicator::new(path)),
        None => Arc::new(LogIndicator),
    };

    let builder = match (&settings.endpoint, &settings.file) {
        (Some(endpoint), _) => {
            let source = Arc::new(HttpSource::new(build_client(endpoint, settings)?));
            StatusMonitor::builder(source.clone()).refresher(source)
        }
        (None, Some(path)) => StatusMonitor::builder(Arc::new(FileSource::new(path))),
        (None, None) => bail!("No status source configured"),
    };

    Ok(builder
        .notifier(notifier)
        .indicator(indicator)
        .interval(settings.interval()?)
        .force_check_delay(settings.force_check_delay()?)
        .build())
}

fn build_client(endpoint: &str, settings: &Settings) -> Result<HttpStatusClient> {
    let mut builder = HttpStatusClient::builder()
        .endpoint(endpoint)
        .timeout(settings.request_timeout()?);

    if let Some(path) = &settings.status_path {
        builder = builder.status_path(path);
    }
    if let Some(path) = &settings.refresh_path {
        builder = builder.refresh_path(path);
    }
    if let Some(username) = &settings.username {
        builder = builder.credentials(username, settings.password.clone().unwrap_or_default());
    }
    for (name, value) in &settings.headers {
        builder = builder.header(name, value);
    }

    builder.build().context("Failed to build HTTP client")
}

async fn run(args: Args, settings: Settings) -> Result<()> {
    let monitor = build_monitor(&settings)?;

    // Handle test notification mode
    if let Some(severity) = args.test_notification {
        monitor.send_test_notification(severity);
        // give a spawned desktop helper a moment to run
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        return Ok(());
    }

    // Handle force check mode
    if let Some(id) = &args.force_check {
        monitor.force_check(parse_entity_id(id)).await?;
        return Ok(());
    }

    // Handle single-poll mode
    if args.once {
        return run_once(&monitor).await;
    }

    // Default: monitor until interrupted
    monitor.start().await;

    #[cfg(unix)]
    let observer = pingwatch::visibility::VisibilityObserver::new()
        .context("Failed to install visibility signal handlers")?
        .spawn(monitor.clone());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!(event = "cli.shutdown_requested");

    monitor.stop();
    #[cfg(unix)]
    observer.abort();
    Ok(())
}

async fn run_once(monitor: &StatusMonitor) -> Result<()> {
    match monitor.poll().await {
        PollOutcome::Applied(report) => {
            let statuses = monitor.statuses();
            let mut rows: Vec<_> = statuses.iter().collect();
            rows.sort_by_key(|(id, _)| id.to_string());
            for (id, status) in rows {
                println!("{}\t{}", id, status);
            }
            println!("{}", serde_json::to_string(&report)?);
            Ok(())
        }
        PollOutcome::Abandoned(e) => Err(e).context("Poll failed"),
        PollOutcome::Skipped => bail!("Poll skipped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pingwatch").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_settings() {
        let mut settings = Settings {
            file: Some(PathBuf::from("status.json")),
            interval: "30s".to_string(),
            ..Default::default()
        };

        apply_args(
            &mut settings,
            &args(&["--endpoint", "http://localhost:5000", "--interval", "5s", "--desktop"]),
        );

        assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:5000"));
        assert_eq!(settings.file, None);
        assert_eq!(settings.interval, "5s");
        assert_eq!(settings.notifier, NotifierKind::Desktop);
        settings.validate().unwrap();
    }

    #[test]
    fn test_unset_flags_keep_settings() {
        let mut settings = Settings {
            endpoint: Some("http://status.local".to_string()),
            username: Some("ops".to_string()),
            ..Default::default()
        };
        let before = settings.clone();

        apply_args(&mut settings, &args(&[]));

        assert_eq!(settings, before);
    }

    #[test]
    fn test_conflicting_modes_rejected() {
        let argv = ["pingwatch", "--once", "--force-check", "3"];
        assert!(Args::try_parse_from(argv).is_err());

        let argv = ["pingwatch", "--endpoint", "http://a", "--file", "b.json"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_parse_entity_id() {
        assert_eq!(parse_entity_id("42"), EntityId::Int(42));
        assert_eq!(parse_entity_id("acct-7"), EntityId::Text("acct-7".to_string()));
    }

    #[test]
    fn test_test_notification_severity() {
        let parsed = args(&["--test-notification", "warning"]);
        assert_eq!(parsed.test_notification, Some(Severity::Warning));
    }
}

//! Log output setup for the `pingwatch` binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with optional quiet mode.
///
/// `RUST_LOG` takes precedence when set. Otherwise info-level events are
/// emitted, or only errors when `quiet` is true.
pub fn init_logging(quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(quiet));

    // A subscriber may already be installed (tests, embedding applications)
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn default_filter(quiet: bool) -> EnvFilter {
    EnvFilter::new(if quiet { "pingwatch=error" } else { "pingwatch=info" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(true);
        init_logging(false);
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true).to_string(), "pingwatch=error");
        assert_eq!(default_filter(false).to_string(), "pingwatch=info");
    }
}

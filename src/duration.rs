use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
];

/// Parse duration strings like "10s", "1.5s", "500ms", "2m".
///
/// A bare number is taken as seconds.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    if s.is_empty() {
        bail!("Empty duration");
    }

    if let Ok(secs) = s.parse::<f64>() {
        return from_nanos(s, secs * 1_000_000_000.0);
    }

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str
                .trim()
                .parse()
                .with_context(|| format!("Invalid duration: {}", s))?;
            return from_nanos(s, val * multiplier);
        }
    }

    bail!("Unknown duration format: {}", s)
}

fn from_nanos(input: &str, nanos: f64) -> Result<Duration> {
    if !nanos.is_finite() || nanos < 0.0 {
        bail!("Duration out of range: {}", input);
    }
    Ok(Duration::from_nanos(nanos as u64))
}

/// Format a duration for display
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        "0s".to_string()
    } else if nanos < 1_000_000 {
        format!("{:.2}µs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{}ms", d.as_millis())
    } else if d.subsec_millis() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        let d = parse_duration("1.5s").unwrap();
        assert_eq!(d, Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_milliseconds() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_bare_number_is_seconds() {
        assert_eq!(parse_duration("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration(" 0.5 ").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("10 parsecs").is_err());
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(10)), "10s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}

use crate::severity::LogSeverity;
use crate::time::now;
use once_cell::sync::Lazy;
use std::env;

/// Environment variable holding the minimum severity that gets printed.
pub const LOG_ENV: &str = "QUARRY_LOG";

static THRESHOLD: Lazy<LogSeverity> = Lazy::new(|| {
    env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(LogSeverity::Info)
});

/// Returns true if messages of the given severity pass the configured threshold.
pub fn enabled(log_severity: LogSeverity) -> bool {
    log_severity >= *THRESHOLD
}

/// Prints `msg` with its severity and the local time. Warnings and worse go to stderr.
pub fn log<S: AsRef<str>>(msg: S, log_severity: LogSeverity) {
    if !enabled(log_severity) {
        return;
    }

    let line = format_line(msg.as_ref(), log_severity, &now());
    if log_severity >= LogSeverity::Warning {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

fn format_line(msg: &str, log_severity: LogSeverity, time: &str) -> String {
    format!("[{}] {} {}", log_severity, time, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line("region loaded", LogSeverity::Debug, "2024-01-01 00:00:00 UTC");
        assert_eq!(line, "[DEBUG] 2024-01-01 00:00:00 UTC region loaded");
    }

    #[test]
    fn test_fatal_always_enabled() {
        assert!(enabled(LogSeverity::Fatal));
    }
}

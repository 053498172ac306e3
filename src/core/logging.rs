use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::core::config::AppPaths;

/// Prefix of the daily log files under `AppPaths::log_dir`.
pub const LOG_FILE_NAME: &str = "feedback-rag.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Directives used when `RUST_LOG` is unset: this service and request traces
/// at `info`, dependencies at `warn`.
pub fn default_filter() -> String {
    format!(
        "warn,{}=info,tower_http=info",
        env!("CARGO_CRATE_NAME")
    )
}

/// Installs the global subscriber: stdout plus a daily-rolling `feedback-rag.log`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init(paths: &AppPaths) {
    let log_dir = &paths.log_dir;
    let _ = std::fs::create_dir_all(log_dir);

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter()));

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(true);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_this_crate() {
        let directives = default_filter();

        assert!(directives.contains("feedback_rag_backend=info"));
        assert!(directives.starts_with("warn,"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }
}

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
pub const LOG_ENV: &str = "ZIKEY_LOG";
pub const LOG_FILE: &str = "zikey.log";

/// Route tracing output to a file in `dir`; the terminal belongs to the UI.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init_tracing(dir: &Path) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(dir).is_err() {
        return None;
    }

    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_level(true)
        .with_target(true);

    if subscriber.try_init().is_ok() {
        tracing::info!(path = %dir.join(LOG_FILE).display(), "tracing initialized");
        Some(guard)
    } else {
        None
    }
}

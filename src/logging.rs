use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILENAME: &str = "betterspend.log";
pub const LOG_ENV: &str = "BETTERSPEND_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send log events to `<data_dir>/betterspend.log`. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr. The directory must
/// already exist; if the file cannot be opened the app runs without a
/// subscriber.
pub fn init(data_dir: &Path) {
    let log_file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILENAME))
    {
        Ok(f) => f,
        Err(_) => return,
    };

    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(log_file));

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(file_log)
        .try_init();
}

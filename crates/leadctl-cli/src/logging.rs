//! Tracing setup for the two execution modes.
//!
//! One-shot commands log to stderr. The full-screen console owns the
//! terminal, so its logs go to a daily-rotated file under the leadctl home.

use anyhow::{Context, Result};
use leadctl_core::config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "leadctl=info,leadctl_core=info,leadctl_tui=info";

/// Initializes stderr logging for one-shot commands.
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initializes file logging for the console.
///
/// The returned guard must stay alive for the duration of the console;
/// dropping it flushes and stops the background writer.
pub fn init_console() -> Result<WorkerGuard> {
    let logs_dir = config::paths::logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .with_context(|| format!("Failed to create logs dir {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&logs_dir, "console.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

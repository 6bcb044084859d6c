//! File logging.
//!
//! The terminal belongs to the UI, so everything goes to
//! `<data dir>/MultiTimer/multitimer.log`. `RUST_LOG` wins over the configured
//! level. If the file can't be opened the app runs without logs.

use std::fs;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config;

const LOG_PREFIX: &str = "multitimer";

/// The returned guard flushes buffered lines when dropped, keep it alive until exit.
pub fn init(level: &str) -> Option<WorkerGuard> {
    let dir = config::data_dir()?;

    // the UI hasn't taken over the terminal yet, so stderr is still visible here
    if let Err(e) = fs::create_dir_all(&dir) {
        eprintln!("Failed to create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(&dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to open log file in {}: {e}", dir.display());
            return None;
        }
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .init();

    tracing::info!(log_dir = ?dir, level, "logging initialized");
    Some(guard)
}

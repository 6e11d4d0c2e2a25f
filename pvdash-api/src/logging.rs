//! Logging setup
//!
//! Console output always, plus an optional JSON file layer with daily rotation.

use crate::config::LoggingConfig;
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "pvdash.log";

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer and must be held until the process exits.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console_layer = if config.json_format {
        fmt::layer().json().with_writer(io::stdout).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .with_writer(io::stdout)
            .boxed()
    };

    let (file_layer, guard) = if config.file_logging_enabled {
        let file_appender = rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = non_blocking(file_appender);

        let layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .json()
            .with_writer(writer)
            .boxed();

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        level = %config.level,
        file_logging = config.file_logging_enabled,
        "Logging initialized"
    );

    Ok(guard)
}

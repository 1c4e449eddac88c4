//! Logging setup for the datacontract command-line tool.
//!
//! Console output goes to stderr so that stdout only ever carries the
//! generated document. When enabled in [`AppConfig`], logs are also written
//! to daily-rotating files in the platform data directory.
//!
//! ## Usage
//!
//! ```no_run
//! use datacontract::{config::AppConfig, logging};
//!
//! logging::init(&AppConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("Ready");
//! ```

use crate::config::AppConfig;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Gets the log directory path based on platform conventions
///
/// Returns:
/// - Windows: `%APPDATA%/datacontract/logs`
/// - macOS: `~/Library/Application Support/datacontract/logs`
/// - Linux: `~/.local/share/datacontract/logs`
///
/// # Errors
///
/// Fails when the platform has no data directory or the directory cannot be
/// created.
pub fn get_log_dir() -> Result<PathBuf> {
    let base_dir = dirs::data_dir().context("Failed to determine data directory")?;

    let log_dir = base_dir.join("datacontract").join("logs");

    if !log_dir.exists() {
        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    }

    Ok(log_dir)
}

/// Initializes logging: stderr always, rotating files when
/// `config.file_logging` is set.
///
/// `RUST_LOG` takes precedence over `config.log_level`.
///
/// # Errors
///
/// Returns error if the filter is invalid, the log directory or file appender
/// cannot be created, or a global subscriber is already installed.
pub fn init(config: &AppConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let (file_layer, log_dir) = if config.file_logging {
        let log_dir = get_log_dir()?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .max_log_files(10)
            .filename_prefix("datacontract")
            .filename_suffix("log")
            .build(&log_dir)
            .context("Failed to create log file appender")?;

        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(appender);
        (Some(layer), Some(log_dir))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(log_dir) = log_dir {
        tracing::info!("Logging initialized, log directory: {}", log_dir.display());
    }

    Ok(())
}

/// Gets the path to the current log file
///
/// # Errors
///
/// Same as [`get_log_dir`].
pub fn get_current_log_path() -> Result<PathBuf> {
    let log_dir = get_log_dir()?;
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    Ok(log_dir.join(format!("datacontract.{today}.log")))
}

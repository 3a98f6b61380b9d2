//!
//! src/logging.rs
//!
//! Initializes the file logger. Stdout is owned by the terminal form,
//! so structured logs are appended to a file instead.
//!
//!

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tracing_error::ErrorLayer;
use tracing_appender::non_blocking;

use crate::config::LoggingConfig;
use crate::errors::PreviewError;

pub struct LoggingGuard(tracing_appender::non_blocking::WorkerGuard);

pub fn init_logging(cfg: &LoggingConfig) -> Result<LoggingGuard, PreviewError> {
    let dir = match cfg.log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = cfg.log_file.file_name()
        .ok_or_else(|| PreviewError::Config(
            format!("log file has no name: {}", cfg.log_file.display())
        ))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = non_blocking(appender);

    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(cfg.filter_directives.clone()));

    let time = tracing_subscriber::fmt::time::UtcTime::rfc_3339();
    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_timer(time)
        .with_ansi(false)
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok( LoggingGuard(guard) )
}

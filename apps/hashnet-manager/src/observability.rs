//! # Logging
//!
//! - **stdout**: compact, human-friendly; `info` for hashnet crates, `warn` for deps
//! - **file**: full metadata, daily rotation to `logs/{service_name}.log`
//! - **RUST_LOG**: overrides both filters when set

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Prefix match: covers every hashnet_* crate and the `hashnet.status` target
const DEFAULT_FILTER: &str = "hashnet=info,warn";

/// Guards that must be held for the lifetime of the process.
/// Dropping this will cause buffered logs to be lost.
pub struct TracingGuards {
    _file_guard: WorkerGuard,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize stdout + rotated file logging.
pub fn init_tracing(service_name: &str) -> TracingGuards {
    let dir = Path::new("logs");
    if !dir.exists() {
        // stdout logging still works if this fails
        let _ = fs::create_dir_all(dir);
    }

    let file_appender = tracing_appender::rolling::daily(dir, format!("{service_name}.log"));
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_ansi(true)
        .compact()
        .with_filter(filter());

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .init();

    tracing::info!(
        "Logging initialized for {} (file=logs/{}.log)",
        service_name,
        service_name
    );

    TracingGuards {
        _file_guard: file_guard,
    }
}

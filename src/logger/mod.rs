//! Logger module
//!
//! Provides logging utilities for both binaries including:
//! - Subscriber setup (`RUST_LOG` overrides the configured level)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target used for access log lines, filterable with `RUST_LOG=access=off`
const ACCESS_TARGET: &str = "access";

/// Initialize the service logger with the configured level
///
/// Should be called once at application startup.
pub fn init(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init()
}

/// Initialize the packager logger
pub fn init_cli(verbose: bool) -> Result<(), TryInitError> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Backend started successfully");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref root) = config.files.root {
        tracing::info!("File access restricted to: {}", root.display());
    }
    tracing::info!("  - GET  http://{addr}/");
    tracing::info!("  - GET  http://{addr}/api/health");
    tracing::info!("  - POST http://{addr}/calculate");
    tracing::info!("  - GET  http://{addr}/system-info");
    tracing::info!("  - POST http://{addr}/file-content");
    tracing::info!("======================================");
}

pub fn log_shutdown(active_connections: usize) {
    tracing::info!(
        "Shutdown requested, {active_connections} connection(s) still finishing in background"
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log a handler failure at a level matching its status class
pub fn log_request_failure(method: &str, path: &str, status: u16, detail: &str) {
    if status >= 500 {
        tracing::error!("{method} {path} - {status}: {detail}");
    } else {
        tracing::warn!("{method} {path} - {status}: {detail}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

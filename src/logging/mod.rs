//! Logging infrastructure for Reel Core.
//!
//! This module provides:
//! - A per-render logger with file + callback dual output
//! - Phase/section markers for readable build logs
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use reel_core::logging::{LogConfig, RenderLogger};
//!
//! let logger = RenderLogger::new("news_2026-08-29", ".logs", LogConfig::default(), None).unwrap();
//!
//! logger.phase("Resolving durations");
//! logger.info("3 segments, all measured");
//! logger.warning("closing clip unmeasured; using 5s default");
//! logger.success("Composition built: 1740 frames");
//! ```

mod render_logger;
mod types;

pub use render_logger::RenderLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the global tracing subscriber for application-wide logging.
///
/// Respects `RUST_LOG`, falling back to the provided default level.
/// Should be called once at application startup.
pub fn init_tracing(default_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

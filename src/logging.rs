//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. explicit level (the `--log-level` CLI flag)
//! 2. `CONSTRUCTION_SCHEDULE_LOG` environment variable, in `EnvFilter` syntax
//! 3. default to `info`
//!
//! Output goes to stderr so that command results on stdout stay parseable.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "CONSTRUCTION_SCHEDULE_LOG";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Resolves the filter directive without installing anything.
pub fn resolve_filter(level: Option<LogLevel>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(level.as_str()),
        None => EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init_logging(level: Option<LogLevel>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

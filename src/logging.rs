// src/logging.rs

//! Diagnostic logging via `tracing`.
//!
//! The `[remon] ...` status lines are printed directly and do not depend on
//! the log level; tracing output is for digging into what the reactor did.
//!
//! Filter priority:
//! 1. `--log-level` (one level for everything)
//! 2. `REMON_LOG`, full `EnvFilter` syntax (`debug`, `remon::filter=trace`)
//! 3. `warn`
//!
//! Everything goes to stderr; stdout belongs to the supervised command.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding log directives.
pub const LOG_ENV: &str = "REMON_LOG";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => EnvFilter::default().add_directive(LevelFilter::from(level).into()),
        None => EnvFilter::builder()
            .with_default_directive(DEFAULT_LEVEL.into())
            .with_env_var(LOG_ENV)
            .from_env_lossy(),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

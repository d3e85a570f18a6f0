//! Logging System
//!
//! Structured logging using the `tracing` crate. Level and format come from
//! configuration; `CONCEPT_WORKER_LOG` takes a full filter directive and wins
//! over the configured level.

use crate::error::ConfigError;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a filter directive, e.g. `concept_worker=debug,redis=warn`.
pub const LOG_FILTER_ENV: &str = "CONCEPT_WORKER_LOG";

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];
const FORMATS: [&str; 2] = ["text", "json"];

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    pub level: String,

    /// Output format: json, text
    pub format: String,

    /// Enable colored output (text format only)
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            color: true,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::Invalid {
                key: "LOG_LEVEL",
                reason: format!(
                    "'{}' (must be one of {})",
                    self.level,
                    LEVELS.join(", ")
                ),
            });
        }
        if !FORMATS.contains(&self.format.as_str()) {
            return Err(ConfigError::Invalid {
                key: "LOG_FORMAT",
                reason: format!("'{}' (must be 'json' or 'text')", self.format),
            });
        }
        Ok(())
    }
}

/// Initialize the global subscriber. Output goes to stdout.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let filter = build_env_filter(config);
    let base_subscriber = Registry::default().with(filter);

    let installed = if config.format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stdout),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stdout),
            )
            .try_init()
    };

    installed.map_err(|e| ConfigError::Invalid {
        key: "LOG_LEVEL",
        reason: format!("failed to install subscriber: {}", e),
    })
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV) {
        return filter;
    }
    EnvFilter::new(&config.level)
}

//! # Logging & Tracing Infrastructure
//!
//! Configures the `tracing-subscriber` stack for session hosts:
//! - Pretty, compact, or JSON output formats
//! - Module-level filtering via `EnvFilter` (`RUST_LOG` compatible)
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//!
//! let config = LoggingConfig::default()
//!     .with_format(LogFormat::Compact)
//!     .with_filter("core_session=debug");
//!
//! init_logging(config).expect("Failed to initialize logging");
//! tracing::info!("host started");
//! ```

use crate::error::{Result, RuntimeError};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable pretty format with colors.
    Pretty,
    /// Compact single-line format for production.
    Compact,
    /// Structured JSON format for machine parsing.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive string used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the fallback filter directives.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Honors `RUST_LOG` when set, falling back to the configured directives.
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .map_err(|e| RuntimeError::InvalidConfig(format!("bad filter directive: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);

    let init_result = match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    };

    init_result.map_err(|e| RuntimeError::InitializationFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.default_filter, "info");
    }

    #[test]
    fn builder_methods() {
        let config = LoggingConfig::default()
            .with_format(LogFormat::Json)
            .with_filter("core_session=trace,warn");
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.default_filter, "core_session=trace,warn");
    }

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default().with_format(LogFormat::Compact);
        init_logging(config.clone()).unwrap();
        assert!(matches!(
            init_logging(config),
            Err(RuntimeError::InitializationFailed(_))
        ));
    }
}

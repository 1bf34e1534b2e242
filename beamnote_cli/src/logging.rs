//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so the progress lines on stdout stay clean.
//!
//! # Log Levels
//!
//! - `error`: fatal failures
//! - `warn`: empty data, compiler warnings (default)
//! - `info`: pipeline stages
//! - `debug`: row counts, paths, image probe
//! - `trace`: everything, including dependency crates

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format.
    Pretty,
    /// Compact single-line format.
    #[default]
    Compact,
    /// JSON format for machine parsing.
    Json,
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
    /// Whether `RUST_LOG` may override `level`
    pub use_env_filter: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: LogFormat::default(),
            use_env_filter: true,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Level from `-v` count and `-q`.
    ///
    /// - `-q`: error
    /// - none: warn
    /// - `-v`: info
    /// - `-vv`: debug
    /// - `-vvv` and more: trace
    #[must_use]
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            LevelFilter::ERROR
        } else {
            match verbose {
                0 => LevelFilter::WARN,
                1 => LevelFilter::INFO,
                2 => LevelFilter::DEBUG,
                _ => LevelFilter::TRACE,
            }
        };
        Self {
            level,
            use_env_filter: verbose == 0 && !quiet,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Initialize the global tracing subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_env_filter(config);

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_target(false)
                    .with_ansi(config.with_ansi)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_ansi(config.with_ansi)
                    .with_writer(io::stderr),
            )
            .try_init(),
    }
}

/// Filter for our crates at the configured level; dependencies (typst,
/// calamine) stay at warn unless tracing everything.
fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::new(filter_directives(config.level))
}

fn filter_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    if level == "trace" {
        return level;
    }
    format!("warn,beamnote_core={level},beamnote={level}", level = level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0, false).level, LevelFilter::WARN);
        assert_eq!(LogConfig::from_verbosity(1, false).level, LevelFilter::INFO);
        assert_eq!(LogConfig::from_verbosity(2, false).level, LevelFilter::DEBUG);
        assert_eq!(LogConfig::from_verbosity(5, false).level, LevelFilter::TRACE);
        assert_eq!(LogConfig::from_verbosity(0, true).level, LevelFilter::ERROR);
    }

    #[test]
    fn test_env_filter_only_without_flags() {
        assert!(LogConfig::from_verbosity(0, false).use_env_filter);
        assert!(!LogConfig::from_verbosity(1, false).use_env_filter);
        assert!(!LogConfig::from_verbosity(0, true).use_env_filter);
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(LevelFilter::DEBUG), "warn,beamnote_core=debug,beamnote=debug");
        assert_eq!(filter_directives(LevelFilter::TRACE), "trace");
    }
}

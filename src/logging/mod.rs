//! Logging module for swanctl-complete
//!
//! Stdout carries the completion line and stderr ends up in the user's
//! terminal while they type, so logging is off unless asked for:
//! - `--verbose` logs debug events to stderr
//! - a configured log file receives warnings (debug with `--verbose`)
//! - `RUST_LOG` overrides the level as usual

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Verbosity level adjustment: -1 for quiet, 0 for normal, +1 for verbose
    pub verbosity: i8,
    /// Optional file receiving the log output instead of stderr
    pub log_file: Option<PathBuf>,
}

impl LogConfig {
    /// Create a new log configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode (+1 verbosity)
    pub fn verbose(mut self) -> Self {
        self.verbosity = 1;
        self
    }

    /// Set quiet mode (-1 verbosity)
    pub fn quiet(mut self) -> Self {
        self.verbosity = -1;
        self
    }

    /// Set the log file
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.log_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Get the most verbose level that is logged
    fn max_level(&self) -> LevelFilter {
        match self.verbosity {
            v if v < 0 => LevelFilter::OFF,
            0 if self.log_file.is_some() => LevelFilter::WARN,
            0 => LevelFilter::OFF,
            _ => LevelFilter::DEBUG,
        }
    }
}

/// Initialize logging with full configuration
///
/// Falls back to stderr when the log file cannot be opened.
pub fn init_with_config(config: LogConfig) -> crate::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.max_level().into())
        .from_env_lossy();

    let writer = match &config.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(std::io::stderr),
        },
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.log_file.is_none())
        .with_target(false);

    let subscriber = tracing_subscriber::registry().with(env_filter).with(layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| crate::Error::Config(format!("Failed to set tracing subscriber: {}", e)))
}

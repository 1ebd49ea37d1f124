//! JSONL and console logging for NexQ messaging
//!
//! # Features
//!
//! - **JSONL Output**: Structured JSON lines for log aggregation (default)
//! - **Stderr Console**: Console output goes to stderr so it never mixes with
//!   a terminal UI on stdout
//! - **Pretty Console**: Human-readable output for development
//! - **Session Context**: Tag spans with the signed-in user and a run id
//! - **Log Files**: Daily rolling JSONL files via tracing-appender
//!
//! # Quick Start
//!
//! ```ignore
//! use nexq_logging::{LogConfig, NexqSubscriberBuilder};
//!
//! // Pretty stderr output at debug, plus JSONL files in ./logs
//! let _guard = NexqSubscriberBuilder::new()
//!     .with_config(LogConfig::for_terminal("debug", true).with_log_dir("./logs"))
//!     .init();
//! ```

pub mod config;
pub mod context;
pub mod layers;

pub use config::{ConsoleFormat, LOG_FILE_PREFIX, LogConfig};
pub use context::{SessionContextData, SessionContextGuard, session_span};

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log directory or file could not be created
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber is already installed
    #[error("global subscriber already set: {0}")]
    AlreadyInitialized(String),
}

/// Builder for configuring and initializing the logging subscriber
///
/// By default, console output uses JSONL format at `info`.
pub struct NexqSubscriberBuilder {
    config: LogConfig,
}

impl NexqSubscriberBuilder {
    /// Create a builder with the default configuration (JSONL to console)
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes file output and must be kept alive for
    /// the duration of the program. Failures are reported on stderr and
    /// leave logging disabled.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: Failed to initialize logging: {}", e);
                None
            }
        }
    }

    /// Try to install the subscriber globally
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.level));

        let console_layer: Box<dyn Layer<Registry> + Send + Sync> = match self.config.console {
            ConsoleFormat::Pretty => tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed(),
            ConsoleFormat::Jsonl => layers::jsonl_layer(std::io::stderr),
        };
        let mut sinks: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![console_layer];
        let mut guard = None;

        if let Some(dir) = &self.config.log_dir {
            let (writer, file_guard) = create_file_writer(dir)?;
            sinks.push(layers::jsonl_layer(writer));
            guard = Some(file_guard);
        }

        tracing_subscriber::registry()
            .with(sinks)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }
}

impl Default for NexqSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a daily rolling JSONL file under `dir`, creating the directory
fn create_file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

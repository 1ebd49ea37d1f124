//! Logging settings for the chat client

use std::path::PathBuf;

/// File name prefix of the daily JSONL log files
pub const LOG_FILE_PREFIX: &str = "nexq-chat";

/// Format of the log lines written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// Human-readable lines with colors
    Pretty,
}

/// Where logs go and how much is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level filter, overridden by RUST_LOG
    pub level: String,
    /// Stderr format
    pub console: ConsoleFormat,
    /// Directory for daily rolling JSONL files, if any
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleFormat::default(),
            log_dir: None,
        }
    }
}

impl LogConfig {
    /// Stderr logging at `level`, pretty or JSONL
    pub fn for_terminal(level: impl Into<String>, pretty: bool) -> Self {
        Self {
            level: level.into(),
            console: if pretty {
                ConsoleFormat::Pretty
            } else {
                ConsoleFormat::Jsonl
            },
            log_dir: None,
        }
    }

    /// Also write JSONL files under `dir`
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

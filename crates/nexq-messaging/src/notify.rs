//! Notification sink for user-visible notices
//!
//! The UI shell decides how a [`Notice`] is shown (toast, status line,
//! log entry). The session only hands notices over.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    /// Create a notice
    pub fn new(
        level: NoticeLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Receiver of notices
pub trait Notifier: Send + Sync {
    /// Show a notice to the user
    fn notify(&self, notice: &Notice);
}

/// Notifier that writes notices to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => info!(title = %notice.title, "{}", notice.description),
            NoticeLevel::Warning => warn!(title = %notice.title, "{}", notice.description),
            NoticeLevel::Error => error!(title = %notice.title, "{}", notice.description),
        }
    }
}

/// Notifier that keeps every notice it receives
///
/// Clones share the same buffer, so a UI can hand one clone to the session
/// and drain the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all notices received so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Remove and return all notices received so far
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_shares_buffer() {
        let recorder = RecordingNotifier::new();
        let handle = recorder.clone();

        recorder.notify(&Notice::new(NoticeLevel::Info, "Hello", "World"));
        assert_eq!(handle.notices().len(), 1);

        let drained = handle.drain();
        assert_eq!(drained[0].title, "Hello");
        assert!(recorder.notices().is_empty());
    }

    #[test]
    fn test_tracing_notifier_accepts_all_levels() {
        let notifier = TracingNotifier;
        for level in [NoticeLevel::Info, NoticeLevel::Warning, NoticeLevel::Error] {
            notifier.notify(&Notice::new(level, "t", "d"));
        }
        assert_eq!(NoticeLevel::Warning.to_string(), "warning");
    }
}

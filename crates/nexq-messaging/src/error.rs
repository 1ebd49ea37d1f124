//! Error types for nexq-messaging

use thiserror::Error;

use crate::contact::ContactId;
use crate::notify::{Notice, NoticeLevel};

/// Errors returned by session operations
///
/// Every variant is recoverable: the session stays usable and no stored
/// state is touched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    /// Input was rejected before any mutation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Operation is not valid in the current session state
    #[error("invalid session state: {0}")]
    State(#[from] StateError),

    /// Referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Feature is not available yet
    #[error("not implemented: {0}")]
    NotImplemented(#[from] Unimplemented),
}

impl MessagingError {
    /// User-facing notice for this error
    pub fn notice(&self) -> Notice {
        match self {
            MessagingError::Validation(ValidationError::EmptyMessage) => Notice::new(
                NoticeLevel::Warning,
                "Message is empty",
                "Type something before sending.",
            ),
            MessagingError::State(StateError::NoActiveContact) => Notice::new(
                NoticeLevel::Warning,
                "No conversation open",
                "Select a contact from the list to start messaging.",
            ),
            MessagingError::NotFound(NotFoundError::UnknownContact(id)) => Notice::new(
                NoticeLevel::Error,
                "Contact not found",
                format!("There is no contact with id {}.", id),
            ),
            MessagingError::NotImplemented(Unimplemented::Attachment) => Notice::new(
                NoticeLevel::Info,
                "Feature coming soon",
                "File attachments will be available in the next update.",
            ),
        }
    }
}

/// Input validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Body was empty or whitespace only
    #[error("message body is empty")]
    EmptyMessage,
}

/// Session state failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// No contact is selected
    #[error("no active contact")]
    NoActiveContact,
}

/// Lookup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotFoundError {
    /// Contact id is not in the roster
    #[error("unknown contact {0}")]
    UnknownContact(ContactId),
}

/// Features that exist in the UI but are not wired up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unimplemented {
    /// File and image attachments
    #[error("attachments")]
    Attachment,
}

/// Result type for messaging operations
pub type MessagingResult<T> = Result<T, MessagingError>;

/// Errors raised while loading a seed snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Two roster entries share an id
    #[error("duplicate contact id {0}")]
    DuplicateContact(ContactId),

    /// A conversation references a contact that is not in the roster
    #[error("conversation references unknown contact {0}")]
    UnknownContact(ContactId),

    /// Seed messages for a contact are not in timestamp order
    #[error("seed messages for contact {contact_id} are out of order at position {position}")]
    OutOfOrder {
        contact_id: ContactId,
        position: usize,
    },

    /// Snapshot text could not be parsed
    #[error("failed to parse snapshot: {0}")]
    Parse(String),

    /// Snapshot file could not be read
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SnapshotError {
    fn from(e: toml::de::Error) -> Self {
        SnapshotError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Parse(e.to_string())
    }
}

/// Errors raised while loading session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config text is not valid TOML for [`crate::SessionConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

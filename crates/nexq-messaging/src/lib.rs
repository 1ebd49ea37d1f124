//! # NexQ Messaging
//!
//! In-app messaging for the NexQ trading dashboard.
//!
//! A [`MessagingSession`] sits between the UI and two in-memory stores:
//!
//! - [`ContactDirectory`]: the roster of counterparties with unread badges
//!   and last-message previews
//! - [`ConversationStore`]: append-only, per-contact message timelines
//!
//! The session owns contact selection, outbound sends and a queue of
//! deferred simulated replies. Time comes from an injected [`Clock`], so
//! the reply delay can be driven by a [`ManualClock`] in tests and by a
//! real timer in the terminal client.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use nexq_messaging::{ContactId, ManualClock, SessionBuilder, Snapshot};
//!
//! let clock = Arc::new(ManualClock::default());
//! let mut session = SessionBuilder::new(snapshot)
//!     .clock(clock.clone())
//!     .build()?;
//!
//! session.select_contact(ContactId(1))?;
//! session.send_message("Any discounts for 1000 units?")?;
//!
//! clock.advance(Duration::from_secs(5));
//! for event in session.run_due() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod clock;
pub mod config;
pub mod contact;
pub mod conversation;
pub mod error;
pub mod message;
pub mod notify;
pub mod profile;
pub mod scheduler;
pub mod session;
pub mod snapshot;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ResponsivePolicy, SessionConfig};
pub use contact::{Contact, ContactDirectory, ContactId, TradeRole};
pub use conversation::{ConversationStore, Timeline};
pub use error::{
    ConfigError, MessagingError, MessagingResult, NotFoundError, SnapshotError, StateError,
    Unimplemented, ValidationError,
};
pub use message::{
    Attachment, AttachmentKind, Direction, Message, MessageId, NewMessage, preview_text,
};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use profile::UserProfile;
pub use scheduler::{DeferredQueue, ScheduledTask, TaskId};
pub use session::{MessagingSession, PendingReply, SessionBuilder, SessionEvent, SessionState};
pub use snapshot::{ConversationSeed, Snapshot};

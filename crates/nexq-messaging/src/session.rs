//! Messaging session: contact selection, sends and simulated replies

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::SessionConfig;
use crate::contact::{Contact, ContactDirectory, ContactId};
use crate::conversation::{ConversationStore, Timeline};
use crate::error::{
    MessagingError, MessagingResult, NotFoundError, SnapshotError, StateError, Unimplemented,
    ValidationError,
};
use crate::message::{Message, MessageId, NewMessage};
use crate::notify::{Notifier, TracingNotifier};
use crate::profile::UserProfile;
use crate::scheduler::{DeferredQueue, TaskId};
use crate::snapshot::Snapshot;

/// Which conversation, if any, is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Initial state: roster shown, no conversation open
    NoContactSelected,
    /// A conversation is open
    ContactActive(ContactId),
}

/// A simulated reply waiting for its delay to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReply {
    /// Conversation the reply goes to
    pub contact_id: ContactId,
    /// Outbound message that triggered the reply
    pub trigger: MessageId,
}

/// Something that happened while firing deferred tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A simulated reply was appended to a conversation
    ReplyDelivered {
        task_id: TaskId,
        contact_id: ContactId,
        message: Message,
        /// `true` if the conversation was on screen, `false` if the unread
        /// badge was bumped instead
        visible: bool,
    },
}

/// Builder for [`MessagingSession`]
pub struct SessionBuilder {
    snapshot: Snapshot,
    profile: UserProfile,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl SessionBuilder {
    /// Start from a seed snapshot with default collaborators
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            profile: UserProfile::default(),
            config: SessionConfig::default(),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Set the signed-in user
    pub fn profile(mut self, profile: UserProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the time source
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the notice sink
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Validate the snapshot and create the session
    pub fn build(self) -> Result<MessagingSession, SnapshotError> {
        let (directory, store) = self.snapshot.into_stores()?;
        let responsive = self.config.responsive.resolve(&directory);

        info!(
            contacts = directory.len(),
            messages = store.total_count(),
            responsive = ?responsive,
            user = %self.profile.display_name,
            "Messaging session created"
        );

        Ok(MessagingSession {
            directory,
            store,
            state: SessionState::NoContactSelected,
            timeline: Vec::new(),
            replies: DeferredQueue::new(),
            responsive,
            profile: self.profile,
            config: self.config,
            clock: self.clock,
            notifier: self.notifier,
        })
    }
}

/// Orchestrates the roster, the conversation store and simulated replies
///
/// The session is the only writer of both stores. All operations run on
/// the caller's thread; deferred replies fire only when [`run_due`] is
/// called, so the caller's event loop decides when time passes.
///
/// Opening a conversation resets the contact's unread badge but leaves the
/// `is_new` highlight on stored messages untouched. The two are
/// independent.
///
/// [`run_due`]: MessagingSession::run_due
pub struct MessagingSession {
    directory: ContactDirectory,
    store: ConversationStore,
    state: SessionState,
    timeline: Vec<Message>,
    replies: DeferredQueue<PendingReply>,
    responsive: Option<ContactId>,
    profile: UserProfile,
    config: SessionConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl MessagingSession {
    /// Shorthand for [`SessionBuilder::new`]
    pub fn builder(snapshot: Snapshot) -> SessionBuilder {
        SessionBuilder::new(snapshot)
    }

    /// Roster in order
    pub fn list_contacts(&self) -> &[Contact] {
        self.directory.list()
    }

    /// Look up one contact
    pub fn contact(&self, id: ContactId) -> Option<&Contact> {
        self.directory.get(id)
    }

    /// Stored history for a contact, without opening it
    pub fn conversation(&self, id: ContactId) -> Timeline<'_> {
        self.store.get(id)
    }

    /// Open a contact's conversation
    ///
    /// Clears the unread badge and returns the visible timeline.
    pub fn select_contact(&mut self, id: ContactId) -> MessagingResult<&[Message]> {
        if !self.directory.contains(id) {
            return Err(self.fail(NotFoundError::UnknownContact(id).into()));
        }

        self.directory.mark_read(id);
        self.timeline = self.store.get(id).cloned().collect();
        self.state = SessionState::ContactActive(id);

        info!(contact_id = %id, messages = self.timeline.len(), "Opened conversation");
        Ok(&self.timeline)
    }

    /// Open a conversation and return an owned copy of its timeline
    pub fn open_conversation(&mut self, id: ContactId) -> MessagingResult<Vec<Message>> {
        self.select_contact(id).map(<[Message]>::to_vec)
    }

    /// Send text to the active contact
    ///
    /// Sending to the responsive contact schedules one simulated reply.
    pub fn send_message(&mut self, body: &str) -> MessagingResult<Message> {
        if body.trim().is_empty() {
            return Err(self.fail(ValidationError::EmptyMessage.into()));
        }
        let SessionState::ContactActive(contact_id) = self.state else {
            return Err(self.fail(StateError::NoActiveContact.into()));
        };

        let now = self.clock.now_utc();
        let draft = NewMessage::outbound(self.profile.display_name.clone(), body, now);
        let message = self.store.append(contact_id, draft);
        self.timeline.push(message.clone());
        self.touch_preview(contact_id, &message);

        info!(contact_id = %contact_id, message_id = %message.id, "Sent message");

        if self.responsive == Some(contact_id) {
            let task_id = self.replies.schedule(
                now,
                self.config.reply_delay(),
                PendingReply {
                    contact_id,
                    trigger: message.id,
                },
            );
            debug!(
                contact_id = %contact_id,
                task_id = %task_id,
                trigger = %message.id,
                delay_ms = self.config.reply_delay_ms,
                "Scheduled simulated reply"
            );
        }

        Ok(message)
    }

    /// Send the compose buffer, clearing it only if the send succeeds
    pub fn send_compose(&mut self, buffer: &mut String) -> MessagingResult<Message> {
        let message = self.send_message(buffer)?;
        buffer.clear();
        Ok(message)
    }

    /// Attachments are not available yet; always fails
    pub fn request_attachment(&self) -> MessagingResult<()> {
        Err(self.fail(Unimplemented::Attachment.into()))
    }

    /// Sum of unread badges across the roster
    pub fn unread_total(&self) -> u32 {
        self.directory.total_unread()
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Contact whose conversation is open
    pub fn active_contact(&self) -> Option<ContactId> {
        match self.state {
            SessionState::ContactActive(id) => Some(id),
            SessionState::NoContactSelected => None,
        }
    }

    /// Messages currently on screen
    pub fn timeline(&self) -> &[Message] {
        &self.timeline
    }

    /// Contact that answers with simulated replies
    pub fn responsive_contact(&self) -> Option<ContactId> {
        self.responsive
    }

    /// The signed-in user
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Active configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replies that have not fired yet, earliest first
    pub fn pending_replies(&self) -> impl Iterator<Item = (TaskId, DateTime<Utc>, &PendingReply)> {
        self.replies.pending()
    }

    /// When the next reply is due
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.replies.next_due()
    }

    /// Fire every reply whose delay has elapsed on the session clock
    pub fn run_due(&mut self) -> Vec<SessionEvent> {
        let now = self.clock.now_utc();
        let due = self.replies.pop_due(now);
        let mut events = Vec::with_capacity(due.len());

        for task in due {
            let PendingReply {
                contact_id,
                trigger,
            } = task.payload;

            let sender = self
                .directory
                .get(contact_id)
                .map(|c| c.display_name.clone())
                .unwrap_or_default();
            let draft = NewMessage::inbound(sender, self.config.reply_body.clone(), now).marked_new();
            let message = self.store.append(contact_id, draft);

            let visible = self.state == SessionState::ContactActive(contact_id);
            if visible {
                self.timeline.push(message.clone());
                self.touch_preview(contact_id, &message);
            } else {
                if let Err(e) = self.directory.increment_unread(
                    contact_id,
                    message.body.clone(),
                    message.timestamp,
                )
                {
                    warn!(contact_id = %contact_id, error = %e, "Reply for contact missing from roster");
                }
            }

            info!(
                contact_id = %contact_id,
                task_id = %task.id,
                trigger = %trigger,
                message_id = %message.id,
                visible,
                "Delivered simulated reply"
            );

            events.push(SessionEvent::ReplyDelivered {
                task_id: task.id,
                contact_id,
                message,
                visible,
            });
        }

        events
    }

    /// Roster entries keep the full text; shortening is up to the UI
    fn touch_preview(&mut self, contact_id: ContactId, message: &Message) {
        let preview = message.body.clone();
        if let Err(e) = self
            .directory
            .record_activity(contact_id, preview, message.timestamp)
        {
            warn!(contact_id = %contact_id, error = %e, "Could not refresh preview");
        }
    }

    fn fail(&self, error: MessagingError) -> MessagingError {
        warn!(error = %error, state = ?self.state, "Rejected session operation");
        self.notifier.notify(&error.notice());
        error
    }
}

//! Per-contact message timelines

use std::collections::HashMap;
use std::slice;

use tracing::debug;

use crate::contact::ContactId;
use crate::message::{Message, MessageId, NewMessage};

/// In-order view over one conversation
///
/// Clone the iterator to walk the same timeline again.
#[derive(Debug, Clone)]
pub struct Timeline<'a> {
    inner: slice::Iter<'a, Message>,
}

impl<'a> Timeline<'a> {
    fn empty() -> Self {
        let empty: &'a [Message] = &[];
        Self {
            inner: empty.iter(),
        }
    }
}

impl<'a> Iterator for Timeline<'a> {
    type Item = &'a Message;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Timeline<'_> {}

/// Append-only message storage keyed by contact
///
/// Ids are assigned here, never by callers, so every conversation reads
/// 1, 2, 3, … with no gaps.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    conversations: HashMap<ContactId, Vec<Message>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages for a contact in append order; empty if there is no history
    pub fn get(&self, contact_id: ContactId) -> Timeline<'_> {
        match self.conversations.get(&contact_id) {
            Some(messages) => Timeline {
                inner: messages.iter(),
            },
            None => Timeline::empty(),
        }
    }

    /// Store a message and return it with its assigned id
    pub fn append(&mut self, contact_id: ContactId, draft: NewMessage) -> Message {
        let messages = self.conversations.entry(contact_id).or_default();

        let (id, floor) = match messages.last() {
            Some(last) => (last.id.next(), Some(last.timestamp)),
            None => (MessageId::FIRST, None),
        };

        let mut message = Message::from_draft(id, draft);
        if let Some(floor) = floor
            && message.timestamp < floor
        {
            message.timestamp = floor;
        }

        debug!(
            contact_id = %contact_id,
            message_id = %id,
            direction = ?message.direction,
            "Appended message"
        );

        messages.push(message.clone());
        message
    }

    /// Number of messages stored for a contact
    pub fn len(&self, contact_id: ContactId) -> usize {
        self.conversations.get(&contact_id).map_or(0, Vec::len)
    }

    /// Most recent message for a contact
    pub fn last(&self, contact_id: ContactId) -> Option<&Message> {
        self.conversations.get(&contact_id).and_then(|m| m.last())
    }

    /// Total message count across all conversations
    pub fn total_count(&self) -> usize {
        self.conversations.values().map(Vec::len).sum()
    }
}

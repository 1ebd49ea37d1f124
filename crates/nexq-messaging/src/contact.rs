//! Contact roster with unread tracking

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MessagingResult, NotFoundError, SnapshotError};

/// Stable identifier of a roster entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a party in the supply chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeRole {
    Manufacturer,
    Distributor,
    Wholesaler,
    Retailer,
}

impl fmt::Display for TradeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeRole::Manufacturer => write!(f, "Manufacturer"),
            TradeRole::Distributor => write!(f, "Distributor"),
            TradeRole::Wholesaler => write!(f, "Wholesaler"),
            TradeRole::Retailer => write!(f, "Retailer"),
        }
    }
}

/// A counterparty in the user's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable id
    pub id: ContactId,
    /// Company or person name
    pub display_name: String,
    /// Supply-chain role label
    pub role: TradeRole,
    /// Avatar image reference
    #[serde(default)]
    pub avatar: String,
    /// Inbound messages received since the conversation was last opened
    #[serde(default)]
    pub unread_count: u32,
    /// Short text of the latest message
    #[serde(default)]
    pub last_message_preview: String,
    /// When the latest message was written
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Contact {
    /// Create a contact with no history
    pub fn new(id: ContactId, display_name: impl Into<String>, role: TradeRole) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            role,
            avatar: String::new(),
            unread_count: 0,
            last_message_preview: String::new(),
            last_message_at: None,
        }
    }

    /// Set the avatar reference
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Set the unread badge and latest message
    pub fn with_last_message(
        mut self,
        preview: impl Into<String>,
        at: DateTime<Utc>,
        unread_count: u32,
    ) -> Self {
        self.last_message_preview = preview.into();
        self.last_message_at = Some(at);
        self.unread_count = unread_count;
        self
    }

    /// Avatar fallback: first letter of each word in the name
    pub fn initials(&self) -> String {
        self.display_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }

    /// Check if the unread badge is showing
    pub fn has_unread(&self) -> bool {
        self.unread_count > 0
    }
}

/// Ordered roster of contacts
///
/// Roster order is the order contacts were supplied in and never changes.
#[derive(Debug, Clone, Default)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
    index: HashMap<ContactId, usize>,
}

impl ContactDirectory {
    /// Build a directory from a roster, rejecting duplicate ids
    pub fn new(contacts: Vec<Contact>) -> Result<Self, SnapshotError> {
        let mut index = HashMap::with_capacity(contacts.len());
        for (position, contact) in contacts.iter().enumerate() {
            if index.insert(contact.id, position).is_some() {
                return Err(SnapshotError::DuplicateContact(contact.id));
            }
        }
        Ok(Self { contacts, index })
    }

    /// All contacts in roster order
    pub fn list(&self) -> &[Contact] {
        &self.contacts
    }

    /// Look up a contact
    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.index.get(&id).map(|&position| &self.contacts[position])
    }

    /// Check if the id is in the roster
    pub fn contains(&self, id: ContactId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of contacts
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Check if the roster is empty
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Reset the unread badge; unknown ids are ignored
    pub fn mark_read(&mut self, id: ContactId) {
        if let Some(contact) = self.get_mut(id) {
            debug!(contact_id = %id, cleared = contact.unread_count, "Marked contact read");
            contact.unread_count = 0;
        }
    }

    /// Count one more unread inbound message and refresh the preview
    pub fn increment_unread(
        &mut self,
        id: ContactId,
        preview: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> MessagingResult<()> {
        let contact = self
            .get_mut(id)
            .ok_or(NotFoundError::UnknownContact(id))?;
        contact.unread_count += 1;
        contact.last_message_preview = preview.into();
        contact.last_message_at = Some(timestamp);
        debug!(contact_id = %id, unread = contact.unread_count, "Incremented unread count");
        Ok(())
    }

    /// Refresh the preview without touching the unread badge
    pub fn record_activity(
        &mut self,
        id: ContactId,
        preview: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> MessagingResult<()> {
        let contact = self
            .get_mut(id)
            .ok_or(NotFoundError::UnknownContact(id))?;
        contact.last_message_preview = preview.into();
        contact.last_message_at = Some(timestamp);
        Ok(())
    }

    /// Sum of all unread badges
    pub fn total_unread(&self) -> u32 {
        self.contacts.iter().map(|c| c.unread_count).sum()
    }

    fn get_mut(&mut self, id: ContactId) -> Option<&mut Contact> {
        let position = *self.index.get(&id)?;
        self.contacts.get_mut(position)
    }
}

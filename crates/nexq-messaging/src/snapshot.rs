//! Seed data handed to a session at construction

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::contact::{Contact, ContactDirectory, ContactId};
use crate::conversation::ConversationStore;
use crate::error::SnapshotError;
use crate::message::NewMessage;

/// Seed messages for one contact, oldest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSeed {
    pub contact_id: ContactId,
    #[serde(default)]
    pub messages: Vec<NewMessage>,
}

/// Roster and history to start a session from
///
/// Timestamps are RFC 3339 strings in both TOML and JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub conversations: Vec<ConversationSeed>,
}

impl Snapshot {
    /// Create a snapshot from a roster with no history
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            contacts,
            conversations: Vec::new(),
        }
    }

    /// Add seed messages for a contact
    pub fn with_conversation(mut self, contact_id: ContactId, messages: Vec<NewMessage>) -> Self {
        self.conversations.push(ConversationSeed {
            contact_id,
            messages,
        });
        self
    }

    /// Parse a TOML snapshot
    pub fn from_toml_str(s: &str) -> Result<Self, SnapshotError> {
        Ok(toml::from_str(s)?)
    }

    /// Parse a JSON snapshot
    pub fn from_json_str(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a snapshot file; `.json` files are read as JSON, anything else as TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Check ids, references and ordering
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let directory = ContactDirectory::new(self.contacts.clone())?;
        self.validate_conversations(&directory)
    }

    /// Split into the two stores, validating along the way
    ///
    /// Seed messages get ids 1..n in the order given.
    pub fn into_stores(self) -> Result<(ContactDirectory, ConversationStore), SnapshotError> {
        let directory = ContactDirectory::new(self.contacts)?;

        let seeds = Snapshot {
            contacts: Vec::new(),
            conversations: self.conversations,
        };
        seeds.validate_conversations(&directory)?;

        let mut store = ConversationStore::new();
        for seed in seeds.conversations {
            for message in seed.messages {
                store.append(seed.contact_id, message);
            }
        }

        Ok((directory, store))
    }

    fn validate_conversations(&self, directory: &ContactDirectory) -> Result<(), SnapshotError> {
        for seed in &self.conversations {
            if !directory.contains(seed.contact_id) {
                return Err(SnapshotError::UnknownContact(seed.contact_id));
            }
            for (position, pair) in seed.messages.windows(2).enumerate() {
                if pair[1].timestamp < pair[0].timestamp {
                    return Err(SnapshotError::OutOfOrder {
                        contact_id: seed.contact_id,
                        position: position + 1,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::TradeRole;
    use crate::message::{AttachmentKind, Direction, MessageId};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, h, m, 0).unwrap()
    }

    const SEED: &str = r#"
[[contacts]]
id = 1
display_name = "Sri Traders"
role = "distributor"
avatar = "/placeholder.svg"
unread_count = 2
last_message_preview = "Need 200 units of Smartphone X1."
last_message_at = "2025-04-10T16:00:00Z"

[[contacts]]
id = 3
display_name = "Ravi Distributors"
role = "distributor"

[[conversations]]
contact_id = 1

[[conversations.messages]]
sender = "Sri Traders"
body = "Hi ABC Electronics, can you send 500 units of Smartphone X1?"
timestamp = "2025-04-10T14:30:00Z"
direction = "inbound"

[[conversations.messages]]
sender = "ABC Electronics"
body = "MOQ is 200, confirming 500 units. ETA 12-Apr-2025."
timestamp = "2025-04-10T14:35:00Z"
direction = "outbound"
attachment = { kind = "qr", payload = "Order #123, 500 units" }

[[conversations.messages]]
sender = "Sri Traders"
body = "Any discounts for 1000 units?"
timestamp = "2025-04-10T16:00:00Z"
direction = "inbound"
is_new = true
"#;

    #[test]
    fn test_parse_toml_snapshot() {
        let snapshot = Snapshot::from_toml_str(SEED).unwrap();
        snapshot.validate().unwrap();

        assert_eq!(snapshot.contacts.len(), 2);
        assert_eq!(snapshot.contacts[0].unread_count, 2);
        assert_eq!(snapshot.contacts[1].unread_count, 0);

        let (directory, store) = snapshot.into_stores().unwrap();
        assert_eq!(directory.total_unread(), 2);

        let messages: Vec<_> = store.get(ContactId(1)).collect();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].id, MessageId(1));
        assert_eq!(messages[1].direction, Direction::Outbound);
        assert_eq!(
            messages[1].attachment.as_ref().map(|a| a.kind),
            Some(AttachmentKind::Qr)
        );
        assert!(messages[2].is_new);
        assert_eq!(store.len(ContactId(3)), 0);
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = Snapshot::new(vec![Contact::new(
            ContactId(2),
            "Vijay Wholesalers",
            TradeRole::Wholesaler,
        )])
        .with_conversation(
            ContactId(2),
            vec![NewMessage::inbound("Vijay Wholesalers", "MOQ for Charger C1?", at(15, 30)).marked_new()],
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(Snapshot::from_json_str(&json).unwrap(), snapshot);
    }

    #[test]
    fn test_unknown_contact_rejected() {
        let snapshot = Snapshot::new(vec![Contact::new(ContactId(1), "Sri", TradeRole::Distributor)])
            .with_conversation(ContactId(2), vec![]);

        assert!(matches!(
            snapshot.into_stores(),
            Err(SnapshotError::UnknownContact(ContactId(2)))
        ));
    }

    #[test]
    fn test_out_of_order_seed_rejected() {
        let snapshot = Snapshot::new(vec![Contact::new(ContactId(1), "Sri", TradeRole::Distributor)])
            .with_conversation(
                ContactId(1),
                vec![
                    NewMessage::inbound("Sri", "later", at(16, 0)),
                    NewMessage::inbound("Sri", "earlier", at(15, 0)),
                ],
            );

        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotError::OutOfOrder { contact_id: ContactId(1), position: 1 })
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("seed.toml");
        std::fs::write(&toml_path, SEED).unwrap();
        assert_eq!(Snapshot::load(&toml_path).unwrap().contacts.len(), 2);

        let json_path = dir.path().join("seed.json");
        std::fs::write(&json_path, "{\"contacts\": []}").unwrap();
        assert!(Snapshot::load(&json_path).unwrap().contacts.is_empty());

        std::fs::write(&json_path, "not json").unwrap();
        assert!(matches!(Snapshot::load(&json_path), Err(SnapshotError::Parse(_))));
    }
}

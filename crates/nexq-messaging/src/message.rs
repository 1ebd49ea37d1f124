//! Message types for conversations

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position of a message within its conversation
///
/// Ids start at 1 and increase by one per append. They are only unique
/// within a single conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl MessageId {
    /// First id handed out in an empty conversation
    pub const FIRST: MessageId = MessageId(1);

    /// The id following this one
    pub fn next(self) -> Self {
        MessageId(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the conversation wrote the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Written by the counterparty
    Inbound,
    /// Written by the local user
    Outbound,
}

/// Kind of payload carried by an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Image reference (payload is a path or URL)
    Image,
    /// QR code (payload is the encoded text)
    Qr,
}

/// Attachment shown under a message body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment kind
    pub kind: AttachmentKind,
    /// Image location or QR content
    pub payload: String,
    /// Caption, used for image file names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Attachment {
    /// Create an image attachment
    pub fn image(payload: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Image,
            payload: payload.into(),
            name: Some(name.into()),
        }
    }

    /// Create a QR attachment
    pub fn qr(content: impl Into<String>) -> Self {
        Self {
            kind: AttachmentKind::Qr,
            payload: content.into(),
            name: None,
        }
    }
}

/// A message that has not been stored yet
///
/// The conversation store assigns the id on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    /// Display label of the author
    pub sender: String,
    /// Text body
    pub body: String,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
    /// Inbound or outbound
    pub direction: Direction,
    /// Optional attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Highlight flag for freshly received messages
    #[serde(default)]
    pub is_new: bool,
}

impl NewMessage {
    /// Outbound text written by the local user
    pub fn outbound(
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp,
            direction: Direction::Outbound,
            attachment: None,
            is_new: false,
        }
    }

    /// Inbound text from a counterparty
    pub fn inbound(
        sender: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp,
            direction: Direction::Inbound,
            attachment: None,
            is_new: false,
        }
    }

    /// Attach a payload
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Mark as a fresh arrival
    pub fn marked_new(mut self) -> Self {
        self.is_new = true;
        self
    }
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`
pub fn preview_text(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

/// A stored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Per-conversation id
    pub id: MessageId,
    /// Display label of the author
    pub sender: String,
    /// Text body
    pub body: String,
    /// When the message was written
    pub timestamp: DateTime<Utc>,
    /// Inbound or outbound
    pub direction: Direction,
    /// Optional attachment
    pub attachment: Option<Attachment>,
    /// Highlight flag for freshly received messages
    pub is_new: bool,
}

impl Message {
    /// Combine a draft with its assigned id
    pub fn from_draft(id: MessageId, draft: NewMessage) -> Self {
        Self {
            id,
            sender: draft.sender,
            body: draft.body,
            timestamp: draft.timestamp,
            direction: draft.direction,
            attachment: draft.attachment,
            is_new: draft.is_new,
        }
    }

    /// Check if the counterparty wrote this message
    pub fn is_inbound(&self) -> bool {
        self.direction == Direction::Inbound
    }

    /// Body shortened to at most `max_chars` characters
    pub fn preview(&self, max_chars: usize) -> String {
        preview_text(&self.body, max_chars)
    }

    /// Timestamp in the dashboard's `10-Apr-2025, 14:30` style
    pub fn display_time(&self) -> String {
        self.timestamp.format("%d-%b-%Y, %H:%M").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, h, m, 0).unwrap()
    }

    #[test]
    fn test_message_id_sequence() {
        assert_eq!(MessageId::FIRST, MessageId(1));
        assert_eq!(MessageId(4).next(), MessageId(5));
        assert_eq!(MessageId(3).to_string(), "#3");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let draft = NewMessage::inbound("Sri Traders", "Need 200 units of Smartphone X1.", at(16, 0));
        let msg = Message::from_draft(MessageId(1), draft);

        assert_eq!(msg.preview(100), "Need 200 units of Smartphone X1.");
        assert_eq!(msg.preview(9), "Need 200…");

        let draft = NewMessage::inbound("Vijay", "ßßßß", at(16, 0));
        let msg = Message::from_draft(MessageId(1), draft);
        assert_eq!(msg.preview(2), "ßß…");
        assert_eq!(preview_text("", 4), "");
    }

    #[test]
    fn test_display_time() {
        let draft = NewMessage::outbound("ABC Electronics", "ETA 12-Apr-2025.", at(14, 35));
        let msg = Message::from_draft(MessageId(2), draft);
        assert_eq!(msg.display_time(), "10-Apr-2025, 14:35");
    }

    #[test]
    fn test_draft_builders() {
        let draft = NewMessage::inbound("Sri Traders", "Thanks! Attaching specs.", at(15, 0))
            .with_attachment(Attachment::image("/placeholder.svg", "Smartphone X1.jpg"))
            .marked_new();

        assert_eq!(draft.direction, Direction::Inbound);
        assert!(draft.is_new);
        let attachment = draft.attachment.as_ref().unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Image);
        assert_eq!(attachment.name.as_deref(), Some("Smartphone X1.jpg"));

        let qr = Attachment::qr("Order #123, 500 units");
        assert_eq!(qr.kind, AttachmentKind::Qr);
        assert!(qr.name.is_none());
    }
}

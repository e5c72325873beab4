//! Data model for the academy support chat

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message author - either side of the academy/student channel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    Student,
    Academy,
}

/// Message body
///
/// Attachment url/name exist only on the non-text variants, so a text
/// message can never carry a stray attachment reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MessageBody {
    Text { text: String },
    Image { url: String, name: String },
    File { url: String, name: String },
}

impl MessageBody {
    /// Text content, if this is a text message
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageBody::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Short label for conversation list previews
    pub fn preview(&self) -> &str {
        match self {
            MessageBody::Text { text } => text,
            MessageBody::Image { name, .. } => name,
            MessageBody::File { name, .. } => name,
        }
    }
}

/// A single message within a conversation
///
/// Immutable after creation except for `is_read`, which only the
/// read-state transition may flip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender: SenderType,
    pub body: MessageBody,
    pub timestamp: DateTime<Utc>,
    /// Per-conversation insertion counter; tie-break for equal timestamps
    pub seq: u64,
    pub is_read: bool,
}

/// What a sender hands to the store; the store assigns id, sequence
/// number, and the final (clamped) timestamp.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub sender: SenderType,
    pub body: MessageBody,
    pub timestamp: DateTime<Utc>,
}

/// Student identity as resolved from the student directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentProfile {
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// One student's channel with the academy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: String,
    pub student_id: String,
    pub profile: StudentProfile,
    /// Count of student-authored messages not yet marked read.
    /// Always equals the recount over the message list.
    pub unread_count: u32,
    /// Informational presence; never gates correctness
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    /// Cache of the most recent message, refreshed on every append
    pub last_message: Option<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Discrete command surface for the session controller
//!
//! UI events arrive as values, not scattered setter calls; each command
//! maps onto exactly one controller method and yields the next snapshot.

use serde::{Deserialize, Serialize};

use acadia_store::{ConversationFilter, MessageBody};

use crate::attachment::PendingUpload;
use crate::controller::{ChatSessionController, ChatSnapshot};
use crate::error::ChatError;

/// A single user-visible (or transport-delivered) action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ChatCommand {
    AddStudent {
        student_id: String,
    },
    SelectConversation {
        conversation_id: String,
    },
    SendMessage {
        text: String,
    },
    SendAttachment {
        upload: PendingUpload,
    },
    MessageArrived {
        student_id: String,
        body: MessageBody,
    },
    PresenceChanged {
        student_id: String,
        online: bool,
    },
    SetFilter {
        filter: ConversationFilter,
    },
}

impl ChatSessionController {
    /// Apply one command and return the resulting snapshot
    pub fn apply(&mut self, command: ChatCommand) -> Result<ChatSnapshot, ChatError> {
        match command {
            ChatCommand::AddStudent { student_id } => {
                self.add_student(&student_id)?;
            }
            ChatCommand::SelectConversation { conversation_id } => {
                self.select_conversation(&conversation_id)?;
            }
            ChatCommand::SendMessage { text } => {
                self.send_message(&text)?;
            }
            ChatCommand::SendAttachment { upload } => {
                self.send_attachment(upload)?;
            }
            ChatCommand::MessageArrived { student_id, body } => {
                self.message_arrived(&student_id, body)?;
            }
            ChatCommand::PresenceChanged { student_id, online } => {
                self.presence_changed(&student_id, online)?;
            }
            ChatCommand::SetFilter { filter } => {
                self.set_filter(filter);
            }
        }
        Ok(self.snapshot())
    }
}

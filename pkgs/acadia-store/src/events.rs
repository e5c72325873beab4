//! Chat events emitted after each successful store mutation
//!
//! A push transport (websocket, SSE) subscribes to these instead of
//! polling the store.

use serde::{Deserialize, Serialize};

use crate::models::{Conversation, Message};

/// Unified chat event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatEvent {
    ConversationCreated {
        conversation: Conversation,
    },
    MessageAppended {
        conversation_id: String,
        message: Message,
    },
    ConversationRead {
        conversation_id: String,
        newly_read: u32,
    },
    PresenceChanged {
        conversation_id: String,
        is_online: bool,
    },
}

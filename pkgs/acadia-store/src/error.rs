//! Error types for store operations

use thiserror::Error;

/// Errors that can occur when mutating or querying the conversation store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),
    #[error("Student already has a conversation: {0}")]
    DuplicateConversation(String),
}

//! Error types for the chat session controller

use thiserror::Error;

use acadia_store::StoreError;

use crate::attachment::AttachmentError;

/// Errors surfaced to the operator
///
/// All of these are expected, recoverable conditions; nothing here should
/// ever abort the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Message too long: {chars} characters (limit {limit})")]
    MessageTooLong { chars: usize, limit: usize },
    #[error("No conversation selected")]
    NoSelection,
    #[error("Unknown student: {0}")]
    UnknownStudent(String),
    #[error("Attachment rejected: {0}")]
    Attachment(#[from] AttachmentError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

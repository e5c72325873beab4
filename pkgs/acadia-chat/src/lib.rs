//! Acadia Chat - session controller for the academy support console
//!
//! This crate mediates every user-visible chat action into consistent
//! state transitions over the conversation store in `acadia-store`.
//!
//! # Architecture
//!
//! - **ChatSessionController**: selection state machine, send/inbound
//!   message flow, read-state transitions; the only caller of store
//!   mutators
//! - **ChatCommand**: the discrete command surface; one value per UI
//!   action, one snapshot back
//! - **MessageClock**: monotonic timestamp source so message order is
//!   stable and reproducible
//! - **StudentDirectory**: external seam resolving student ids to
//!   profiles
//! - **attachment**: upload validation before a message is constructed
//!
//! Mutations are synchronous; the event channel only carries
//! notifications out, so a websocket or SSE adapter can be layered on
//! without changing any consumer of the snapshot.

pub mod attachment;
pub mod clock;
pub mod commands;
pub mod controller;
pub mod directory;
pub mod error;

pub use attachment::{AttachmentError, PendingUpload};
pub use clock::MessageClock;
pub use commands::ChatCommand;
pub use controller::{ChatSessionController, ChatSnapshot};
pub use directory::{InMemoryDirectory, StudentDirectory};
pub use error::ChatError;

use serde::{Deserialize, Serialize};

/// Session-level limits for outgoing messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum attachment size in bytes
    pub max_attachment_size: u64,

    /// Maximum text message length in characters
    pub max_message_chars: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_attachment_size: 10 * 1024 * 1024, // 10MB
            max_message_chars: 4000,
        }
    }
}

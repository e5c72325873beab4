//! Acadia Store - conversation state for the academy support chat
//!
//! This crate is the authoritative model of the academy↔student messaging
//! core: conversations, their ordered message sequences, read/unread
//! state, and the pure filter that narrows the visible list.
//!
//! # Architecture
//!
//! - **ConversationStore**: in-memory mapping from conversation id to its
//!   record and ordered message list; the single mutation boundary
//! - **ConversationFilter**: pure search/status predicate over fetched
//!   conversation projections
//! - **ChatEvent**: emitted after each successful mutation so a push
//!   transport can be layered on without changing consumers
//!
//! # Invariants
//!
//! - `unread_count` always equals the number of student-authored messages
//!   with `is_read == false`
//! - message timestamps are non-decreasing within a conversation, with
//!   the insertion sequence number as the deterministic tie-break
//! - `last_message` is a derive-on-write cache, refreshed on every append
//!   and read-state change
//!
//! Mutators are synchronous and complete fully under the store's internal
//! lock before returning, so readers never observe a conversation whose
//! unread count disagrees with its messages.

pub mod error;
pub mod events;
pub mod filter;
pub mod models;
pub mod store;

pub use error::StoreError;
pub use events::ChatEvent;
pub use filter::{filter_conversations, ConversationFilter, StatusFilter};
pub use models::{Conversation, Message, MessageBody, MessageDraft, SenderType, StudentProfile};
pub use store::ConversationStore;

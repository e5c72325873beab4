//! Conversation store - authoritative conversation and message state
//!
//! The store owns the canonical list of conversations and their ordered
//! message sequences. Consumers only ever receive cloned projections.
//!
//! # Data Structures
//!
//! - **conversations**: HashMap<conversation_id, ConversationState>
//! - **student_index**: HashMap<student_id, conversation_id>
//!
//! The dual mapping enables lookups from either direction: the UI selects
//! by conversation id, inbound delivery and presence arrive keyed by
//! student id.
//!
//! Every mutator runs under a single mutex, so a mutation completes fully
//! before any reader (or a concurrent inbound append) can observe the
//! conversation. `unread_count` is therefore never momentarily
//! inconsistent with the message list.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Conversation, Message, MessageDraft, SenderType, StudentProfile};

struct ConversationState {
    conversation: Conversation,
    messages: Vec<Message>,
    next_seq: u64,
    /// Creation rank, tie-break when two conversations share `updated_at`
    order: u64,
}

impl ConversationState {
    fn unread_recount(&self) -> u32 {
        self.messages
            .iter()
            .filter(|m| m.sender == SenderType::Student && !m.is_read)
            .count() as u32
    }
}

#[derive(Default)]
struct StoreInner {
    conversations: HashMap<String, ConversationState>,
    student_index: HashMap<String, String>,
    next_order: u64,
}

/// In-memory conversation store
pub struct ConversationStore {
    inner: Mutex<StoreInner>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
        }
    }

    /// Create a conversation for a student
    ///
    /// One conversation per distinct student: if the student already has
    /// one, the call is rejected with `DuplicateConversation` and the
    /// existing conversation is left untouched.
    pub fn create_conversation(
        &self,
        student_id: &str,
        profile: StudentProfile,
    ) -> Result<Conversation, StoreError> {
        let mut inner = self.inner.lock();

        if inner.student_index.contains_key(student_id) {
            return Err(StoreError::DuplicateConversation(student_id.to_string()));
        }

        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            profile,
            unread_count: 0,
            is_online: false,
            last_seen: None,
            last_message: None,
            created_at: now,
            updated_at: now,
        };

        let order = inner.next_order;
        inner.next_order += 1;
        inner
            .student_index
            .insert(student_id.to_string(), conversation.id.clone());
        inner.conversations.insert(
            conversation.id.clone(),
            ConversationState {
                conversation: conversation.clone(),
                messages: Vec::new(),
                next_seq: 0,
                order,
            },
        );

        info!(
            "Created conversation {} for student {}",
            conversation.id, student_id
        );
        Ok(conversation)
    }

    /// Append a message to a conversation
    ///
    /// Assigns the message id and sequence number, clamps the timestamp so
    /// the sequence stays non-decreasing, refreshes the `last_message`
    /// cache, and bumps `unread_count` when the sender is the student.
    pub fn append_message(
        &self,
        conversation_id: &str,
        draft: MessageDraft,
    ) -> Result<Message, StoreError> {
        let mut inner = self.inner.lock();
        let state = inner
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;

        let seq = state.next_seq;
        state.next_seq += 1;

        // Timestamps never go backwards within a conversation; equal
        // timestamps are ordered by seq.
        let timestamp = match state.messages.last() {
            Some(prev) if draft.timestamp < prev.timestamp => prev.timestamp,
            _ => draft.timestamp,
        };

        let message = Message {
            id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.to_string(),
            sender: draft.sender,
            body: draft.body,
            timestamp,
            seq,
            is_read: false,
        };

        state.messages.push(message.clone());
        if message.sender == SenderType::Student {
            state.conversation.unread_count += 1;
        }
        state.conversation.last_message = Some(message.clone());
        state.conversation.updated_at = timestamp;

        debug_assert_eq!(state.conversation.unread_count, state.unread_recount());

        debug!(
            "Appended message {} (seq {}) to conversation {}",
            message.id, seq, conversation_id
        );
        Ok(message)
    }

    /// Mark every message in a conversation as read
    ///
    /// Resets `unread_count` to 0 and returns how many messages were newly
    /// flipped. Idempotent: a second consecutive call changes nothing and
    /// does not bump `updated_at`.
    pub fn mark_conversation_read(&self, conversation_id: &str) -> Result<u32, StoreError> {
        let mut inner = self.inner.lock();
        let state = inner
            .conversations
            .get_mut(conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;

        let mut newly_read = 0u32;
        for message in state.messages.iter_mut().filter(|m| !m.is_read) {
            message.is_read = true;
            newly_read += 1;
        }

        if newly_read > 0 {
            state.conversation.unread_count = 0;
            if let Some(last) = state.messages.last() {
                state.conversation.last_message = Some(last.clone());
            }
            state.conversation.updated_at = Utc::now();
            debug!(
                "Marked {} messages as read in conversation {}",
                newly_read, conversation_id
            );
        }

        debug_assert_eq!(state.conversation.unread_count, state.unread_recount());

        Ok(newly_read)
    }

    /// Update a student's presence
    ///
    /// Presence is informational: it never touches `updated_at`, so going
    /// online does not reorder the conversation list.
    pub fn set_presence(
        &self,
        student_id: &str,
        online: bool,
        seen_at: DateTime<Utc>,
    ) -> Result<Conversation, StoreError> {
        let mut inner = self.inner.lock();
        let conversation_id = inner
            .student_index
            .get(student_id)
            .cloned()
            .ok_or_else(|| StoreError::ConversationNotFound(student_id.to_string()))?;

        let state = inner
            .conversations
            .get_mut(&conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.clone()))?;

        state.conversation.is_online = online;
        state.conversation.last_seen = Some(seen_at);

        debug!(
            "Presence for student {}: {}",
            student_id,
            if online { "online" } else { "offline" }
        );
        Ok(state.conversation.clone())
    }

    /// Get all conversations, most recently updated first
    pub fn list_conversations(&self) -> Vec<Conversation> {
        let inner = self.inner.lock();
        let mut states: Vec<(&ConversationState, DateTime<Utc>)> = inner
            .conversations
            .values()
            .map(|s| (s, s.conversation.updated_at))
            .collect();
        states.sort_by(|(a, a_ts), (b, b_ts)| b_ts.cmp(a_ts).then(a.order.cmp(&b.order)));
        states
            .into_iter()
            .map(|(s, _)| s.conversation.clone())
            .collect()
    }

    /// Get a single conversation by id
    pub fn get_conversation(&self, conversation_id: &str) -> Option<Conversation> {
        let inner = self.inner.lock();
        inner
            .conversations
            .get(conversation_id)
            .map(|s| s.conversation.clone())
    }

    /// Get the conversation belonging to a student, if any
    pub fn conversation_for_student(&self, student_id: &str) -> Option<Conversation> {
        let inner = self.inner.lock();
        let conversation_id = inner.student_index.get(student_id)?;
        inner
            .conversations
            .get(conversation_id)
            .map(|s| s.conversation.clone())
    }

    /// Get a conversation's messages in order
    ///
    /// Non-decreasing by timestamp with seq as the tie-break; an empty vec
    /// (never an error) for a conversation with no messages yet.
    pub fn get_messages(&self, conversation_id: &str) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.lock();
        let state = inner
            .conversations
            .get(conversation_id)
            .ok_or_else(|| StoreError::ConversationNotFound(conversation_id.to_string()))?;
        Ok(state.messages.clone())
    }

    /// Number of conversations in the store
    pub fn conversations_count(&self) -> usize {
        self.inner.lock().conversations.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Chat session controller
//!
//! The only component that calls store mutators. UI handlers (or a
//! transport adapter) hand it discrete commands; it applies them under
//! the store's single-writer boundary and exposes an immutable snapshot
//! for rendering, so state flows one way: command in, snapshot out.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use acadia_store::{
    filter_conversations, ChatEvent, Conversation, ConversationFilter, ConversationStore, Message,
    MessageBody, MessageDraft, SenderType,
};

use crate::attachment::{self, PendingUpload};
use crate::clock::MessageClock;
use crate::directory::StudentDirectory;
use crate::error::ChatError;
use crate::ChatConfig;

/// Immutable projection of the chat state for rendering
///
/// `conversations` is already filtered and ordered most-recently-updated
/// first; `thread` holds the selected conversation's messages in order.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub conversations: Vec<Conversation>,
    pub selected: Option<Conversation>,
    pub thread: Vec<Message>,
    pub filter: ConversationFilter,
}

/// Orchestrates selection, read-state transitions, and message flow
pub struct ChatSessionController {
    store: Arc<ConversationStore>,
    directory: Arc<dyn StudentDirectory>,
    clock: MessageClock,
    config: ChatConfig,
    selected: Option<String>,
    filter: ConversationFilter,
    event_sender: UnboundedSender<ChatEvent>,
    event_receiver: Option<UnboundedReceiver<ChatEvent>>,
}

impl ChatSessionController {
    /// Controller over a fresh store, using the system clock
    pub fn new(config: ChatConfig, directory: Arc<dyn StudentDirectory>) -> Self {
        Self::with_parts(
            config,
            directory,
            Arc::new(ConversationStore::new()),
            MessageClock::system(),
        )
    }

    /// Controller over an existing store and clock
    pub fn with_parts(
        config: ChatConfig,
        directory: Arc<dyn StudentDirectory>,
        store: Arc<ConversationStore>,
        clock: MessageClock,
    ) -> Self {
        let (event_sender, event_receiver) = unbounded_channel();
        Self {
            store,
            directory,
            clock,
            config,
            selected: None,
            filter: ConversationFilter::default(),
            event_sender,
            event_receiver: Some(event_receiver),
        }
    }

    /// Take the event stream; a transport adapter consumes it
    pub fn take_event_receiver(&mut self) -> Option<UnboundedReceiver<ChatEvent>> {
        self.event_receiver.take()
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<ConversationStore> {
        Arc::clone(&self.store)
    }

    /// Currently selected conversation id, if any
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Active list filter
    pub fn filter(&self) -> &ConversationFilter {
        &self.filter
    }

    /// Add a student to chat, creating their conversation
    pub fn add_student(&mut self, student_id: &str) -> Result<Conversation, ChatError> {
        let profile = self
            .directory
            .lookup(student_id)
            .ok_or_else(|| ChatError::UnknownStudent(student_id.to_string()))?;

        let conversation = self.store.create_conversation(student_id, profile)?;
        info!(
            "Student {} added to chat as conversation {}",
            student_id, conversation.id
        );
        self.emit(ChatEvent::ConversationCreated {
            conversation: conversation.clone(),
        });
        Ok(conversation)
    }

    /// Select a conversation, marking it read
    ///
    /// The read transition fires once per selection event; re-selecting
    /// the already-selected conversation is a no-op.
    pub fn select_conversation(&mut self, conversation_id: &str) -> Result<(), ChatError> {
        if self.selected.as_deref() == Some(conversation_id) {
            return Ok(());
        }

        // Validate before flipping selection so a stale id leaves the
        // previous selection intact.
        let newly_read = self.store.mark_conversation_read(conversation_id)?;
        self.selected = Some(conversation_id.to_string());
        debug!("Selected conversation {}", conversation_id);

        if newly_read > 0 {
            self.emit(ChatEvent::ConversationRead {
                conversation_id: conversation_id.to_string(),
                newly_read,
            });
        }
        Ok(())
    }

    /// Send a text message from the academy to the selected conversation
    pub fn send_message(&mut self, text: &str) -> Result<Message, ChatError> {
        let conversation_id = self.selected.clone().ok_or(ChatError::NoSelection)?;

        if text.trim().is_empty() {
            warn!("Rejected empty message to conversation {}", conversation_id);
            return Err(ChatError::EmptyMessage);
        }
        let chars = text.chars().count();
        if chars > self.config.max_message_chars {
            return Err(ChatError::MessageTooLong {
                chars,
                limit: self.config.max_message_chars,
            });
        }

        self.append_academy_message(
            &conversation_id,
            MessageBody::Text {
                text: text.to_string(),
            },
        )
    }

    /// Send a validated attachment to the selected conversation
    pub fn send_attachment(&mut self, upload: PendingUpload) -> Result<Message, ChatError> {
        let conversation_id = self.selected.clone().ok_or(ChatError::NoSelection)?;
        let body = attachment::validate(upload, &self.config)?;
        self.append_academy_message(&conversation_id, body)
    }

    /// Deliver an inbound student message
    ///
    /// Appends to the student's conversation whether or not it is
    /// selected. Unselected conversations accumulate unread count; the
    /// selected one is marked read immediately since the operator is
    /// viewing the thread.
    pub fn message_arrived(
        &mut self,
        student_id: &str,
        body: MessageBody,
    ) -> Result<Message, ChatError> {
        let conversation = self
            .store
            .conversation_for_student(student_id)
            .ok_or_else(|| ChatError::UnknownStudent(student_id.to_string()))?;

        let message = self.store.append_message(
            &conversation.id,
            MessageDraft {
                sender: SenderType::Student,
                body,
                timestamp: self.clock.now(),
            },
        )?;
        self.emit(ChatEvent::MessageAppended {
            conversation_id: conversation.id.clone(),
            message: message.clone(),
        });

        if self.selected.as_deref() == Some(conversation.id.as_str()) {
            let newly_read = self.store.mark_conversation_read(&conversation.id)?;
            if newly_read > 0 {
                self.emit(ChatEvent::ConversationRead {
                    conversation_id: conversation.id.clone(),
                    newly_read,
                });
            }
        }
        Ok(message)
    }

    /// Record a student going online or offline
    pub fn presence_changed(&mut self, student_id: &str, online: bool) -> Result<(), ChatError> {
        let conversation = self
            .store
            .set_presence(student_id, online, self.clock.now())?;
        self.emit(ChatEvent::PresenceChanged {
            conversation_id: conversation.id,
            is_online: online,
        });
        Ok(())
    }

    /// Replace the active list filter
    pub fn set_filter(&mut self, filter: ConversationFilter) {
        self.filter = filter;
    }

    /// Build the immutable render projection
    pub fn snapshot(&self) -> ChatSnapshot {
        let all = self.store.list_conversations();
        let conversations = filter_conversations(&all, &self.filter);
        let selected = self
            .selected
            .as_deref()
            .and_then(|id| self.store.get_conversation(id));
        let thread = match self.selected.as_deref() {
            Some(id) => self.store.get_messages(id).unwrap_or_default(),
            None => Vec::new(),
        };

        ChatSnapshot {
            conversations,
            selected,
            thread,
            filter: self.filter.clone(),
        }
    }

    fn append_academy_message(
        &mut self,
        conversation_id: &str,
        body: MessageBody,
    ) -> Result<Message, ChatError> {
        let message = self.store.append_message(
            conversation_id,
            MessageDraft {
                sender: SenderType::Academy,
                body,
                timestamp: self.clock.now(),
            },
        )?;
        self.emit(ChatEvent::MessageAppended {
            conversation_id: conversation_id.to_string(),
            message: message.clone(),
        });
        Ok(message)
    }

    fn emit(&self, event: ChatEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.event_sender.send(event);
    }
}

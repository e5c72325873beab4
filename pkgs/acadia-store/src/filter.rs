//! Pure filtering of the conversation list
//!
//! The filter never touches the store; it narrows an already-fetched
//! projection, preserving input order.

use serde::{Deserialize, Serialize};

use crate::models::Conversation;

/// Status predicate for the conversation list
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Unread,
    Online,
}

/// Combined search + status filter
///
/// `search` matches case-insensitively against the student's name or
/// email; an empty string matches everything. Both predicates are ANDed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationFilter {
    pub search: String,
    pub status: StatusFilter,
}

impl ConversationFilter {
    /// Whether a conversation passes both predicates
    pub fn matches(&self, conversation: &Conversation) -> bool {
        self.matches_search(conversation) && self.matches_status(conversation)
    }

    fn matches_search(&self, conversation: &Conversation) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        conversation.profile.name.to_lowercase().contains(&needle)
            || conversation.profile.email.to_lowercase().contains(&needle)
    }

    fn matches_status(&self, conversation: &Conversation) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Unread => conversation.unread_count > 0,
            StatusFilter::Online => conversation.is_online,
        }
    }
}

/// Narrow a conversation list by a filter, keeping input order
pub fn filter_conversations(
    conversations: &[Conversation],
    filter: &ConversationFilter,
) -> Vec<Conversation> {
    conversations
        .iter()
        .filter(|c| filter.matches(c))
        .cloned()
        .collect()
}

//! Conversation store port - conversations plus their messages.

use crate::domain::foundation::{ConversationId, DomainError, MessageId, UserId};
use crate::domain::messaging::{Conversation, Message};
use async_trait::async_trait;

/// Port for conversation and message storage.
///
/// All lookups are participant-scoped: a conversation a user does not
/// belong to behaves as if it did not exist.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Stores a new conversation.
    async fn create(&self, conversation: Conversation) -> Result<Conversation, DomainError>;

    /// Conversations the user participates in.
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Conversation>, DomainError>;

    /// One conversation, participant-scoped.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` when absent or the user is not a participant
    async fn find_for_user(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Conversation, DomainError>;

    /// Persists a modified conversation.
    async fn save(&self, conversation: Conversation) -> Result<Conversation, DomainError>;

    /// Deletes a conversation and its messages, participant-scoped.
    async fn delete_for_user(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<(), DomainError>;

    /// Appends a message and updates the conversation's preview/unread
    /// state in one step.
    async fn append_message(&self, message: Message) -> Result<Message, DomainError>;

    /// Messages of one conversation in chronological order,
    /// participant-scoped.
    async fn list_messages(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Vec<Message>, DomainError>;

    /// Deletes a message; only its sender may do so.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` when the id is unknown or the caller is not the sender
    async fn delete_message(&self, id: &MessageId, sender: &UserId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn ConversationStore) {}
    }
}

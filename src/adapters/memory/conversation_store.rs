//! In-memory implementation of ConversationStore.
//!
//! One lock guards conversations and messages together so that
//! `append_message` updates both sides atomically.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConversationId, DomainError, MessageId, UserId};
use crate::domain::messaging::{Conversation, Message};
use crate::ports::ConversationStore;

#[derive(Debug, Default)]
struct Inner {
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    inner: RwLock<Inner>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn scoped<'a>(
    conversations: &'a [Conversation],
    id: &ConversationId,
    user: &UserId,
) -> Option<&'a Conversation> {
    conversations
        .iter()
        .find(|c| &c.id == id && c.is_participant(user))
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, conversation: Conversation) -> Result<Conversation, DomainError> {
        self.inner
            .write()
            .await
            .conversations
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Conversation>, DomainError> {
        Ok(self
            .inner
            .read()
            .await
            .conversations
            .iter()
            .filter(|c| c.is_participant(user))
            .cloned()
            .collect())
    }

    async fn find_for_user(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Conversation, DomainError> {
        scoped(&self.inner.read().await.conversations, id, user)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Conversation"))
    }

    async fn save(&self, conversation: Conversation) -> Result<Conversation, DomainError> {
        let mut inner = self.inner.write().await;
        match inner
            .conversations
            .iter_mut()
            .find(|c| c.id == conversation.id)
        {
            Some(slot) => {
                *slot = conversation.clone();
                Ok(conversation)
            }
            None => Err(DomainError::not_found("Conversation")),
        }
    }

    async fn delete_for_user(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        if scoped(&inner.conversations, id, user).is_none() {
            return Err(DomainError::not_found("Conversation"));
        }
        inner.conversations.retain(|c| &c.id != id);
        inner.messages.retain(|m| &m.conversation_id != id);
        Ok(())
    }

    async fn append_message(&self, message: Message) -> Result<Message, DomainError> {
        let mut inner = self.inner.write().await;
        let convo = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == message.conversation_id && c.is_participant(&message.sender_id))
            .ok_or_else(|| DomainError::not_found("Conversation"))?;
        convo.record_message(&message);
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(
        &self,
        id: &ConversationId,
        user: &UserId,
    ) -> Result<Vec<Message>, DomainError> {
        let inner = self.inner.read().await;
        if scoped(&inner.conversations, id, user).is_none() {
            return Err(DomainError::not_found("Conversation"));
        }
        let mut result: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| &m.conversation_id == id)
            .cloned()
            .collect();
        result.sort_by_key(|m| m.sent_at);
        Ok(result)
    }

    async fn delete_message(&self, id: &MessageId, sender: &UserId) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        let before = inner.messages.len();
        inner
            .messages
            .retain(|m| !(&m.id == id && &m.sender_id == sender));
        if inner.messages.len() == before {
            return Err(DomainError::not_found("Message"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messaging::ConversationKind;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    async fn store_with_convo() -> (InMemoryConversationStore, Conversation) {
        let store = InMemoryConversationStore::new();
        let convo = store
            .create(
                Conversation::new(vec![uid("a"), uid("b")], ConversationKind::Direct, None)
                    .unwrap(),
            )
            .await
            .unwrap();
        (store, convo)
    }

    #[tokio::test]
    async fn non_participants_see_nothing() {
        let (store, convo) = store_with_convo().await;
        let result = store.find_for_user(&convo.id, &uid("outsider")).await;
        assert!(result.is_err());
        assert!(store.list_for_user(&uid("outsider")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_updates_preview_and_unread() {
        let (store, convo) = store_with_convo().await;
        let msg = Message::new(convo.id, uid("a"), "hello".to_string(), vec![]).unwrap();
        store.append_message(msg).await.unwrap();

        let refreshed = store.find_for_user(&convo.id, &uid("b")).await.unwrap();
        assert_eq!(refreshed.unread_for(&uid("b")), 1);
        assert_eq!(refreshed.last_message.unwrap().content, "hello");
    }

    #[tokio::test]
    async fn messages_list_in_chronological_order() {
        let (store, convo) = store_with_convo().await;
        for text in ["one", "two", "three"] {
            let msg = Message::new(convo.id, uid("a"), text.to_string(), vec![]).unwrap();
            store.append_message(msg).await.unwrap();
        }

        let messages = store.list_messages(&convo.id, &uid("a")).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn only_the_sender_deletes_a_message() {
        let (store, convo) = store_with_convo().await;
        let msg = store
            .append_message(Message::new(convo.id, uid("a"), "hi".to_string(), vec![]).unwrap())
            .await
            .unwrap();

        assert!(store.delete_message(&msg.id, &uid("b")).await.is_err());
        assert!(store.delete_message(&msg.id, &uid("a")).await.is_ok());
    }

    #[tokio::test]
    async fn delete_conversation_removes_its_messages() {
        let (store, convo) = store_with_convo().await;
        store
            .append_message(Message::new(convo.id, uid("a"), "hi".to_string(), vec![]).unwrap())
            .await
            .unwrap();

        store.delete_for_user(&convo.id, &uid("a")).await.unwrap();
        assert!(store.list_for_user(&uid("a")).await.unwrap().is_empty());
        assert!(store.list_messages(&convo.id, &uid("a")).await.is_err());
    }
}

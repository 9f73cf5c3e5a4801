//! Message entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, MessageId, ResourceId, Timestamp, UserId,
};

/// Metadata for a file attached to a message. The bytes themselves live in
/// the resource store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMeta {
    pub id: ResourceId,
    pub name: String,
    pub size_bytes: u64,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub attachments: Vec<AttachmentMeta>,
    pub sent_at: Timestamp,
}

impl Message {
    /// Creates a message; empty content is allowed only with attachments.
    pub fn new(
        conversation_id: ConversationId,
        sender_id: UserId,
        content: String,
        attachments: Vec<AttachmentMeta>,
    ) -> Result<Self, DomainError> {
        if content.trim().is_empty() && attachments.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                "Message content is empty",
            ));
        }
        Ok(Self {
            id: MessageId::new(),
            conversation_id,
            sender_id,
            content,
            attachments,
            sent_at: Timestamp::now(),
        })
    }

    /// Text shown in conversation previews.
    pub fn preview(&self) -> &str {
        if self.content.is_empty() {
            "Attachment"
        } else {
            &self.content
        }
    }
}

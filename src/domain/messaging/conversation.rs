//! Conversation entity with per-participant unread counters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, Timestamp, UserId};

use super::Message;

/// Direct (two people) or group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Direct,
    Group,
}

/// Snapshot of the latest message, kept on the conversation for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: String,
    pub sender_id: UserId,
    pub timestamp: Timestamp,
}

/// Result of removing a participant from a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Participant removed, conversation continues.
    Removed,
    /// Fewer than two participants remain; the conversation dissolves.
    Dissolved,
}

/// A conversation between two or more users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub participants: Vec<UserId>,
    pub kind: ConversationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub last_message: Option<LastMessage>,
    /// Unread message count per participant.
    pub unread: HashMap<UserId, u32>,
    pub is_marked: bool,
    pub is_muted: bool,
}

impl Conversation {
    /// Creates a conversation; the participant set is deduplicated and must
    /// contain at least two users.
    pub fn new(
        participants: Vec<UserId>,
        kind: ConversationKind,
        title: Option<String>,
    ) -> Result<Self, DomainError> {
        let mut unique: Vec<UserId> = Vec::new();
        for p in participants {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }
        if unique.len() < 2 {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                "A conversation needs at least two participants",
            ));
        }
        Ok(Self {
            id: ConversationId::new(),
            participants: unique,
            kind,
            title: if kind == ConversationKind::Group {
                title
            } else {
                None
            },
            last_message: None,
            unread: HashMap::new(),
            is_marked: false,
            is_muted: false,
        })
    }

    pub fn is_participant(&self, user: &UserId) -> bool {
        self.participants.contains(user)
    }

    /// Unread count for one participant.
    pub fn unread_for(&self, user: &UserId) -> u32 {
        self.unread.get(user).copied().unwrap_or(0)
    }

    /// Records a sent message: refreshes the preview snapshot and bumps the
    /// unread counter of every participant except the sender.
    pub fn record_message(&mut self, message: &Message) {
        self.last_message = Some(LastMessage {
            content: message.preview().to_string(),
            sender_id: message.sender_id.clone(),
            timestamp: message.sent_at,
        });
        for p in &self.participants {
            if p != &message.sender_id {
                *self.unread.entry(p.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Zeroes the caller's unread counter.
    pub fn mark_read(&mut self, user: &UserId) {
        self.unread.insert(user.clone(), 0);
    }

    /// Removes a participant from a group conversation.
    ///
    /// # Errors
    ///
    /// - `INVALID` when called on a direct conversation
    pub fn remove_participant(&mut self, user: &UserId) -> Result<RemoveOutcome, DomainError> {
        if self.kind != ConversationKind::Group {
            return Err(DomainError::new(
                ErrorCode::Invalid,
                "Only group conversations can edit membership",
            ));
        }
        self.participants.retain(|p| p != user);
        self.unread.remove(user);
        if self.participants.len() < 2 {
            Ok(RemoveOutcome::Dissolved)
        } else {
            Ok(RemoveOutcome::Removed)
        }
    }
}

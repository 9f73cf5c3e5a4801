//! HTTP handlers for messaging endpoints.
//!
//! Conversations are polled, not pushed; every lookup is participant-scoped
//! at the store so non-participants simply see `NOT_FOUND`.

use std::sync::Arc;

use axum::response::Response;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::{created, domain_failure, failure, ok};
use crate::domain::foundation::{ConversationId, ErrorCode, MessageId, Role, UserId};
use crate::domain::messaging::{
    AttachmentMeta, Conversation, ConversationKind, Message, RemoveOutcome,
};
use crate::ports::{ConversationStore, UserDirectory};

#[derive(Clone)]
pub struct MessagingHandlers {
    conversations: Arc<dyn ConversationStore>,
    users: Arc<dyn UserDirectory>,
}

impl MessagingHandlers {
    pub fn new(conversations: Arc<dyn ConversationStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            conversations,
            users,
        }
    }
}

/// Conversation hydrated with participant details and the caller's unread
/// count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub unread_count: u32,
    pub participants_detail: Vec<ParticipantDetail>,
}

#[derive(Debug, Serialize)]
pub struct ParticipantDetail {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    pub avatar: String,
}

/// GET /api/messages/conversations
pub async fn list_conversations(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    let conversations = match handlers.conversations.list_for_user(&user.id).await {
        Ok(items) => items,
        Err(e) => return domain_failure(e),
    };
    let accounts = match handlers.users.list().await {
        Ok(accounts) => accounts,
        Err(e) => return domain_failure(e),
    };

    let views: Vec<ConversationView> = conversations
        .into_iter()
        .map(|c| {
            let unread_count = c.unread_for(&user.id);
            let participants_detail = c
                .participants
                .iter()
                .filter_map(|pid| accounts.iter().find(|a| &a.id == pid))
                .map(|a| ParticipantDetail {
                    id: a.id.to_string(),
                    name: a.name.clone(),
                    role: a.role,
                    email: a.email.clone(),
                    avatar: a.avatar.clone(),
                })
                .collect();
            ConversationView {
                conversation: c,
                unread_count,
                participants_detail,
            }
        })
        .collect();

    ok(views)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<ConversationKind>,
    pub title: Option<String>,
}

/// POST /api/messages/conversations
pub async fn create_conversation(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateConversationRequest>,
) -> Response {
    let mut participants = vec![user.id.clone()];
    for raw in req.participant_ids {
        match UserId::new(raw) {
            Ok(id) => participants.push(id),
            Err(_) => return failure(ErrorCode::InvalidInput, "Invalid participant id"),
        }
    }

    let conversation = match Conversation::new(
        participants,
        req.kind.unwrap_or(ConversationKind::Direct),
        req.title,
    ) {
        Ok(conversation) => conversation,
        Err(e) => return domain_failure(e),
    };

    match handlers.conversations.create(conversation).await {
        Ok(conversation) => created(conversation),
        Err(e) => domain_failure(e),
    }
}

/// GET /api/messages/conversations/:id/messages
pub async fn list_messages(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_conversation_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match handlers.conversations.list_messages(&id, &user.id).await {
        Ok(messages) => ok(messages),
        Err(e) => domain_failure(e),
    }
}

/// PATCH /api/messages/conversations/:id/mark
pub async fn toggle_mark(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    mutate_conversation(&handlers, &user.id, &id, |c| {
        c.is_marked = !c.is_marked;
        Ok(())
    })
    .await
}

/// PATCH /api/messages/conversations/:id/mute
pub async fn toggle_mute(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    mutate_conversation(&handlers, &user.id, &id, |c| {
        c.is_muted = !c.is_muted;
        Ok(())
    })
    .await
}

/// PATCH /api/messages/conversations/:id/read
pub async fn mark_read(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let user_id = user.id.clone();
    mutate_conversation(&handlers, &user.id, &id, move |c| {
        c.mark_read(&user_id);
        Ok(())
    })
    .await
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveParticipantRequest {
    pub user_id: Option<String>,
}

/// PATCH /api/messages/conversations/:id/remove
pub async fn remove_participant(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<RemoveParticipantRequest>,
) -> Response {
    let id = match parse_conversation_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let target = match req.user_id.and_then(|raw| UserId::new(raw).ok()) {
        Some(target) => target,
        None => return failure(ErrorCode::InvalidInput, "Missing userId"),
    };

    let mut conversation = match handlers.conversations.find_for_user(&id, &user.id).await {
        Ok(conversation) => conversation,
        Err(e) => return domain_failure(e),
    };

    match conversation.remove_participant(&target) {
        Ok(RemoveOutcome::Removed) => match handlers.conversations.save(conversation).await {
            Ok(conversation) => ok(conversation),
            Err(e) => domain_failure(e),
        },
        Ok(RemoveOutcome::Dissolved) => {
            match handlers.conversations.delete_for_user(&id, &user.id).await {
                Ok(()) => ok(json!({ "message": "Conversation deleted" })),
                Err(e) => domain_failure(e),
            }
        }
        Err(e) => domain_failure(e),
    }
}

/// DELETE /api/messages/conversations/:id
pub async fn delete_conversation(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_conversation_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match handlers.conversations.delete_for_user(&id, &user.id).await {
        Ok(()) => ok(json!({ "message": "Conversation deleted" })),
        Err(e) => domain_failure(e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentMeta>,
}

/// POST /api/messages
pub async fn send_message(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let id = match req.conversation_id.as_deref().map(str::parse::<ConversationId>) {
        Some(Ok(id)) => id,
        _ => return failure(ErrorCode::NotFound, "Conversation not found"),
    };

    let message = match Message::new(id, user.id.clone(), req.content, req.attachments) {
        Ok(message) => message,
        Err(e) => return domain_failure(e),
    };

    match handlers.conversations.append_message(message).await {
        Ok(message) => created(message),
        Err(e) => domain_failure(e),
    }
}

/// DELETE /api/messages/:id
pub async fn delete_message(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<MessageId>() {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Message not found"),
    };
    match handlers.conversations.delete_message(&id, &user.id).await {
        Ok(()) => ok(json!({ "message": "Message deleted" })),
        Err(e) => domain_failure(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchUsersParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/messages/users - directory search for starting conversations
pub async fn search_users(
    State(handlers): State<MessagingHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<SearchUsersParams>,
) -> Response {
    match handlers
        .users
        .search(params.q.as_deref().unwrap_or(""), &user.id, 50)
        .await
    {
        Ok(accounts) => ok(accounts
            .into_iter()
            .map(|a| {
                json!({
                    "id": a.id,
                    "name": a.name,
                    "username": a.username,
                    "role": a.role,
                    "email": a.email,
                    "avatar": a.avatar,
                })
            })
            .collect::<Vec<_>>()),
        Err(e) => domain_failure(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_conversation_id(raw: &str) -> Result<ConversationId, Response> {
    raw.parse::<ConversationId>()
        .map_err(|_| failure(ErrorCode::NotFound, "Conversation not found"))
}

async fn mutate_conversation<F>(
    handlers: &MessagingHandlers,
    user: &UserId,
    raw_id: &str,
    mutate: F,
) -> Response
where
    F: FnOnce(&mut Conversation) -> Result<(), crate::domain::foundation::DomainError>,
{
    let id = match parse_conversation_id(raw_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let mut conversation = match handlers.conversations.find_for_user(&id, user).await {
        Ok(conversation) => conversation,
        Err(e) => return domain_failure(e),
    };
    if let Err(e) = mutate(&mut conversation) {
        return domain_failure(e);
    }
    match handlers.conversations.save(conversation).await {
        Ok(conversation) => ok(conversation),
        Err(e) => domain_failure(e),
    }
}

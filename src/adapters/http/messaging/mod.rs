//! HTTP adapter for messaging endpoints.

mod handlers;

pub use handlers::{
    ConversationView, CreateConversationRequest, MessagingHandlers, SendMessageRequest,
};

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

pub fn messaging_routes(state: MessagingHandlers) -> Router {
    Router::new()
        .route(
            "/conversations",
            get(handlers::list_conversations).post(handlers::create_conversation),
        )
        .route("/conversations/:id", delete(handlers::delete_conversation))
        .route("/conversations/:id/messages", get(handlers::list_messages))
        .route("/conversations/:id/mark", patch(handlers::toggle_mark))
        .route("/conversations/:id/mute", patch(handlers::toggle_mute))
        .route("/conversations/:id/read", patch(handlers::mark_read))
        .route("/conversations/:id/remove", patch(handlers::remove_participant))
        .route("/", post(handlers::send_message))
        .route("/:id", delete(handlers::delete_message))
        .route("/users", get(handlers::search_users))
        .with_state(state)
}

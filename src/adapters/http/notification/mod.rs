//! HTTP adapter for notification endpoints.

mod handlers;

pub use handlers::NotificationHandlers;

use axum::{
    routing::{get, patch},
    Router,
};

pub fn notification_routes(state: NotificationHandlers) -> Router {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/mark-all-read", patch(handlers::mark_all_read))
        .route("/:id/read", patch(handlers::mark_read))
        .route(
            "/settings/me",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .with_state(state)
}

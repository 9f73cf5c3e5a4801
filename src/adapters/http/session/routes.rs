//! HTTP routes for session endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    create_session, delete_session, get_session, list_sessions, register_student,
    unregister_student, update_session, SessionHandlers,
};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/:id/register", post(register_student))
        .route("/:id/unregister", delete(unregister_student))
        .with_state(handlers)
}

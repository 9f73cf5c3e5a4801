//! HTTP adapter for feedback endpoints.

mod handlers;

pub use handlers::{FeedbackHandlers, SubmitFeedbackRequest};

use axum::{
    routing::{get, patch, post},
    Router,
};

pub fn feedback_routes(state: FeedbackHandlers) -> Router {
    Router::new()
        .route("/sessions/completed", get(handlers::completed_sessions))
        .route("/", post(handlers::submit_feedback))
        .route("/my-history", get(handlers::my_history))
        .route("/tutor", get(handlers::tutor_feedback))
        .route("/tutor/:id/mark-viewed", patch(handlers::mark_viewed))
        .route("/admin", get(handlers::admin_list))
        .with_state(state)
}
